//! REST client for the chat backend.
//!
//! Every request carries `Authorization: Bearer <token>`. Non-2xx responses
//! become [`GatewayError::Status`] carrying the body's `message` field when
//! the backend sent one.

pub mod chat;
pub mod message;
pub mod user;

use std::time::Duration;

use async_trait::async_trait;
use chatzen_chats::{
    Chat, ChatApi, ChatResult, GroupMemberRequest, Message, RenameGroupRequest,
    SendMessageRequest,
};
use chatzen_users::{SessionError, User};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{GatewayError, GatewayResult};

/// Error body returned by the backend
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// HTTP client bound to one backend base URL
#[derive(Debug, Clone)]
pub struct RestClient {
    client: Client,
    base_url: String,
}

impl RestClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> GatewayResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, token: &str, path: &str) -> GatewayResult<RequestBuilder> {
        if token.trim().is_empty() {
            return Err(SessionError::MissingToken.into());
        }
        let url = format!("{}{}", self.base_url, path);
        debug!(method = %method, url = %url, "backend request");
        Ok(self.client.request(method, url).bearer_auth(token))
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, token: &str, path: &str) -> GatewayResult<T> {
        let response = self.request(Method::GET, token, path)?.send().await?;
        decode(response).await
    }

    pub(crate) async fn send_json<B, T>(
        &self,
        method: Method,
        token: &str,
        path: &str,
        body: &B,
    ) -> GatewayResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .request(method, token, path)?
            .json(body)
            .send()
            .await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> GatewayResult<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|body| body.message)
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });
    warn!(status = status.as_u16(), message = %message, "backend rejected request");
    Err(GatewayError::status(status.as_u16(), message))
}

#[async_trait]
impl ChatApi for RestClient {
    async fn fetch_chats(&self, token: &str) -> ChatResult<Vec<Chat>> {
        Ok(self.list_chats(token).await?)
    }

    async fn access_chat(&self, token: &str, user_id: &str) -> ChatResult<Chat> {
        Ok(self.open_direct_chat(token, user_id).await?)
    }

    async fn fetch_messages(&self, token: &str, chat_id: &str) -> ChatResult<Vec<Message>> {
        Ok(self.list_messages(token, chat_id).await?)
    }

    async fn send_message(&self, token: &str, request: &SendMessageRequest) -> ChatResult<Message> {
        Ok(self.post_message(token, request).await?)
    }

    async fn search_users(&self, token: &str, query: &str) -> ChatResult<Vec<User>> {
        Ok(self.find_users(token, query).await?)
    }

    async fn rename_group(&self, token: &str, request: &RenameGroupRequest) -> ChatResult<Chat> {
        Ok(self.rename(token, request).await?)
    }

    async fn add_to_group(&self, token: &str, request: &GroupMemberRequest) -> ChatResult<Chat> {
        Ok(self.group_add(token, request).await?)
    }

    async fn remove_from_group(
        &self,
        token: &str,
        request: &GroupMemberRequest,
    ) -> ChatResult<Chat> {
        Ok(self.group_remove(token, request).await?)
    }
}
