//! Message endpoints

use chatzen_chats::{Message, SendMessageRequest};
use reqwest::Method;

use super::RestClient;
use crate::error::GatewayResult;

impl RestClient {
    /// `GET /api/message/{chat_id}`
    pub async fn list_messages(&self, token: &str, chat_id: &str) -> GatewayResult<Vec<Message>> {
        let path = format!("/api/message/{}", urlencoding::encode(chat_id));
        self.get(token, &path).await
    }

    /// `POST /api/message`
    pub async fn post_message(
        &self,
        token: &str,
        request: &SendMessageRequest,
    ) -> GatewayResult<Message> {
        self.send_json(Method::POST, token, "/api/message", request)
            .await
    }
}
