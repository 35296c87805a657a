//! Chat endpoints

use chatzen_chats::{AccessChatRequest, Chat, GroupMemberRequest, RenameGroupRequest};
use reqwest::Method;

use super::RestClient;
use crate::error::GatewayResult;

impl RestClient {
    /// `GET /api/chat`
    pub async fn list_chats(&self, token: &str) -> GatewayResult<Vec<Chat>> {
        self.get(token, "/api/chat").await
    }

    /// `POST /api/chat`
    pub async fn open_direct_chat(&self, token: &str, user_id: &str) -> GatewayResult<Chat> {
        let body = AccessChatRequest {
            user_id: user_id.to_string(),
        };
        self.send_json(Method::POST, token, "/api/chat", &body).await
    }

    /// `PUT /api/chat/rename`
    pub async fn rename(&self, token: &str, request: &RenameGroupRequest) -> GatewayResult<Chat> {
        self.send_json(Method::PUT, token, "/api/chat/rename", request)
            .await
    }

    /// `PUT /api/chat/groupadd`
    pub async fn group_add(&self, token: &str, request: &GroupMemberRequest) -> GatewayResult<Chat> {
        self.send_json(Method::PUT, token, "/api/chat/groupadd", request)
            .await
    }

    /// `PUT /api/chat/groupremove`
    pub async fn group_remove(
        &self,
        token: &str,
        request: &GroupMemberRequest,
    ) -> GatewayResult<Chat> {
        self.send_json(Method::PUT, token, "/api/chat/groupremove", request)
            .await
    }
}
