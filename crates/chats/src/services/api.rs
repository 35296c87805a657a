//! The backend REST seam.

use async_trait::async_trait;
use chatzen_users::User;

use crate::entities::{Chat, Message};
use crate::types::{
    ChatResult, GroupMemberRequest, RenameGroupRequest, SendMessageRequest,
};

/// Operations the chat backend exposes over REST.
///
/// Every call carries the bearer token of the logged-in user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatApi: Send + Sync {
    /// `GET /api/chat`
    async fn fetch_chats(&self, token: &str) -> ChatResult<Vec<Chat>>;

    /// `POST /api/chat`
    async fn access_chat(&self, token: &str, user_id: &str) -> ChatResult<Chat>;

    /// `GET /api/message/{chat_id}`
    async fn fetch_messages(&self, token: &str, chat_id: &str) -> ChatResult<Vec<Message>>;

    /// `POST /api/message`
    async fn send_message(&self, token: &str, request: &SendMessageRequest) -> ChatResult<Message>;

    /// `GET /api/user?search=`
    async fn search_users(&self, token: &str, query: &str) -> ChatResult<Vec<User>>;

    /// `PUT /api/chat/rename`
    async fn rename_group(&self, token: &str, request: &RenameGroupRequest) -> ChatResult<Chat>;

    /// `PUT /api/chat/groupadd`
    async fn add_to_group(&self, token: &str, request: &GroupMemberRequest) -> ChatResult<Chat>;

    /// `PUT /api/chat/groupremove`
    async fn remove_from_group(
        &self,
        token: &str,
        request: &GroupMemberRequest,
    ) -> ChatResult<Chat>;
}
