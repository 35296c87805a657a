//! Request bodies sent to the chat backend.

use serde::{Deserialize, Serialize};

use super::{ChatId, UserId};

/// Body of `POST /api/message`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub content: String,
    pub chat_id: ChatId,
}

/// Body of `POST /api/chat`, opening (or creating) a one-to-one chat
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AccessChatRequest {
    pub user_id: UserId,
}

/// Body of `PUT /api/chat/rename`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RenameGroupRequest {
    pub chat_id: ChatId,
    pub chat_name: String,
}

/// Body of `PUT /api/chat/groupadd` and `PUT /api/chat/groupremove`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GroupMemberRequest {
    pub chat_id: ChatId,
    pub user_id: UserId,
}
