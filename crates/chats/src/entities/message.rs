use chatzen_users::User;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::chat::Chat;
use crate::types::{ChatId, MessageId};

/// Reference to the chat a message belongs to.
///
/// History responses carry the bare chat id while broadcast messages usually
/// carry the populated chat; both decode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ChatRef {
    Id(ChatId),
    Chat(Box<Chat>),
}

impl ChatRef {
    pub fn id(&self) -> &str {
        match self {
            ChatRef::Id(id) => id,
            ChatRef::Chat(chat) => &chat.id,
        }
    }
}

impl From<ChatId> for ChatRef {
    fn from(id: ChatId) -> Self {
        ChatRef::Id(id)
    }
}

/// A persisted message. Immutable once the backend has assigned its id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Backend identifier
    #[serde(rename = "_id")]
    pub id: MessageId,
    /// Sender
    pub sender: User,
    /// Text content
    pub content: String,
    /// Owning chat
    pub chat: ChatRef,
    /// Creation timestamp assigned by the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Message {
    pub fn new(
        id: impl Into<MessageId>,
        sender: User,
        content: impl Into<String>,
        chat_id: impl Into<ChatId>,
    ) -> Self {
        Self {
            id: id.into(),
            sender,
            content: content.into(),
            chat: ChatRef::Id(chat_id.into()),
            created_at: None,
        }
    }

    /// Id of the owning chat
    pub fn chat_id(&self) -> &str {
        self.chat.id()
    }

    /// Check if the message was sent by `user_id`
    pub fn is_from(&self, user_id: &str) -> bool {
        self.sender.is(user_id)
    }
}
