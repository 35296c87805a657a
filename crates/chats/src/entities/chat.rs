use chatzen_users::User;
use serde::{Deserialize, Serialize};

use super::message::Message;
use crate::types::{ChatError, ChatId, ChatResult};

/// Represents a chat conversation, either one-to-one or a group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    /// Backend identifier
    #[serde(rename = "_id")]
    pub id: ChatId,
    /// Group name; one-to-one chats carry no meaningful name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_name: Option<String>,
    /// Whether this is a group chat
    #[serde(default)]
    pub is_group_chat: bool,
    /// Participants
    #[serde(default)]
    pub users: Vec<User>,
    /// Group administrator (group chats only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_admin: Option<User>,
    /// Preview of the most recent message, as sent with the chat list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_message: Option<Box<Message>>,
}

impl Chat {
    /// Create a one-to-one chat between two users
    pub fn direct(id: impl Into<ChatId>, first: User, second: User) -> Self {
        Self {
            id: id.into(),
            chat_name: None,
            is_group_chat: false,
            users: vec![first, second],
            group_admin: None,
            latest_message: None,
        }
    }

    /// Create a group chat administered by `admin`
    pub fn group(
        id: impl Into<ChatId>,
        name: impl Into<String>,
        users: Vec<User>,
        admin: User,
    ) -> Self {
        Self {
            id: id.into(),
            chat_name: Some(name.into()),
            is_group_chat: true,
            users,
            group_admin: Some(admin),
            latest_message: None,
        }
    }

    /// Whether the user with `user_id` participates in this chat
    pub fn has_participant(&self, user_id: &str) -> bool {
        self.users.iter().any(|user| user.is(user_id))
    }

    /// Whether the user with `user_id` administers this group
    pub fn is_admin(&self, user_id: &str) -> bool {
        self.group_admin
            .as_ref()
            .map_or(false, |admin| admin.is(user_id))
    }

    /// The participant of a one-to-one chat that is not `logged_user_id`
    pub fn counterpart(&self, logged_user_id: &str) -> Option<&User> {
        if self.is_group_chat {
            return None;
        }
        crate::utils::counterpart(logged_user_id, &self.users)
    }

    /// Name to show for this chat from the point of view of `logged_user_id`
    pub fn title(&self, logged_user_id: &str) -> String {
        crate::utils::chat_display_name(self, logged_user_id)
    }

    /// Check the shape invariants of one-to-one and group chats
    pub fn validate(&self) -> ChatResult<()> {
        if self.is_group_chat {
            let admin = self
                .group_admin
                .as_ref()
                .ok_or_else(|| ChatError::validation("group chat has no admin"))?;
            if !self.has_participant(&admin.id) {
                return Err(ChatError::validation("group admin must be a participant"));
            }
            if self.users.len() < 2 {
                return Err(ChatError::validation("group chat needs at least two participants"));
            }
        } else {
            if self.users.len() != 2 {
                return Err(ChatError::validation(format!(
                    "one-to-one chat must have exactly two participants, found {}",
                    self.users.len()
                )));
            }
            if self.group_admin.is_some() {
                return Err(ChatError::validation("one-to-one chat cannot have an admin"));
            }
        }
        Ok(())
    }

    /// Fail unless this is a group chat
    pub fn ensure_group(&self) -> ChatResult<()> {
        if self.is_group_chat {
            Ok(())
        } else {
            Err(ChatError::validation(
                "group operations are not available on one-to-one chats",
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ada() -> User {
        User::new("u1", "Ada")
    }

    fn grace() -> User {
        User::new("u2", "Grace")
    }

    #[test]
    fn decodes_populated_group_chat() {
        let chat: Chat = serde_json::from_str(
            r#"{
                "_id": "c1",
                "chatName": "Compilers",
                "isGroupChat": true,
                "users": [{"_id":"u1","name":"Ada"},{"_id":"u2","name":"Grace"}],
                "groupAdmin": {"_id":"u1","name":"Ada"},
                "latestMessage": {"_id":"m9","sender":{"_id":"u2","name":"Grace"},"content":"hi","chat":"c1"},
                "createdAt": "2024-01-01T00:00:00.000Z"
            }"#,
        )
        .unwrap();

        assert!(chat.is_group_chat);
        assert!(chat.is_admin("u1"));
        assert_eq!(chat.latest_message.as_ref().unwrap().chat_id(), "c1");
        assert!(chat.validate().is_ok());
    }

    #[test]
    fn direct_chat_invariants() {
        let chat = Chat::direct("c1", ada(), grace());
        assert!(chat.validate().is_ok());
        assert_eq!(chat.counterpart("u1").unwrap().name, "Grace");
        assert!(chat.ensure_group().is_err());

        let mut broken = chat.clone();
        broken.users.push(User::new("u3", "Linus"));
        assert!(broken.validate().is_err());

        let mut with_admin = chat;
        with_admin.group_admin = Some(ada());
        assert!(with_admin.validate().is_err());
    }

    #[test]
    fn group_admin_must_participate() {
        let chat = Chat::group("c2", "Team", vec![ada(), grace()], User::new("u3", "Linus"));
        assert!(chat.validate().is_err());

        let chat = Chat::group("c2", "Team", vec![ada(), grace()], ada());
        assert!(chat.validate().is_ok());
        assert!(chat.counterpart("u1").is_none());
    }
}
