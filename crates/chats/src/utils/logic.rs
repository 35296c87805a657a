//! Display rules for a message thread and the chat list.
//!
//! All functions take the full message list and an index so they can look at
//! the neighbouring messages. Indexes out of range yield the "no grouping"
//! answer instead of panicking.

use chatzen_users::User;

use crate::entities::{Chat, Message};

/// Left margin of a message bubble
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SenderMargin {
    /// Indented past the avatar column; the same sender continues below
    Indented,
    /// Flush against the avatar, which is drawn next to this message
    Flush,
    /// Own messages, pushed to the opposite side
    Auto,
}

impl SenderMargin {
    /// Margin in pixels, `None` for automatic placement
    pub fn pixels(self) -> Option<u16> {
        match self {
            SenderMargin::Indented => Some(33),
            SenderMargin::Flush => Some(0),
            SenderMargin::Auto => None,
        }
    }
}

fn sender_id(messages: &[Message], index: usize) -> Option<&str> {
    messages.get(index).map(|message| message.sender.id.as_str())
}

/// Margin for the message at `index` as seen by `user_id`
pub fn sender_margin(messages: &[Message], index: usize, user_id: &str) -> SenderMargin {
    let Some(current) = sender_id(messages, index) else {
        return SenderMargin::Auto;
    };
    let is_last = index + 1 == messages.len();
    let next_same = sender_id(messages, index + 1) == Some(current);

    if !is_last && next_same && current != user_id {
        SenderMargin::Indented
    } else if is_last && current != user_id {
        SenderMargin::Flush
    } else {
        SenderMargin::Auto
    }
}

/// Whether the message at `index` closes a run of messages from someone else
pub fn is_same_sender(messages: &[Message], index: usize, user_id: &str) -> bool {
    let Some(current) = sender_id(messages, index) else {
        return false;
    };
    match sender_id(messages, index + 1) {
        Some(next) => (next != current || next.is_empty()) && current != user_id,
        None => false,
    }
}

/// Whether the message at `index` is the final message and came from someone else
pub fn is_last_message(messages: &[Message], index: usize, user_id: &str) -> bool {
    index + 1 == messages.len()
        && sender_id(messages, index)
            .map_or(false, |sender| sender != user_id && !sender.is_empty())
}

/// Whether the message at `index` continues a run by the same sender
pub fn is_same_user(messages: &[Message], index: usize) -> bool {
    index > 0
        && match (sender_id(messages, index - 1), sender_id(messages, index)) {
            (Some(previous), Some(current)) => previous == current,
            _ => false,
        }
}

/// Whether an avatar is drawn next to the message at `index`
pub fn shows_avatar(messages: &[Message], index: usize, user_id: &str) -> bool {
    is_same_sender(messages, index, user_id) || is_last_message(messages, index, user_id)
}

/// The other participant of a one-to-one chat.
///
/// Looks at the first two participants; `None` when there are fewer.
pub fn counterpart<'a>(logged_user_id: &str, users: &'a [User]) -> Option<&'a User> {
    match users {
        [first, second, ..] => Some(if first.is(logged_user_id) { second } else { first }),
        _ => None,
    }
}

/// Display name of the other participant, empty when unknown
pub fn sender_name(logged_user_id: &str, users: &[User]) -> String {
    counterpart(logged_user_id, users)
        .map(|user| user.name.clone())
        .unwrap_or_default()
}

/// Title of a chat: the group name, or the counterpart's name for one-to-one chats
pub fn chat_display_name(chat: &Chat, logged_user_id: &str) -> String {
    if chat.is_group_chat {
        chat.chat_name.clone().unwrap_or_default()
    } else {
        sender_name(logged_user_id, &chat.users)
    }
}
