//! Event types carried over the realtime channel.
//!
//! Every event travels as a JSON text frame `{"event": "<name>", "data": ..}`.

use chatzen_users::User;
use serde::{Deserialize, Serialize};

use super::ChatId;
use crate::entities::Message;

/// Events this client emits
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", content = "data")]
pub enum ClientEvent {
    /// Announce presence; the server answers with `connected`
    #[serde(rename = "setup")]
    Setup(User),

    /// Join the room of a chat
    #[serde(rename = "join chat")]
    JoinChat(ChatId),

    /// Local user started typing in a chat
    #[serde(rename = "typing")]
    Typing(ChatId),

    /// Local user stopped typing in a chat
    #[serde(rename = "stop typing")]
    StopTyping(ChatId),

    /// Broadcast a freshly persisted message to the chat's room
    #[serde(rename = "new message")]
    NewMessage(Message),
}

/// Events delivered by the server
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    /// Presence acknowledged
    #[serde(rename = "connected")]
    Connected,

    /// Another participant is typing
    #[serde(rename = "typing")]
    Typing(ChatId),

    /// Another participant stopped typing
    #[serde(rename = "stop typing")]
    StopTyping(ChatId),

    /// A message was broadcast to one of our rooms
    #[serde(rename = "message received")]
    MessageReceived(Message),
}

/// Discriminant of [`ServerEvent`], used by subscription filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Connected,
    Typing,
    StopTyping,
    MessageReceived,
}

impl ServerEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            ServerEvent::Connected => EventKind::Connected,
            ServerEvent::Typing(_) => EventKind::Typing,
            ServerEvent::StopTyping(_) => EventKind::StopTyping,
            ServerEvent::MessageReceived(_) => EventKind::MessageReceived,
        }
    }

    /// Chat the event is scoped to, if any
    pub fn chat_id(&self) -> Option<&str> {
        match self {
            ServerEvent::Connected => None,
            ServerEvent::Typing(chat_id) | ServerEvent::StopTyping(chat_id) => Some(chat_id),
            ServerEvent::MessageReceived(message) => Some(message.chat_id()),
        }
    }

    /// Wire name of the event
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::Connected => "connected",
            ServerEvent::Typing(_) => "typing",
            ServerEvent::StopTyping(_) => "stop typing",
            ServerEvent::MessageReceived(_) => "message received",
        }
    }
}

impl ClientEvent {
    /// Wire name of the event
    pub fn name(&self) -> &'static str {
        match self {
            ClientEvent::Setup(_) => "setup",
            ClientEvent::JoinChat(_) => "join chat",
            ClientEvent::Typing(_) => "typing",
            ClientEvent::StopTyping(_) => "stop typing",
            ClientEvent::NewMessage(_) => "new message",
        }
    }

    /// Chat the event is scoped to, if any
    pub fn chat_id(&self) -> Option<&str> {
        match self {
            ClientEvent::Setup(_) => None,
            ClientEvent::JoinChat(chat_id)
            | ClientEvent::Typing(chat_id)
            | ClientEvent::StopTyping(chat_id) => Some(chat_id),
            ClientEvent::NewMessage(message) => Some(message.chat_id()),
        }
    }
}
