//! # Chat-Zen Chats Crate
//!
//! Chat domain and realtime messaging flow of the Chat-Zen client: chat and
//! message entities, the wire events exchanged over the socket, the display
//! rules for a thread, and the client-side services that drive the chat list,
//! user search, group administration and the message thread of the selected
//! chat.
//!
//! ## Architecture
//!
//! - **Entities**: Domain models (Chat, Message)
//! - **Services**: Thread controller, typing indicator, realtime channel
//!   abstraction, chat list, search, group admin, notices
//! - **Types**: Errors, realtime events, REST request bodies
//! - **Utils**: Display logic, permission checks, validation
//!
//! ## Usage
//!
//! ```rust
//! use std::time::Duration;
//!
//! use chatzen_chats::test_support::LoopbackChannel;
//! use chatzen_chats::{Chat, NoticeBoard, ServerEvent, ThreadController};
//! use chatzen_users::User;
//!
//! let me = User::new("u1", "Ada");
//! let channel = LoopbackChannel::new();
//! channel.deliver(ServerEvent::Connected);
//!
//! let mut thread = ThreadController::new(
//!     channel,
//!     me.clone(),
//!     NoticeBoard::default(),
//!     Duration::from_secs(3),
//! );
//! let chat = Chat::direct("c1", me, User::new("u2", "Grace"));
//! let ticket = thread.select_chat(Some(&chat)).unwrap();
//! assert!(thread.apply_history(ticket, Ok(Vec::new())));
//! ```

pub mod entities;
pub mod services;
pub mod test_support;
pub mod types;
pub mod utils;

pub use entities::{Chat, ChatRef, Message};
pub use services::{
    ChatApi, ChatListService, EventFilter, EventHub, GroupService, HistoryTicket,
    Notice, NoticeBoard, NoticeLevel, OutgoingMessage, RealtimeChannel, SearchService,
    SessionState, Subscription, ThreadController, ThreadPhase, ThreadUpdate, TypingIndicator,
    TypingSignal,
};
pub use types::{
    AccessChatRequest, ChatError, ChatId, ChatResult, ClientEvent, EventKind,
    GroupMemberRequest, MessageId, RenameGroupRequest, SendMessageRequest, ServerEvent,
};
