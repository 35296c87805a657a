//! Client-side services of the chat system.
//!
//! The REST seam ([`ChatApi`]) and the realtime seam ([`RealtimeChannel`])
//! are traits implemented by the gateway crate; everything else here is
//! transport-agnostic state and rules.

pub mod api;
pub mod chat_list;
pub mod group;
pub mod notices;
pub mod realtime;
pub mod search;
pub mod state;
pub mod thread;
pub mod typing;

pub use api::ChatApi;
pub use chat_list::ChatListService;
pub use group::GroupService;
pub use notices::{Notice, NoticeBoard, NoticeLevel, DEFAULT_NOTICE_DURATION};
pub use realtime::{EventFilter, EventHub, RealtimeChannel, Subscription};
pub use search::SearchService;
pub use state::SessionState;
pub use thread::{
    HistoryTicket, OutgoingMessage, ThreadController, ThreadPhase, ThreadUpdate, IDLE_PLACEHOLDER,
};
pub use typing::{TypingIndicator, TypingSignal, DEFAULT_QUIET_WINDOW};
