//! Shared types and interfaces for the chat system.
//!
//! Error definitions, realtime event envelopes and REST request bodies used
//! across the crate and by the gateway.

pub mod errors;
pub mod events;
pub mod requests;

pub use errors::{ChatError, ChatResult};
pub use events::*;
pub use requests::*;

pub use chatzen_users::UserId;

// Common type aliases
pub type ChatId = String;
pub type MessageId = String;
