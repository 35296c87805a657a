//! Domain entities for the chat system.
//!
//! These mirror the JSON the backend returns for chats and messages. Users
//! come from the `chatzen-users` crate.

pub mod chat;
pub mod message;

pub use chat::Chat;
pub use message::{ChatRef, Message};
