//! # Chat-Zen Gateway Crate
//!
//! Connects the Chat-Zen client to its backend. The REST client implements
//! [`chatzen_chats::ChatApi`] over HTTP and the socket channel implements
//! [`chatzen_chats::RealtimeChannel`] over a WebSocket carrying JSON event
//! frames.
//!
//! ## Architecture
//!
//! - **REST**: Bearer-authenticated calls to the chat, message and user endpoints
//! - **WebSocket**: Event framing and the socket-backed realtime channel
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::time::Duration;
//!
//! use chatzen_gateway::{RestClient, SocketChannel};
//! use chatzen_users::SessionStore;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let session = SessionStore::new(".chatzen").restore().await?.expect("logged in");
//! let rest = RestClient::new("http://localhost:5000", Duration::from_secs(30))?;
//! let chats = rest.list_chats(session.token()).await?;
//! let channel = SocketChannel::connect("ws://localhost:5000/ws", &session).await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod rest;
pub mod websocket;

pub use error::{GatewayError, GatewayResult};
pub use rest::RestClient;
pub use websocket::SocketChannel;
