//! # Chat-Zen Users Crate
//!
//! Identity and session handling for the Chat-Zen client: the user entity as
//! the backend serializes it, the authenticated session built from a stored
//! user record, and the durable storage that keeps that record between runs.
//!
//! ## Architecture
//!
//! - **Entities**: Domain models (User)
//! - **Services**: Authenticated session, realtime lease, session storage
//! - **Types**: Errors and id aliases
//!
//! ## Usage
//!
//! ```rust,no_run
//! use chatzen_users::SessionStore;
//!
//! # async fn run() -> chatzen_users::SessionResult<()> {
//! let store = SessionStore::new(".chatzen");
//! if let Some(session) = store.restore().await? {
//!     println!("logged in as {}", session.user().name);
//! }
//! # Ok(())
//! # }
//! ```

pub mod entities;
pub mod services;
pub mod types;

pub use entities::User;
pub use services::{AuthSession, RealtimeLease, SessionStore, STORAGE_KEY};
pub use types::{SessionError, SessionResult, UserId};
