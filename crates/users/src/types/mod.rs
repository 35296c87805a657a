//! Shared types for the users crate.

pub mod errors;

pub use errors::{SessionError, SessionResult};

/// Opaque backend identifier of a user (`_id` on the wire).
pub type UserId = String;
