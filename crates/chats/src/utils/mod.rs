//! Internal utilities for the chat client.
//!
//! Display rules for message threads, group permission checks and input
//! validation.

pub mod logic;
pub mod permissions;
pub mod validation;

pub use logic::*;
pub use permissions::*;
pub use validation::*;
