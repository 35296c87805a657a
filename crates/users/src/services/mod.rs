//! Session services.

pub mod session;
pub mod store;

pub use session::{AuthSession, RealtimeLease};
pub use store::{SessionStore, STORAGE_KEY};
