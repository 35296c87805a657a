//! Domain entities for user identity.

pub mod user;

pub use user::User;
