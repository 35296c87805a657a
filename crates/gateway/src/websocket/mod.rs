//! Socket transport for the realtime channel

pub mod channel;
pub mod frames;

pub use channel::SocketChannel;
pub use frames::{decode_frame, encode_frame};
