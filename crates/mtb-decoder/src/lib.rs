#![warn(clippy::pedantic)]

pub mod error;
pub mod streaming;

pub use error::DecodeError;
pub use streaming::{FeedOutcome, MAX_PAYLOAD_DECOMPRESSED_SIZE, PayloadDecompressor};
