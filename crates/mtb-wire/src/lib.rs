#![warn(clippy::pedantic)]

pub mod command;
pub mod error;
pub mod frame;

pub use command::{Command, IlluminationProfile, Persistence, encode, startup_sequence};
pub use error::WireError;
pub use frame::{Frame, classify};
