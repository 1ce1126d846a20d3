#![warn(clippy::pedantic)]

pub mod config;
pub mod controller;
pub mod error;
pub mod observer;
pub mod sink;
pub mod transport;

pub use config::{SerialSettings, SessionConfig};
pub use controller::{PollOutcome, SessionController, SessionReport};
pub use error::{SessionError, TransportError};
pub use observer::{SessionObserver, TracingObserver};
pub use sink::{FileSink, PayloadSink};
pub use transport::Transport;
