use tracing::{debug, error, info};

use crate::error::SessionError;

/// Hooks invoked at each decision point of the session loop.
///
/// Control flow never depends on an observer; it only watches. All
/// methods default to doing nothing.
///
/// ```text
///   command_sent      startup command written
///   waiting           about to sleep before the next poll
///   chunk_received    non-empty chunk read from the transport
///   ack_detected      chunk was an acknowledgement; partial output dropped
///   progress          data chunk fed, stream not finished
///   completed         end-of-stream reached
///   delivered         payload handed to the sink
///   failed            run is ending with an error
/// ```
pub trait SessionObserver {
    fn command_sent(&mut self, _command: &[u8]) {}

    fn waiting(&mut self) {}

    fn chunk_received(&mut self, _chunk: &[u8]) {}

    /// `discarded` is the number of decompressed bytes thrown away.
    fn ack_detected(&mut self, _discarded: usize) {}

    fn progress(&mut self, _decompressed: &[u8]) {}

    fn completed(&mut self, _payload: &[u8], _trailing_bytes: usize) {}

    fn delivered(&mut self, _len: usize, _location: &str) {}

    fn failed(&mut self, _error: &SessionError) {}
}

/// Observer that ignores everything.
impl SessionObserver for () {}

/// Default observer: emits `tracing` events.
///
/// Chunks and payloads are logged as hex, which is how scanner traffic is
/// usually compared against captures.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl SessionObserver for TracingObserver {
    fn command_sent(&mut self, command: &[u8]) {
        debug!(command = %hex::encode(command), "sent scanner command");
    }

    fn waiting(&mut self) {
        debug!("waiting for scanner data");
    }

    fn chunk_received(&mut self, chunk: &[u8]) {
        info!(
            "received {} bytes from scanner: {}",
            chunk.len(),
            hex::encode(chunk)
        );
    }

    fn ack_detected(&mut self, discarded: usize) {
        debug!(discarded, "command ack");
    }

    fn progress(&mut self, decompressed: &[u8]) {
        debug!("buffer now: {}", hex::encode(decompressed));
    }

    fn completed(&mut self, payload: &[u8], trailing_bytes: usize) {
        info!(
            "decompressed {} bytes of data: {}",
            payload.len(),
            hex::encode(payload)
        );
        if trailing_bytes > 0 {
            debug!(trailing_bytes, "ignored bytes after end of stream");
        }
    }

    fn delivered(&mut self, _len: usize, location: &str) {
        info!("output written to {location}");
    }

    fn failed(&mut self, error: &SessionError) {
        error!("{error}");
    }
}

/// Event log captured by [`RecordingObserver`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    CommandSent(Vec<u8>),
    Waiting,
    ChunkReceived(Vec<u8>),
    AckDetected { discarded: usize },
    Progress { decompressed: usize },
    Completed { len: usize, trailing_bytes: usize },
    Delivered { len: usize, location: String },
    Failed(String),
}

/// Observer that records every hook call. Used by tests.
#[derive(Clone, Debug, Default)]
pub struct RecordingObserver {
    pub events: Vec<SessionEvent>,
}

impl RecordingObserver {
    /// Number of recorded events matching `pred`.
    pub fn count(&self, pred: impl Fn(&SessionEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl SessionObserver for RecordingObserver {
    fn command_sent(&mut self, command: &[u8]) {
        self.events.push(SessionEvent::CommandSent(command.to_vec()));
    }

    fn waiting(&mut self) {
        self.events.push(SessionEvent::Waiting);
    }

    fn chunk_received(&mut self, chunk: &[u8]) {
        self.events.push(SessionEvent::ChunkReceived(chunk.to_vec()));
    }

    fn ack_detected(&mut self, discarded: usize) {
        self.events.push(SessionEvent::AckDetected { discarded });
    }

    fn progress(&mut self, decompressed: &[u8]) {
        self.events.push(SessionEvent::Progress {
            decompressed: decompressed.len(),
        });
    }

    fn completed(&mut self, payload: &[u8], trailing_bytes: usize) {
        self.events.push(SessionEvent::Completed {
            len: payload.len(),
            trailing_bytes,
        });
    }

    fn delivered(&mut self, len: usize, location: &str) {
        self.events.push(SessionEvent::Delivered {
            len,
            location: location.to_string(),
        });
    }

    fn failed(&mut self, error: &SessionError) {
        self.events.push(SessionEvent::Failed(error.to_string()));
    }
}

impl<O: SessionObserver + ?Sized> SessionObserver for &mut O {
    fn command_sent(&mut self, command: &[u8]) {
        (**self).command_sent(command);
    }

    fn waiting(&mut self) {
        (**self).waiting();
    }

    fn chunk_received(&mut self, chunk: &[u8]) {
        (**self).chunk_received(chunk);
    }

    fn ack_detected(&mut self, discarded: usize) {
        (**self).ack_detected(discarded);
    }

    fn progress(&mut self, decompressed: &[u8]) {
        (**self).progress(decompressed);
    }

    fn completed(&mut self, payload: &[u8], trailing_bytes: usize) {
        (**self).completed(payload, trailing_bytes);
    }

    fn delivered(&mut self, len: usize, location: &str) {
        (**self).delivered(len, location);
    }

    fn failed(&mut self, error: &SessionError) {
        (**self).failed(error);
    }
}
