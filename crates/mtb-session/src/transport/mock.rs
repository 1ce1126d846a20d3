//! Scripted in-memory transport for tests.
//!
//! The real scanner answers on its own schedule. `MockTransport` replaces
//! it with a fixed script of poll results, so a test decides exactly what
//! each poll sees:
//!
//! - `Some(bytes)`: the scanner sent `bytes` since the last poll.
//! - `None`: nothing arrived.
//!
//! When the script runs dry the next read fails with
//! [`TransportError::Io`], which ends any session loop that would
//! otherwise poll forever.
//!
//! Every write is recorded in [`written`](MockTransport::written). The read
//! that immediately follows a write returns the reply queued with
//! [`with_replies`](MockTransport::with_replies), or `None`, without
//! touching the script.

use std::collections::VecDeque;
use std::io;

use crate::error::TransportError;
use crate::transport::Transport;

#[derive(Debug, Default)]
pub struct MockTransport {
    script: VecDeque<Option<Vec<u8>>>,
    replies: VecDeque<Vec<u8>>,
    pending_reply: Option<Option<Vec<u8>>>,
    /// Every byte sequence passed to `write`, in order.
    pub written: Vec<Vec<u8>>,
    /// Make every `write` fail with a broken-pipe error.
    pub fail_writes: bool,
}

impl MockTransport {
    pub fn new<I>(script: I) -> Self
    where
        I: IntoIterator<Item = Option<Vec<u8>>>,
    {
        Self {
            script: script.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Queue replies returned by the read right after each write.
    #[must_use]
    pub fn with_replies<I>(mut self, replies: I) -> Self
    where
        I: IntoIterator<Item = Vec<u8>>,
    {
        self.replies = replies.into_iter().collect();
        self
    }

    /// Number of scripted polls not yet consumed.
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl Transport for MockTransport {
    fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        if self.fail_writes {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "mock write failure").into());
        }
        self.written.push(bytes.to_vec());
        self.pending_reply = Some(self.replies.pop_front());
        Ok(())
    }

    fn read_available(&mut self) -> Result<Option<Vec<u8>>, TransportError> {
        if let Some(reply) = self.pending_reply.take() {
            return Ok(reply);
        }
        self.script.pop_front().ok_or_else(|| {
            io::Error::new(io::ErrorKind::UnexpectedEof, "mock script exhausted").into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_then_exhaustion() {
        let mut t = MockTransport::new([Some(b"abc".to_vec()), None]);
        assert_eq!(t.read_available().unwrap(), Some(b"abc".to_vec()));
        assert_eq!(t.read_available().unwrap(), None);
        assert_eq!(t.remaining(), 0);
        assert!(matches!(t.read_available(), Err(TransportError::Io(_))));
    }

    #[test]
    fn reply_follows_write_without_touching_script() {
        let mut t = MockTransport::new([Some(b"data".to_vec())]).with_replies([b"AIS".to_vec()]);
        t.write(b"cmd1").unwrap();
        assert_eq!(t.read_available().unwrap(), Some(b"AIS".to_vec()));
        t.write(b"cmd2").unwrap();
        assert_eq!(t.read_available().unwrap(), None);
        assert_eq!(t.read_available().unwrap(), Some(b"data".to_vec()));
        assert_eq!(t.written, vec![b"cmd1".to_vec(), b"cmd2".to_vec()]);
    }
}
