use std::thread;

use mtb_decoder::{FeedOutcome, PayloadDecompressor};
use mtb_wire::{Command, Frame, classify, startup_sequence};

use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::observer::{SessionObserver, TracingObserver};
use crate::sink::PayloadSink;
use crate::transport::Transport;

/// What a single poll of the transport amounted to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PollOutcome {
    /// Nothing (or an empty chunk) was available.
    Idle,
    /// An acknowledgement arrived; any partial payload was dropped.
    Ack,
    /// A data chunk was fed and the stream is not finished yet.
    Progress,
    /// The stream ended. Carries the full payload.
    Complete(Vec<u8>),
}

/// Summary of a successful run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionReport {
    pub payload_len: usize,
    pub chunks_received: usize,
    pub acks_received: usize,
    pub location: String,
}

/// Drives one scanner session from configuration to finished payload.
///
/// ```text
///   configure()          AISRDS1!  AISILLn!  AISOMD1!   (replies discarded)
///        │
///        ▼
///   ┌─▶ sleep(poll_interval)
///   │    read_available()
///   │      ├─ none / empty ────────────────────────────────┐
///   │      ├─ "AIS…"  → drop decompressor (reset) ─────────┤
///   │      └─ data    → decompressor (created lazily)      │
///   │                    ├─ NeedMore ──────────────────────┤
///   │                    ├─ error    → fail, nothing written
///   │                    └─ Complete → sink, done          │
///   └──────────────────────────────────────────────────────┘
/// ```
///
/// The in-flight decompressor is a plain `Option` owned by the
/// controller. A reset replaces it with `None`; the next data chunk starts
/// a fresh stream. Data arriving before any acknowledgement is accepted.
pub struct SessionController<T, O = TracingObserver> {
    transport: T,
    observer: O,
    config: SessionConfig,
    decompressor: Option<PayloadDecompressor>,
    chunks_received: usize,
    acks_received: usize,
}

impl<T: Transport> SessionController<T, TracingObserver> {
    /// Controller that reports through `tracing`.
    pub fn new(transport: T, config: SessionConfig) -> Self {
        Self::with_observer(transport, config, TracingObserver)
    }
}

impl<T: Transport, O: SessionObserver> SessionController<T, O> {
    pub fn with_observer(transport: T, config: SessionConfig, observer: O) -> Self {
        Self {
            transport,
            observer,
            config,
            decompressor: None,
            chunks_received: 0,
            acks_received: 0,
        }
    }

    /// Write one command and return whatever the scanner had buffered
    /// right afterwards.
    ///
    /// # Errors
    ///
    /// [`SessionError::Transport`] if the write or the read fails.
    pub fn send_command(&mut self, command: &Command<'_>) -> Result<Option<Vec<u8>>, SessionError> {
        let bytes = command.encode();
        self.transport.write(&bytes)?;
        self.observer.command_sent(&bytes);
        Ok(self.transport.read_available()?)
    }

    /// Send the fixed startup sequence. Immediate replies are discarded.
    ///
    /// # Errors
    ///
    /// [`SessionError::Transport`] if any command cannot be sent.
    pub fn configure(&mut self) -> Result<(), SessionError> {
        for command in startup_sequence(self.config.illumination) {
            let _reply = self.send_command(&command)?;
        }
        Ok(())
    }

    /// Poll the transport once and act on what arrived. Never sleeps.
    ///
    /// # Errors
    ///
    /// - [`SessionError::Transport`] if the read fails.
    /// - [`SessionError::Decode`] if a data chunk is not a valid
    ///   continuation of the stream. The stream is dropped.
    pub fn poll_once(&mut self) -> Result<PollOutcome, SessionError> {
        let Some(chunk) = self.transport.read_available()? else {
            return Ok(PollOutcome::Idle);
        };
        let Some(frame) = classify(&chunk) else {
            return Ok(PollOutcome::Idle);
        };

        self.chunks_received += 1;
        self.observer.chunk_received(&chunk);

        match frame {
            Frame::Ack(_) => {
                self.acks_received += 1;
                let discarded = self
                    .decompressor
                    .take()
                    .map_or(0, |d| d.decompressed().len());
                self.observer.ack_detected(discarded);
                Ok(PollOutcome::Ack)
            }
            Frame::Data(data) => self.feed(data),
        }
    }

    fn feed(&mut self, data: &[u8]) -> Result<PollOutcome, SessionError> {
        let max_size = self.config.max_payload_size;
        let decompressor = self
            .decompressor
            .get_or_insert_with(|| PayloadDecompressor::with_limit(max_size));

        match decompressor.feed(data) {
            Ok(FeedOutcome::NeedMore) => {
                self.observer.progress(decompressor.decompressed());
                Ok(PollOutcome::Progress)
            }
            Ok(FeedOutcome::Complete) => {
                let trailing = decompressor.trailing_bytes();
                let payload = self
                    .decompressor
                    .take()
                    .and_then(PayloadDecompressor::into_payload)
                    .unwrap_or_default();
                self.observer.completed(&payload, trailing);
                Ok(PollOutcome::Complete(payload))
            }
            Err(e) => {
                self.decompressor = None;
                Err(e.into())
            }
        }
    }

    /// Poll until a payload completes. Sleeps `poll_interval` before
    /// every poll and never gives up on its own.
    ///
    /// # Errors
    ///
    /// Same as [`poll_once`](Self::poll_once).
    pub fn receive(&mut self) -> Result<Vec<u8>, SessionError> {
        loop {
            self.observer.waiting();
            thread::sleep(self.config.poll_interval);
            if let PollOutcome::Complete(payload) = self.poll_once()? {
                return Ok(payload);
            }
        }
    }

    /// Configure the scanner, receive one payload, and hand it to `sink`.
    ///
    /// The observer's `failed` hook sees any error before it is returned.
    ///
    /// # Errors
    ///
    /// Any [`SessionError`]. The sink is untouched unless the payload
    /// completed.
    pub fn run(mut self, sink: &mut impl PayloadSink) -> Result<SessionReport, SessionError> {
        let result = self.run_inner(sink);
        if let Err(e) = &result {
            self.observer.failed(e);
        }
        result
    }

    fn run_inner(&mut self, sink: &mut impl PayloadSink) -> Result<SessionReport, SessionError> {
        self.configure()?;
        let payload = self.receive()?;

        let location = sink.location();
        sink.deliver(&payload).map_err(|source| SessionError::Sink {
            location: location.clone(),
            source,
        })?;
        self.observer.delivered(payload.len(), &location);

        Ok(SessionReport {
            payload_len: payload.len(),
            chunks_received: self.chunks_received,
            acks_received: self.acks_received,
            location,
        })
    }

    /// Whether a payload stream is currently being assembled.
    pub fn has_active_stream(&self) -> bool {
        self.decompressor.is_some()
    }

    /// Decompressed bytes of the in-flight stream, if any.
    pub fn partial_payload(&self) -> Option<&[u8]> {
        self.decompressor.as_ref().map(PayloadDecompressor::decompressed)
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::time::Duration;

    use flate2::Compression;
    use flate2::write::ZlibEncoder;
    use mtb_decoder::DecodeError;
    use mtb_wire::IlluminationProfile;

    use super::*;
    use crate::observer::{RecordingObserver, SessionEvent};
    use crate::sink::MemorySink;
    use crate::transport::MockTransport;

    fn zlib(data: &[u8]) -> Vec<u8> {
        let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
        enc.write_all(data).unwrap();
        enc.finish().unwrap()
    }

    fn fast_config() -> SessionConfig {
        SessionConfig {
            poll_interval: Duration::ZERO,
            ..SessionConfig::default()
        }
    }

    fn controller(
        script: Vec<Option<Vec<u8>>>,
    ) -> SessionController<MockTransport, RecordingObserver> {
        SessionController::with_observer(
            MockTransport::new(script),
            fast_config(),
            RecordingObserver::default(),
        )
    }

    #[test]
    fn configure_sends_startup_sequence_in_order() {
        let mut ctl = SessionController::with_observer(
            MockTransport::default().with_replies([b"AISRDS1\x06!".to_vec()]),
            SessionConfig {
                illumination: IlluminationProfile::PaperOptimized,
                ..fast_config()
            },
            (),
        );
        ctl.configure().unwrap();
        assert_eq!(
            ctl.transport().written,
            vec![
                b"\x16\x4D\x0DAISRDS1!".to_vec(),
                b"\x16\x4D\x0DAISILL2!".to_vec(),
                b"\x16\x4D\x0DAISOMD1!".to_vec(),
            ]
        );
        assert!(!ctl.has_active_stream());
    }

    #[test]
    fn idle_and_empty_polls_change_nothing() {
        let stream = zlib(b"HELLO");
        let (c1, _) = stream.split_at(4);
        let mut ctl = controller(vec![Some(c1.to_vec()), None, Some(Vec::new())]);

        assert_eq!(ctl.poll_once().unwrap(), PollOutcome::Progress);
        let before = ctl.partial_payload().unwrap().to_vec();
        assert_eq!(ctl.poll_once().unwrap(), PollOutcome::Idle);
        assert_eq!(ctl.poll_once().unwrap(), PollOutcome::Idle);
        assert!(ctl.has_active_stream());
        assert_eq!(ctl.partial_payload().unwrap(), before.as_slice());
        assert_eq!(ctl.observer().count(|e| matches!(e, SessionEvent::ChunkReceived(_))), 1);
    }

    #[test]
    fn ack_resets_partial_stream() {
        let first = zlib(&b"stale ticket ".repeat(500));
        let (c1, _) = first.split_at(first.len() / 2);
        let mut ctl = controller(vec![
            Some(c1.to_vec()),
            Some(b"AISILL3\x06!".to_vec()),
            Some(zlib(b"fresh")),
        ]);

        assert_eq!(ctl.poll_once().unwrap(), PollOutcome::Progress);
        assert!(ctl.has_active_stream());
        assert_eq!(ctl.poll_once().unwrap(), PollOutcome::Ack);
        assert!(!ctl.has_active_stream());
        assert_eq!(
            ctl.poll_once().unwrap(),
            PollOutcome::Complete(b"fresh".to_vec())
        );
        assert_eq!(
            ctl.observer().count(|e| matches!(e, SessionEvent::AckDetected { .. })),
            1
        );
    }

    #[test]
    fn ack_then_fresh_stream_completes() {
        let stream = zlib(b"HELLO");
        let (c1, c2) = stream.split_at(3);
        let mut ctl = controller(vec![
            Some(stream[..5].to_vec()),
            Some(b"AIS".to_vec()),
            Some(b"AIS".to_vec()),
            Some(c1.to_vec()),
            Some(c2.to_vec()),
        ]);

        assert_eq!(ctl.poll_once().unwrap(), PollOutcome::Progress);
        assert_eq!(ctl.poll_once().unwrap(), PollOutcome::Ack);
        assert_eq!(ctl.poll_once().unwrap(), PollOutcome::Ack);
        assert_eq!(ctl.poll_once().unwrap(), PollOutcome::Progress);
        assert_eq!(
            ctl.poll_once().unwrap(),
            PollOutcome::Complete(b"HELLO".to_vec())
        );
        assert!(!ctl.has_active_stream());
    }

    #[test]
    fn data_before_any_ack_is_accepted() {
        let mut ctl = controller(vec![Some(zlib(b"no ack first"))]);
        assert_eq!(
            ctl.poll_once().unwrap(),
            PollOutcome::Complete(b"no ack first".to_vec())
        );
    }

    #[test]
    fn corrupt_chunk_is_fatal() {
        let mut ctl = controller(vec![Some(vec![0xFF])]);
        let err = ctl.poll_once().unwrap_err();
        assert!(matches!(
            err,
            SessionError::Decode(DecodeError::InvalidHeader { byte: 0xFF })
        ));
    }

    #[test]
    fn run_delivers_exactly_once() {
        let stream = zlib(b"HELLO");
        let (c1, c2) = stream.split_at(2);
        let ctl = controller(vec![
            None,
            Some(b"AISRDS1\x06!".to_vec()),
            Some(c1.to_vec()),
            Some(c2.to_vec()),
        ]);

        let mut sink = MemorySink::default();
        let report = ctl.run(&mut sink).unwrap();
        assert_eq!(sink.deliveries, vec![b"HELLO".to_vec()]);
        assert_eq!(
            report,
            SessionReport {
                payload_len: 5,
                chunks_received: 3,
                acks_received: 1,
                location: "memory".to_string(),
            }
        );
    }

    #[test]
    fn run_failure_writes_nothing_and_notifies_observer() {
        let mut observer = RecordingObserver::default();
        let ctl = SessionController::with_observer(
            MockTransport::new([Some(b"garbage".to_vec())]),
            fast_config(),
            &mut observer,
        );
        let mut sink = MemorySink::default();
        assert!(ctl.run(&mut sink).is_err());
        assert!(sink.deliveries.is_empty());
        assert_eq!(observer.count(|e| matches!(e, SessionEvent::Failed(_))), 1);
        assert_eq!(observer.count(|e| matches!(e, SessionEvent::CommandSent(_))), 3);
    }

    #[test]
    fn write_failure_is_transport_error() {
        let mut transport = MockTransport::default();
        transport.fail_writes = true;
        let mut ctl = SessionController::with_observer(transport, fast_config(), ());
        assert!(matches!(
            ctl.configure(),
            Err(SessionError::Transport(_))
        ));
    }
}
