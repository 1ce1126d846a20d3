#![no_main]

use std::time::Duration;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use mtb_session::sink::MemorySink;
use mtb_session::transport::MockTransport;
use mtb_session::{SessionConfig, SessionController};

// Fuzz target: the full session loop over an arbitrary poll script.
//
// Each poll is either nothing, an ack-tagged chunk, or raw bytes. The
// script always runs out, so every run ends in a transport error, a decode
// error, or a delivered payload. At most one payload may ever be delivered.
#[derive(Debug, Arbitrary)]
enum Poll {
    Nothing,
    Ack(Vec<u8>),
    Data(Vec<u8>),
}

fuzz_target!(|script: Vec<Poll>| {
    let script = script.into_iter().map(|p| match p {
        Poll::Nothing => None,
        Poll::Ack(tail) => {
            let mut chunk = b"AIS".to_vec();
            chunk.extend(tail);
            Some(chunk)
        }
        Poll::Data(bytes) => Some(bytes),
    });
    let config = SessionConfig {
        poll_interval: Duration::ZERO,
        max_payload_size: 1 << 20,
        ..SessionConfig::default()
    };
    let mut sink = MemorySink::default();
    let _ = SessionController::with_observer(MockTransport::new(script), config, ()).run(&mut sink);
    assert!(sink.deliveries.len() <= 1);
});
