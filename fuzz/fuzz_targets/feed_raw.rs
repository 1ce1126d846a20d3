#![no_main]

use libfuzzer_sys::fuzz_target;
use mtb_decoder::{FeedOutcome, PayloadDecompressor};

// Fuzz target: one decompressor fed arbitrary bytes.
//
// The first byte picks a chunk size; the rest is fed in chunks of that
// size. Catches panics in:
// - The zlib header check
// - Output buffer growth
// - End-of-stream and trailing byte accounting
// - The size limit
fuzz_target!(|data: &[u8]| {
    let Some((&size, rest)) = data.split_first() else {
        return;
    };
    let size = usize::from(size).max(1);
    let mut dec = PayloadDecompressor::with_limit(1 << 20);
    for chunk in rest.chunks(size) {
        match dec.feed(chunk) {
            Ok(FeedOutcome::NeedMore) => {}
            Ok(FeedOutcome::Complete) | Err(_) => break,
        }
    }
    let _ = dec.into_payload();
});
