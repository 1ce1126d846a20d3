//! Shared fixtures for the integration tests and benchmarks.
//!
//! Real captures from a scanner are not checked in, so payloads are
//! synthesised: deterministic pseudo-random bytes with enough repetition
//! to compress the way a ticket image does.

use std::io::Write;

use flate2::Compression;
use flate2::write::ZlibEncoder;

/// Compress `data` into a complete zlib stream.
pub fn zlib(data: &[u8]) -> Vec<u8> {
    let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
    enc.write_all(data).expect("writing to a Vec cannot fail");
    enc.finish().expect("writing to a Vec cannot fail")
}

/// A ticket-like payload of roughly `len` bytes.
pub fn ticket_payload(len: usize) -> Vec<u8> {
    let mut state: u32 = 0x1234_5678;
    let mut out = Vec::with_capacity(len);
    while out.len() < len {
        // xorshift32
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        if state % 3 == 0 {
            out.extend_from_slice(b"#UT01MTB ");
        } else {
            out.extend_from_slice(&state.to_le_bytes()[..2]);
        }
    }
    out.truncate(len);
    out
}

/// Split `stream` into chunks whose sizes cycle through `sizes`.
///
/// Mimics the uneven reads a serial driver hands back.
pub fn split_cycling(stream: &[u8], sizes: &[usize]) -> Vec<Vec<u8>> {
    assert!(sizes.iter().all(|&s| s > 0), "chunk sizes must be positive");
    let mut chunks = Vec::new();
    let mut rest = stream;
    for &size in sizes.iter().cycle() {
        if rest.is_empty() {
            break;
        }
        let (head, tail) = rest.split_at(size.min(rest.len()));
        chunks.push(head.to_vec());
        rest = tail;
    }
    chunks
}
