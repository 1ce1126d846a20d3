use flate2::{Decompress, FlushDecompress, Status};

use crate::error::DecodeError;

/// Default upper bound on a single decompressed payload (64 MiB).
///
/// Ticket images are a few kilobytes; anything near this size is a
/// runaway or hostile stream.
pub const MAX_PAYLOAD_DECOMPRESSED_SIZE: usize = 64 * 1024 * 1024;

/// Output buffer growth step when inflate fills the spare capacity.
const OUTPUT_STEP: usize = 16 * 1024;

/// Result of feeding one chunk to a [`PayloadDecompressor`].
///
/// A chunk that inflate rejects is not an outcome but an error
/// ([`DecodeError`]), after which the decompressor refuses further input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeedOutcome {
    /// All input was consumed and end-of-stream has not been seen yet.
    NeedMore,
    /// End-of-stream reached. Collect the bytes with
    /// [`into_payload`](PayloadDecompressor::into_payload).
    Complete,
}

/// Lifecycle of one payload stream.
///
/// ```text
///   Active ──StreamEnd──▶ Complete
///     │
///     └──error──▶ Failed
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StreamState {
    Active,
    Complete,
    Failed,
}

/// Incremental zlib decompressor for one payload.
///
/// Chunks are fed in arrival order as the scanner delivers them; the
/// compressed stream never has to be held in full. The decompressed bytes
/// collected so far are always a prefix of the final payload.
///
/// One instance covers exactly one payload attempt. Starting over (after
/// an acknowledgement, say) means dropping this value and creating a new
/// one, never rewinding it.
///
/// # Example
///
/// ```rust
/// use std::io::Write;
/// use flate2::{Compression, write::ZlibEncoder};
/// use mtb_decoder::{FeedOutcome, PayloadDecompressor};
///
/// let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
/// enc.write_all(b"HELLO").unwrap();
/// let stream = enc.finish().unwrap();
/// let (c1, c2) = stream.split_at(3);
///
/// let mut dec = PayloadDecompressor::new();
/// assert_eq!(dec.feed(c1).unwrap(), FeedOutcome::NeedMore);
/// assert_eq!(dec.feed(c2).unwrap(), FeedOutcome::Complete);
/// assert_eq!(dec.into_payload().unwrap(), b"HELLO");
/// ```
pub struct PayloadDecompressor {
    codec: Decompress,
    output: Vec<u8>,
    state: StreamState,
    max_size: usize,
    trailing_bytes: usize,
    header_checked: bool,
}

impl PayloadDecompressor {
    /// Create a decompressor with the default size limit.
    #[must_use]
    pub fn new() -> Self {
        Self::with_limit(MAX_PAYLOAD_DECOMPRESSED_SIZE)
    }

    /// Create a decompressor that fails once output exceeds `max_size`.
    #[must_use]
    pub fn with_limit(max_size: usize) -> Self {
        Self {
            codec: Decompress::new(true),
            output: Vec::new(),
            state: StreamState::Active,
            max_size,
            trailing_bytes: 0,
            header_checked: false,
        }
    }

    /// Feed the next chunk of the compressed stream.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::InvalidHeader`] if the very first byte cannot open
    ///   a zlib stream.
    /// - [`DecodeError::Corrupt`] if inflate rejects the data.
    /// - [`DecodeError::DecompressionBomb`] if output passes the limit.
    /// - [`DecodeError::AlreadyComplete`] / [`DecodeError::Poisoned`] if
    ///   the stream already ended or failed.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<FeedOutcome, DecodeError> {
        match self.state {
            StreamState::Complete => return Err(DecodeError::AlreadyComplete),
            StreamState::Failed => return Err(DecodeError::Poisoned),
            StreamState::Active => {}
        }

        let result = self.inflate(chunk);
        match result {
            Ok(FeedOutcome::Complete) => self.state = StreamState::Complete,
            Ok(FeedOutcome::NeedMore) => {}
            Err(_) => self.state = StreamState::Failed,
        }
        result
    }

    fn inflate(&mut self, chunk: &[u8]) -> Result<FeedOutcome, DecodeError> {
        if !self.header_checked {
            if let Some(&byte) = chunk.first() {
                if !is_zlib_cmf(byte) {
                    return Err(DecodeError::InvalidHeader { byte });
                }
                self.header_checked = true;
            }
        }

        let mut input = chunk;
        loop {
            if self.output.len() == self.output.capacity() {
                self.output.reserve(OUTPUT_STEP);
            }

            let in_before = self.codec.total_in();
            let status = self
                .codec
                .decompress_vec(input, &mut self.output, FlushDecompress::None)
                .map_err(|e| DecodeError::Corrupt(e.to_string()))?;
            #[allow(clippy::cast_possible_truncation)]
            let consumed = (self.codec.total_in() - in_before) as usize;
            input = &input[consumed..];

            if self.output.len() > self.max_size {
                return Err(DecodeError::DecompressionBomb {
                    actual: self.output.len(),
                    limit: self.max_size,
                });
            }

            match status {
                Status::StreamEnd => {
                    self.trailing_bytes = input.len();
                    return Ok(FeedOutcome::Complete);
                }
                Status::Ok | Status::BufError => {
                    // Spare capacity left means inflate stopped for lack of
                    // input, not lack of room.
                    let room_left = self.output.len() < self.output.capacity();
                    if room_left && (input.is_empty() || consumed == 0) {
                        return Ok(FeedOutcome::NeedMore);
                    }
                }
            }
        }
    }

    /// Decompressed bytes produced so far.
    pub fn decompressed(&self) -> &[u8] {
        &self.output
    }

    /// Compressed bytes consumed so far.
    pub fn compressed_len(&self) -> u64 {
        self.codec.total_in()
    }

    /// Bytes that followed end-of-stream in the final chunk and were ignored.
    pub fn trailing_bytes(&self) -> usize {
        self.trailing_bytes
    }

    pub fn is_complete(&self) -> bool {
        self.state == StreamState::Complete
    }

    /// Take the finished payload.
    ///
    /// Returns `None` unless end-of-stream was reached. Consuming `self`
    /// means the payload can be handed out only once.
    pub fn into_payload(self) -> Option<Vec<u8>> {
        (self.state == StreamState::Complete).then_some(self.output)
    }
}

impl Default for PayloadDecompressor {
    fn default() -> Self {
        Self::new()
    }
}

/// A zlib CMF byte names method 8 (deflate) with a window of at most 32K.
fn is_zlib_cmf(byte: u8) -> bool {
    byte & 0x0F == 8 && byte >> 4 <= 7
}
