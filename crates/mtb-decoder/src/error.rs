/// Errors that can occur while inflating a payload stream.
///
/// Any of these ends the current payload attempt. There is no recovery
/// inside a session: the caller drops it and, in practice, the whole run.
///
/// Error hierarchy:
///
/// ```text
///   DecodeError
///   ├── InvalidHeader      ← first byte is not a zlib CMF byte
///   ├── Corrupt            ← inflate rejected the chunk for the current state
///   ├── DecompressionBomb  ← output grew past the configured limit
///   ├── AlreadyComplete    ← chunk fed after end-of-stream
///   └── Poisoned           ← chunk fed after an earlier failure
/// ```
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The stream's first byte cannot start a zlib stream.
    ///
    /// Checked eagerly so a lone garbage byte fails on arrival instead of
    /// waiting for a second header byte that may never come.
    #[error("invalid zlib header byte {byte:#04X}")]
    InvalidHeader { byte: u8 },

    /// Inflate failed. Carries the codec's message.
    #[error("decompression failed: {0}")]
    Corrupt(String),

    /// Decompressed data exceeds the safety limit.
    #[error("decompressed size {actual} exceeds limit {limit}")]
    DecompressionBomb { actual: usize, limit: usize },

    #[error("stream already complete, no further chunks accepted")]
    AlreadyComplete,

    #[error("stream failed earlier, no further chunks accepted")]
    Poisoned,
}
