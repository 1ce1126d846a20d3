/// Tag carried at the start of every scanner-originated protocol reply.
pub const ACK_TAG: [u8; 3] = *b"AIS";

/// Classification of one chunk read from the transport.
///
/// ```text
///   chunk ──▶ starts with "AIS"? ──yes──▶ Ack   (reset point, body ignored)
///                    │
///                    no
///                    ▼
///                  Data  (next slice of the compressed stream)
///
///   empty chunk ──▶ None (same as "nothing available")
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Frame<'a> {
    /// A reply to a command. The rest of the chunk carries no stream data.
    Ack(&'a [u8]),
    /// Part of the compressed payload stream.
    Data(&'a [u8]),
}

impl Frame<'_> {
    pub fn is_ack(&self) -> bool {
        matches!(self, Self::Ack(_))
    }

    /// The raw chunk bytes, tag included for acks.
    pub fn bytes(&self) -> &[u8] {
        match self {
            Self::Ack(b) | Self::Data(b) => b,
        }
    }
}

/// Classify a chunk by prefix only.
///
/// Returns `None` for a zero-length chunk. Length and trailing content do
/// not matter: `b"AIS"` alone is an ack, and `b"AI"` is data.
pub fn classify(chunk: &[u8]) -> Option<Frame<'_>> {
    if chunk.is_empty() {
        None
    } else if chunk.starts_with(&ACK_TAG) {
        Some(Frame::Ack(chunk))
    } else {
        Some(Frame::Data(chunk))
    }
}
