use mtb_decoder::DecodeError;

/// Failures of the serial link.
///
/// The controller never reconnects: every variant is fatal for the run.
///
/// ```text
///   TransportError
///   ├── Open     ← port could not be opened (missing device, permissions)
///   ├── Serial   ← driver-level error while querying the port
///   └── Io       ← read/write failure on an open port
/// ```
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("cannot open serial port {port}: {source}")]
    Open {
        port: String,
        #[source]
        source: serialport::Error,
    },

    #[error(transparent)]
    Serial(#[from] serialport::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Errors that end a scanner session.
///
/// There is no partial-success mode. Whatever the cause, the run stops,
/// nothing is written, and the process reports failure.
///
/// ```text
///   SessionError
///   ├── Transport(TransportError)  ← serial link died
///   ├── Decode(DecodeError)        ← payload stream is corrupt
///   └── Sink                       ← payload could not be written out
/// ```
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),

    #[error("payload decode failure: {0}")]
    Decode(#[from] DecodeError),

    #[error("cannot write payload to {location}: {source}")]
    Sink {
        location: String,
        #[source]
        source: std::io::Error,
    },
}
