/// Implementation of the scanner read.
///
/// Opens the serial port, sends the startup commands, polls until a
/// complete payload has been inflated, and writes it to `--output`.
///
/// ```text
/// open port ─▶ AISRDS1! AISILLn! AISOMD1! ─▶ poll … poll ─▶ write file
/// ```
///
/// Nothing is written when the run fails, so a stale output file from an
/// earlier scan is left as it was.
use std::time::Duration;

use anyhow::{Context, Result};
use mtb_decoder::MAX_PAYLOAD_DECOMPRESSED_SIZE;
use mtb_session::transport::SerialTransport;
use mtb_session::{FileSink, SerialSettings, SessionConfig, SessionController};
use mtb_wire::IlluminationProfile;
use tracing::info;

use crate::Cli;

/// Run one scanner session.
///
/// # Errors
///
/// Returns an error if a flag value is invalid, the port cannot be opened,
/// the link fails, the stream is corrupt, or the output cannot be written.
pub fn run(cli: &Cli) -> Result<()> {
    let config = session_config(cli)?;
    let serial = SerialSettings {
        port: cli.port.clone(),
        baud_rate: cli.baudrate,
        ..SerialSettings::default()
    };

    let transport = SerialTransport::open(&serial)
        .with_context(|| format!("cannot open scanner on {}", serial.port))?;
    info!(
        port = %serial.port,
        baud = serial.baud_rate,
        illumination = %config.illumination,
        "scanner connected"
    );

    let mut sink = FileSink::new(&cli.output);
    let report = SessionController::new(transport, config)
        .run(&mut sink)
        .context("scanner session failed")?;

    info!(
        bytes = report.payload_len,
        chunks = report.chunks_received,
        acks = report.acks_received,
        "wrote {} bytes to {}",
        report.payload_len,
        sink.path().display()
    );
    Ok(())
}

/// Build the session configuration from command-line flags.
///
/// # Errors
///
/// Returns an error for an unknown illumination profile name.
fn session_config(cli: &Cli) -> Result<SessionConfig> {
    let illumination: IlluminationProfile = cli
        .illumination
        .parse()
        .context("invalid --illumination")?;

    Ok(SessionConfig {
        illumination,
        poll_interval: Duration::from_millis(cli.poll_interval_ms),
        max_payload_size: cli.max_size.unwrap_or(MAX_PAYLOAD_DECOMPRESSED_SIZE),
    })
}
