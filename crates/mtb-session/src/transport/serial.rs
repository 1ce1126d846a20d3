use std::io::{Read, Write};

use serialport::SerialPort;
use tracing::debug;

use crate::config::SerialSettings;
use crate::error::TransportError;
use crate::transport::Transport;

/// Scanner link over a serial port.
///
/// Reads ask the driver how many bytes are waiting and take exactly that
/// many, so a poll never blocks on an idle line.
pub struct SerialTransport {
    port: Box<dyn SerialPort>,
}

impl SerialTransport {
    /// Open the port described by `settings`.
    ///
    /// # Errors
    ///
    /// [`TransportError::Open`] if the device is missing, busy, or not
    /// accessible.
    pub fn open(settings: &SerialSettings) -> Result<Self, TransportError> {
        let port = serialport::new(settings.port.as_str(), settings.baud_rate)
            .timeout(settings.timeout)
            .open()
            .map_err(|source| TransportError::Open {
                port: settings.port.clone(),
                source,
            })?;
        debug!(port = %settings.port, baud = settings.baud_rate, "serial port open");
        Ok(Self { port })
    }
}

impl Transport for SerialTransport {
    fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        self.port.write_all(bytes)?;
        self.port.flush()?;
        Ok(())
    }

    fn read_available(&mut self) -> Result<Option<Vec<u8>>, TransportError> {
        let waiting = self.port.bytes_to_read()? as usize;
        if waiting == 0 {
            return Ok(None);
        }
        let mut buf = vec![0u8; waiting];
        self.port.read_exact(&mut buf)?;
        Ok(Some(buf))
    }
}
