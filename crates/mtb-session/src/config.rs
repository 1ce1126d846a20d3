use std::time::Duration;

use mtb_decoder::MAX_PAYLOAD_DECOMPRESSED_SIZE;
use mtb_wire::IlluminationProfile;

/// Serial device the scanner shows up as on the development machine.
pub const DEFAULT_PORT: &str = "/dev/tty.usbmodem1143101";

/// Baud rate the scanner is configured for.
pub const DEFAULT_BAUD_RATE: u32 = 115_220;

/// Delay between two polls of the transport.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Configuration for a scanner session.
///
/// ```text
/// ┌──────────────────┬───────────────────────────────────────────────┐
/// │ Field            │ Purpose                                       │
/// ├──────────────────┼───────────────────────────────────────────────┤
/// │ illumination     │ Profile sent with AISILL during startup       │
/// │ poll_interval    │ Sleep before each transport poll              │
/// │ max_payload_size │ Decompression bomb guard for one payload      │
/// └──────────────────┴───────────────────────────────────────────────┘
/// ```
///
/// There is no data timeout. The session polls until a payload completes
/// or something fails.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    pub illumination: IlluminationProfile,
    pub poll_interval: Duration,
    pub max_payload_size: usize,
}

impl Default for SessionConfig {
    /// Phone-optimised illumination, one poll per second, 64 MiB limit.
    fn default() -> Self {
        Self {
            illumination: IlluminationProfile::default(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_payload_size: MAX_PAYLOAD_DECOMPRESSED_SIZE,
        }
    }
}

/// Where and how to open the scanner's serial port.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SerialSettings {
    pub port: String,
    pub baud_rate: u32,
    /// Timeout for a single blocking read or write on the port. Reads
    /// only ever ask for bytes already buffered, so this rarely matters.
    pub timeout: Duration,
}

impl Default for SerialSettings {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT.to_string(),
            baud_rate: DEFAULT_BAUD_RATE,
            timeout: Duration::from_millis(500),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.illumination, IlluminationProfile::PhoneOptimized);
        assert_eq!(config.poll_interval, Duration::from_secs(1));
        assert_eq!(config.max_payload_size, 64 * 1024 * 1024);

        let serial = SerialSettings::default();
        assert_eq!(serial.baud_rate, 115_220);
        assert_eq!(serial.port, DEFAULT_PORT);
    }
}
