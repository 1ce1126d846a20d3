/// `mtb-read`: pull one compressed MTB ticket payload off a serial
/// barcode scanner and write the inflated bytes to a file.
///
/// ```text
/// mtb-read [OPTIONS]
///
/// Options:
///   --port <PORT>                 Scanner serial port
///   --baudrate <BAUD>             Scanner baud rate
///   --output <FILE>               Output filename
///   --illumination <PROFILE>      phone-only | paper-only | paper-optimized | phone-optimized
///   --poll-interval-ms <MS>       Delay between polls of the port
///   --max-size <BYTES>            Largest payload accepted after inflating
///   --debug                       Enable debug logging
///   -h, --help                    Print help
///   -V, --version                 Print version
/// ```
///
/// # Exit codes
///
/// | Code | Meaning                                                |
/// |------|--------------------------------------------------------|
/// | 0    | Payload received and written                           |
/// | 1    | Error (port, transport, corrupt stream, write failure) |
///
/// The tool waits for a scan indefinitely. Stop it with Ctrl-C.
use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use mtb_session::config::{DEFAULT_BAUD_RATE, DEFAULT_PORT};

mod cmd_read;

/// Default output file for the reconstructed payload.
const DEFAULT_OUTPUT: &str = "mtb.bin";

/// Read an MTB payload from a ticket scanner.
#[derive(Parser)]
#[command(name = "mtb-read", version, about = "Read MTB from a ticket scanner")]
pub struct Cli {
    /// Scanner serial port.
    #[arg(long, default_value = DEFAULT_PORT)]
    pub port: String,

    /// Scanner baud rate.
    #[arg(long, default_value_t = DEFAULT_BAUD_RATE)]
    pub baudrate: u32,

    /// Output filename.
    #[arg(long, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Illumination profile sent during startup.
    #[arg(long, default_value = "phone-optimized")]
    pub illumination: String,

    /// Delay between two polls of the serial port, in milliseconds.
    #[arg(long, default_value_t = 1000)]
    pub poll_interval_ms: u64,

    /// Largest decompressed payload accepted, in bytes.
    #[arg(long)]
    pub max_size: Option<usize>,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    if let Err(e) = cmd_read::run(&cli) {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

/// `RUST_LOG` wins when set; otherwise `info`, or `debug` with `--debug`.
fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}
