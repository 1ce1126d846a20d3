use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Destination for the reconstructed payload.
///
/// The controller calls [`deliver`](Self::deliver) exactly once per
/// successful run and never with partial data.
pub trait PayloadSink {
    fn deliver(&mut self, payload: &[u8]) -> io::Result<()>;

    /// Human-readable location for diagnostics.
    fn location(&self) -> String;
}

/// Writes the payload to a file, replacing any previous contents.
#[derive(Clone, Debug)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PayloadSink for FileSink {
    fn deliver(&mut self, payload: &[u8]) -> io::Result<()> {
        fs::write(&self.path, payload)
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Keeps delivered payloads in memory. Used by tests.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    pub deliveries: Vec<Vec<u8>>,
}

impl PayloadSink for MemorySink {
    fn deliver(&mut self, payload: &[u8]) -> io::Result<()> {
        self.deliveries.push(payload.to_vec());
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}

impl<S: PayloadSink + ?Sized> PayloadSink for &mut S {
    fn deliver(&mut self, payload: &[u8]) -> io::Result<()> {
        (**self).deliver(payload)
    }

    fn location(&self) -> String {
        (**self).location()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_sink_writes_and_overwrites() {
        let path = std::env::temp_dir().join(format!("mtb-sink-{}.bin", std::process::id()));
        let mut sink = FileSink::new(&path);
        sink.deliver(b"first payload").unwrap();
        sink.deliver(b"second").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"second");
        assert_eq!(sink.location(), path.display().to_string());
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn file_sink_reports_missing_directory() {
        let mut sink = FileSink::new("/nonexistent-mtb-dir/out.bin");
        assert!(sink.deliver(b"x").is_err());
    }
}
