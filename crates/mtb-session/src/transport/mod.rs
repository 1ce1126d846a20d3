//! Byte transports the session controller talks to the scanner through.
//!
//! The controller only needs two things from a link: push a command out,
//! and grab whatever the scanner has sent since the last look without
//! blocking. [`serial`] is the real thing; [`mock`] replays a script for
//! tests.

pub mod mock;
pub mod serial;

use crate::error::TransportError;

pub use mock::MockTransport;
pub use serial::SerialTransport;

/// A half-duplex byte link to the scanner.
pub trait Transport {
    /// Write `bytes` to the scanner.
    fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError>;

    /// Return the bytes currently buffered, or `None` if there are none.
    ///
    /// Must not block waiting for data to arrive.
    fn read_available(&mut self) -> Result<Option<Vec<u8>>, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        (**self).write(bytes)
    }

    fn read_available(&mut self) -> Result<Option<Vec<u8>>, TransportError> {
        (**self).read_available()
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        (**self).write(bytes)
    }

    fn read_available(&mut self) -> Result<Option<Vec<u8>>, TransportError> {
        (**self).read_available()
    }
}
