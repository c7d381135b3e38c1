//! Transport layer for GMC geiger counters
//!
//! The hardware presents itself as a USB CDC serial port. Everything
//! above this crate speaks in terms of the [`Transport`] trait, so the
//! driver can be exercised against [`MockTransport`] without a device
//! on the bench.

pub mod error;
pub mod mock;
pub mod serial;

pub use error::{Error, Result};
pub use mock::{MockTransport, SharedMock};
pub use serial::{SerialConfig, SerialTransport};

use std::time::Duration;

/// Byte-level connection to a device.
///
/// Replies carry no framing, so reads are purely length-and-deadline
/// driven: the caller always knows how many bytes it wants and how
/// long it is willing to wait.
pub trait Transport: Send {
    /// Send a complete frame.
    fn write_all(&mut self, data: &[u8]) -> Result<()>;

    /// Read up to `buf.len()` bytes, waiting at most `timeout` for the
    /// first of them. Never returns `Ok(0)`; an empty wire is
    /// [`Error::Timeout`].
    fn read(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize>;

    /// Human-readable name of the endpoint, for logs.
    fn endpoint(&self) -> String;

    /// Whether the underlying connection is usable.
    fn is_connected(&self) -> bool;

    /// Read exactly `buf.len()` bytes. A timeout before the first byte
    /// is [`Error::Timeout`]; a timeout part-way through is
    /// [`Error::ShortRead`].
    fn read_exact(&mut self, buf: &mut [u8], timeout: Duration) -> Result<()> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.read(&mut buf[filled..], timeout) {
                Ok(n) => filled += n,
                Err(Error::Timeout) if filled == 0 => return Err(Error::Timeout),
                Err(Error::Timeout) => {
                    return Err(Error::ShortRead {
                        expected: buf.len(),
                        got: filled,
                    });
                }
                Err(other) => return Err(other),
            }
        }
        Ok(())
    }
}
