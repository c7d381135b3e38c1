//! Serial transport
//!
//! The GMC-300's USB bridge enumerates as a CDC serial port running
//! 57600 baud, eight data bits, no parity, one stop bit, no flow
//! control.

use std::io;
use std::time::Duration;

use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use tracing::{debug, trace};

use crate::{error::*, Transport};

/// Line settings for [`SerialTransport::open`].
#[derive(Debug, Clone)]
pub struct SerialConfig {
    /// Baud rate. Every GMC-300 runs 57600.
    pub baud_rate: u32,
    /// How long a read waits before deciding the device has nothing
    /// to say.
    pub read_timeout: Duration,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baud_rate: 57_600,
            read_timeout: Duration::from_millis(500),
        }
    }
}

/// Serial transport over the device's USB CDC port.
pub struct SerialTransport {
    port: Box<dyn SerialPort>,
    path: String,
    // Timeout currently programmed into the port, so per-read timeout
    // changes cost a syscall only when they differ.
    current_timeout: Duration,
}

impl SerialTransport {
    /// Open a serial port with the line settings the device expects.
    pub fn open(path: &str, config: &SerialConfig) -> Result<Self> {
        debug!(path, baud = config.baud_rate, "opening serial port");
        let port = serialport::new(path, config.baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(config.read_timeout)
            .open()
            .map_err(|source| Error::Open {
                path: path.to_string(),
                source,
            })?;
        Ok(Self {
            port,
            path: path.to_string(),
            current_timeout: config.read_timeout,
        })
    }

    fn set_read_timeout(&mut self, timeout: Duration) -> Result<()> {
        if timeout != self.current_timeout {
            self.port.set_timeout(timeout).map_err(io::Error::from)?;
            self.current_timeout = timeout;
        }
        Ok(())
    }
}

impl Transport for SerialTransport {
    fn write_all(&mut self, data: &[u8]) -> Result<()> {
        trace!(
            "sending {} bytes: {:02X?}",
            data.len(),
            &data[..data.len().min(16)]
        );
        self.port.write_all(data)?;
        self.port.flush()?;
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize> {
        self.set_read_timeout(timeout)?;
        match self.port.read(buf) {
            Ok(0) => Err(Error::Timeout),
            Ok(n) => {
                trace!("received {} bytes: {:02X?}", n, &buf[..n.min(16)]);
                Ok(n)
            }
            Err(e)
                if e.kind() == io::ErrorKind::TimedOut
                    || e.kind() == io::ErrorKind::WouldBlock =>
            {
                Err(Error::Timeout)
            }
            Err(e) => Err(Error::Io(e)),
        }
    }

    fn endpoint(&self) -> String {
        self.path.clone()
    }

    fn is_connected(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_line_settings() {
        let config = SerialConfig::default();
        assert_eq!(config.baud_rate, 57_600);
        assert_eq!(config.read_timeout, Duration::from_millis(500));
    }

    #[test]
    fn test_open_missing_port_fails() {
        let result =
            SerialTransport::open("/dev/nonexistent-gmc", &SerialConfig::default());
        assert!(matches!(result, Err(Error::Open { .. })));
    }
}
