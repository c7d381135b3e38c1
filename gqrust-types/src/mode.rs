//! History logging mode

use std::fmt;

use crate::error::Error;

/// What one byte in the history log counts. Selected through the
/// configuration block and echoed inside every timestamp tag the device
/// writes into the history stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LoggingMode {
    /// History logging disabled.
    Off = 0,
    /// One sample per second, counts per second.
    Cps = 1,
    /// One sample per minute, counts per minute.
    Cpm = 2,
    /// One sample per hour, CPM averaged over the hour.
    Cph = 3,
}

impl LoggingMode {
    /// Byte value as stored in NVM and in timestamp tags.
    pub fn wire(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for LoggingMode {
    type Error = Error;

    fn try_from(byte: u8) -> Result<Self, Error> {
        match byte {
            0 => Ok(LoggingMode::Off),
            1 => Ok(LoggingMode::Cps),
            2 => Ok(LoggingMode::Cpm),
            3 => Ok(LoggingMode::Cph),
            other => Err(Error::UnknownLoggingMode(other)),
        }
    }
}

impl fmt::Display for LoggingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LoggingMode::Off => "off",
            LoggingMode::Cps => "counts/second",
            LoggingMode::Cpm => "counts/minute",
            LoggingMode::Cph => "CPM hourly average",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_round_trip() {
        for mode in [
            LoggingMode::Off,
            LoggingMode::Cps,
            LoggingMode::Cpm,
            LoggingMode::Cph,
        ] {
            assert_eq!(LoggingMode::try_from(mode.wire()).unwrap(), mode);
        }
    }

    #[test]
    fn rejects_unknown_byte() {
        assert!(LoggingMode::try_from(4).is_err());
        assert!(LoggingMode::try_from(0xFF).is_err());
    }
}
