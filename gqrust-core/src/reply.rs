//! Reply decoding
//!
//! Replies carry no framing at all: the host knows how many bytes each
//! command answers with and reads exactly that many. These helpers
//! turn the raw bytes into values.

use byteorder::{BigEndian, ByteOrder};

use gqrust_types::DeviceInfo;

use crate::constants::{RATE_MASK, SERIAL_LEN, VERSION_LEN};
use crate::error::{Error, Result};

fn check_len(reply: &[u8], expected: usize) -> Result<()> {
    if reply.len() != expected {
        return Err(Error::ReplyLength {
            expected,
            actual: reply.len(),
        });
    }
    Ok(())
}

/// Decode a two-byte CPM or CPS reply.
///
/// The count arrives high byte first with status flags in the top two
/// bits, so only fourteen bits of count survive.
pub fn decode_rate(reply: &[u8]) -> Result<u16> {
    check_len(reply, 2)?;
    Ok(BigEndian::read_u16(reply) & RATE_MASK)
}

/// Decode a one-byte battery voltage reply into volts. The byte holds
/// tenths of a volt.
pub fn decode_voltage(reply: &[u8]) -> Result<f32> {
    check_len(reply, 1)?;
    Ok(f32::from(reply[0] as i8) / 10.0)
}

/// Render a seven-byte serial number reply as the fourteen-digit hex
/// string printed on the unit.
pub fn decode_serial(reply: &[u8]) -> Result<String> {
    check_len(reply, SERIAL_LEN)?;
    Ok(hex::encode(reply))
}

/// Decode a fourteen-byte version reply.
pub fn decode_version(reply: &[u8]) -> Result<DeviceInfo> {
    check_len(reply, VERSION_LEN)?;
    Ok(DeviceInfo::parse(String::from_utf8_lossy(reply)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_rate_passes_plain_counts() {
        assert_eq!(decode_rate(&[0x12, 0x34]).unwrap(), 0x1234);
        assert_eq!(decode_rate(&[0x00, 0x07]).unwrap(), 7);
    }

    #[test]
    fn test_rate_masks_status_bits() {
        assert_eq!(decode_rate(&[0xFF, 0xFF]).unwrap(), 0x3FFF);
        assert_eq!(decode_rate(&[0x40, 0x01]).unwrap(), 1);
    }

    #[test]
    fn test_rate_rejects_wrong_length() {
        assert!(matches!(
            decode_rate(&[0x12]),
            Err(Error::ReplyLength {
                expected: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_voltage_in_tenths() {
        assert_eq!(decode_voltage(&[0x60]).unwrap(), 9.6);
        assert_eq!(decode_voltage(&[0x00]).unwrap(), 0.0);
    }

    #[test]
    fn test_serial_renders_as_hex() {
        let reply = [0x00, 0x30, 0x0F, 0x05, 0x0A, 0x78, 0x94];
        assert_eq!(decode_serial(&reply).unwrap(), "00300f050a7894");
    }

    #[test]
    fn test_version_reply() {
        let info = decode_version(b"GMC-300Re 4.20").unwrap();
        assert_eq!(info.model(), "GMC-300Re");
        assert_eq!(info.revision(), Some(4.20));
    }
}
