//! Command frames
//!
//! Every request is an ASCII mnemonic wrapped in `<` and `>>`, with
//! raw binary parameter bytes between the mnemonic and the terminator
//! where the command takes any.

use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};

use gqrust_types::SoftKey;

use crate::constants::{CONFIG_SIZE, SERIAL_LEN, VERSION_LEN};
use crate::history::HistorySpan;

/// A request frame for the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    // === Identity ===
    /// Firmware model and revision
    GetVersion,
    /// Unit serial number
    GetSerial,

    // === Readings ===
    /// Counts per minute
    GetCpm,
    /// Counts per second
    GetCps,
    /// Battery voltage
    GetVoltage,

    // === Configuration ===
    /// Whole 256-byte configuration block
    GetConfig,
    /// Erase NVM back to factory defaults
    EraseConfig,
    /// Apply previously written configuration bytes
    UpdateConfig,
    /// Write one configuration byte at an offset
    WriteConfigByte { offset: u8, value: u8 },

    // === History ===
    /// Read a window of the history flash
    ReadHistory(HistorySpan),

    // === Streaming ===
    /// Start the once-a-second CPS feed
    HeartbeatOn,
    /// Stop the CPS feed
    HeartbeatOff,

    // === Control ===
    /// Switch the unit off
    PowerOff,
    /// Emulate a front-panel key press
    SendKey(SoftKey),

    // === Clock ===
    SetDateMonth(u8),
    SetDateDay(u8),
    SetDateYear(u8),
    SetTimeHour(u8),
    SetTimeMinute(u8),
    SetTimeSecond(u8),
}

impl Command {
    /// Build the wire frame.
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(16);
        buf.put_u8(b'<');
        buf.put_slice(self.name().as_bytes());
        match self {
            Self::WriteConfigByte { offset, value } => {
                buf.put_u8(*offset);
                buf.put_u8(*value);
            }
            Self::ReadHistory(span) => {
                // Address high byte first across three bytes, then the
                // length high byte first across two.
                let address = span.address();
                buf.put_u8((address >> 16) as u8);
                buf.put_u8((address >> 8) as u8);
                buf.put_u8(address as u8);
                buf.put_u16(span.length());
            }
            Self::SendKey(key) => buf.put_u8(key.wire()),
            Self::SetDateMonth(v)
            | Self::SetDateDay(v)
            | Self::SetDateYear(v)
            | Self::SetTimeHour(v)
            | Self::SetTimeMinute(v)
            | Self::SetTimeSecond(v) => buf.put_u8(*v),
            _ => {}
        }
        buf.put_slice(b">>");
        buf.freeze()
    }

    /// Exact number of reply bytes the device answers with.
    pub fn reply_len(&self) -> usize {
        match self {
            Self::GetVersion => VERSION_LEN,
            Self::GetSerial => SERIAL_LEN,
            Self::GetCpm | Self::GetCps => 2,
            Self::GetVoltage => 1,
            Self::GetConfig => CONFIG_SIZE,
            Self::ReadHistory(span) => usize::from(span.length()),
            Self::EraseConfig
            | Self::UpdateConfig
            | Self::WriteConfigByte { .. }
            | Self::SetDateMonth(_)
            | Self::SetDateDay(_)
            | Self::SetDateYear(_)
            | Self::SetTimeHour(_)
            | Self::SetTimeMinute(_)
            | Self::SetTimeSecond(_) => 1,
            Self::HeartbeatOn
            | Self::HeartbeatOff
            | Self::PowerOff
            | Self::SendKey(_) => 0,
        }
    }

    /// Commands whose single reply byte is an acknowledgement rather
    /// than data. The device answers these with 0xAA, though arrival
    /// of any byte is what confirms the write took.
    pub fn is_acked(&self) -> bool {
        matches!(
            self,
            Self::EraseConfig
                | Self::UpdateConfig
                | Self::WriteConfigByte { .. }
                | Self::SetDateMonth(_)
                | Self::SetDateDay(_)
                | Self::SetDateYear(_)
                | Self::SetTimeHour(_)
                | Self::SetTimeMinute(_)
                | Self::SetTimeSecond(_)
        )
    }

    /// Wire mnemonic, without the frame decorations.
    pub fn name(&self) -> &'static str {
        match self {
            Self::GetVersion => "GETVER",
            Self::GetSerial => "GETSERIAL",
            Self::GetCpm => "GETCPM",
            Self::GetCps => "GETCPS",
            Self::GetVoltage => "GETVOLT",
            Self::GetConfig => "GETCFG",
            Self::EraseConfig => "ECFG",
            Self::UpdateConfig => "CFGUPDATE",
            Self::WriteConfigByte { .. } => "WCFG",
            Self::ReadHistory(_) => "SPIR",
            Self::HeartbeatOn => "HEARTBEAT1",
            Self::HeartbeatOff => "HEARTBEAT0",
            Self::PowerOff => "POWEROFF",
            Self::SendKey(_) => "KEY",
            Self::SetDateMonth(_) => "SETDATEMM",
            Self::SetDateDay(_) => "SETDATEDD",
            Self::SetDateYear(_) => "SETDATEYY",
            Self::SetTimeHour(_) => "SETTIMEHH",
            Self::SetTimeMinute(_) => "SETTIMEMM",
            Self::SetTimeSecond(_) => "SETTIMESS",
        }
    }

    /// The driver operation this frame belongs to.
    pub fn operation(&self) -> Operation {
        match self {
            Self::GetVersion => Operation::Version,
            Self::GetSerial => Operation::SerialNumber,
            Self::GetCpm => Operation::Cpm,
            Self::GetCps => Operation::Cps,
            Self::GetVoltage => Operation::Voltage,
            Self::GetConfig => Operation::ConfigRead,
            Self::EraseConfig => Operation::ConfigErase,
            Self::UpdateConfig => Operation::ConfigUpdate,
            Self::WriteConfigByte { .. } => Operation::ConfigWrite,
            Self::ReadHistory(_) => Operation::HistoryRead,
            Self::HeartbeatOn => Operation::StreamStart,
            Self::HeartbeatOff => Operation::StreamStop,
            Self::PowerOff => Operation::PowerOff,
            Self::SendKey(_) => Operation::SendKey,
            Self::SetDateMonth(_) => Operation::SetMonth,
            Self::SetDateDay(_) => Operation::SetDay,
            Self::SetDateYear(_) => Operation::SetYear,
            Self::SetTimeHour(_) => Operation::SetHour,
            Self::SetTimeMinute(_) => Operation::SetMinute,
            Self::SetTimeSecond(_) => Operation::SetSecond,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Driver operations, for error attribution and logging. Streamed CPS
/// reads have no command frame of their own, so this is broader than
/// [`Command`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Version,
    SerialNumber,
    Cpm,
    Cps,
    AutoCps,
    Voltage,
    ConfigRead,
    ConfigErase,
    ConfigWrite,
    ConfigUpdate,
    HistoryRead,
    SendKey,
    SetYear,
    SetMonth,
    SetDay,
    SetHour,
    SetMinute,
    SetSecond,
    PowerOff,
    StreamStart,
    StreamStop,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Version => "read firmware version",
            Self::SerialNumber => "read serial number",
            Self::Cpm => "read CPM",
            Self::Cps => "read CPS",
            Self::AutoCps => "read streamed CPS",
            Self::Voltage => "read battery voltage",
            Self::ConfigRead => "read configuration",
            Self::ConfigErase => "erase configuration",
            Self::ConfigWrite => "write configuration byte",
            Self::ConfigUpdate => "apply configuration",
            Self::HistoryRead => "read history",
            Self::SendKey => "send key press",
            Self::SetYear => "set year",
            Self::SetMonth => "set month",
            Self::SetDay => "set day",
            Self::SetHour => "set hour",
            Self::SetMinute => "set minute",
            Self::SetSecond => "set second",
            Self::PowerOff => "power off",
            Self::StreamStart => "start CPS stream",
            Self::StreamStop => "stop CPS stream",
        };
        f.write_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_plain_frames() {
        assert_eq!(&Command::GetVersion.encode()[..], b"<GETVER>>");
        assert_eq!(&Command::GetSerial.encode()[..], b"<GETSERIAL>>");
        assert_eq!(&Command::GetCpm.encode()[..], b"<GETCPM>>");
        assert_eq!(&Command::GetCps.encode()[..], b"<GETCPS>>");
        assert_eq!(&Command::GetVoltage.encode()[..], b"<GETVOLT>>");
        assert_eq!(&Command::GetConfig.encode()[..], b"<GETCFG>>");
        assert_eq!(&Command::EraseConfig.encode()[..], b"<ECFG>>");
        assert_eq!(&Command::UpdateConfig.encode()[..], b"<CFGUPDATE>>");
        assert_eq!(&Command::HeartbeatOn.encode()[..], b"<HEARTBEAT1>>");
        assert_eq!(&Command::HeartbeatOff.encode()[..], b"<HEARTBEAT0>>");
        assert_eq!(&Command::PowerOff.encode()[..], b"<POWEROFF>>");
    }

    #[test]
    fn test_write_config_frame() {
        let cmd = Command::WriteConfigByte {
            offset: 0x20,
            value: 0x02,
        };
        assert_eq!(&cmd.encode()[..], b"<WCFG\x20\x02>>");
    }

    #[test]
    fn test_history_frame_packs_high_byte_first() {
        let span = HistorySpan::new(0x0123F0, 0x0400).unwrap();
        let frame = Command::ReadHistory(span).encode();
        assert_eq!(&frame[..5], b"<SPIR");
        assert_eq!(&frame[5..10], &[0x01, 0x23, 0xF0, 0x04, 0x00]);
        assert_eq!(&frame[10..], b">>");
    }

    #[test]
    fn test_key_frames_use_ascii_digits() {
        assert_eq!(&Command::SendKey(SoftKey::Key1).encode()[..], b"<KEY0>>");
        assert_eq!(&Command::SendKey(SoftKey::ENTER).encode()[..], b"<KEY3>>");
    }

    #[test]
    fn test_clock_frames_take_one_binary_byte() {
        assert_eq!(&Command::SetDateYear(12).encode()[..], b"<SETDATEYY\x0c>>");
        assert_eq!(&Command::SetDateMonth(4).encode()[..], b"<SETDATEMM\x04>>");
        assert_eq!(&Command::SetDateDay(1).encode()[..], b"<SETDATEDD\x01>>");
        assert_eq!(&Command::SetTimeHour(17).encode()[..], b"<SETTIMEHH\x11>>");
        assert_eq!(
            &Command::SetTimeMinute(31).encode()[..],
            b"<SETTIMEMM\x1f>>"
        );
        assert_eq!(
            &Command::SetTimeSecond(10).encode()[..],
            b"<SETTIMESS\x0a>>"
        );
    }

    #[test]
    fn test_reply_lengths() {
        assert_eq!(Command::GetVersion.reply_len(), 14);
        assert_eq!(Command::GetSerial.reply_len(), 7);
        assert_eq!(Command::GetCpm.reply_len(), 2);
        assert_eq!(Command::GetVoltage.reply_len(), 1);
        assert_eq!(Command::GetConfig.reply_len(), 256);
        assert_eq!(Command::EraseConfig.reply_len(), 1);
        assert_eq!(Command::PowerOff.reply_len(), 0);
        assert_eq!(Command::SendKey(SoftKey::Key2).reply_len(), 0);
        let span = HistorySpan::new(16, 512).unwrap();
        assert_eq!(Command::ReadHistory(span).reply_len(), 512);
    }

    #[test]
    fn test_ack_classification() {
        assert!(Command::EraseConfig.is_acked());
        assert!(Command::SetTimeSecond(0).is_acked());
        assert!(!Command::GetVoltage.is_acked());
        assert!(!Command::PowerOff.is_acked());
    }

    #[test]
    fn test_display_is_the_mnemonic() {
        assert_eq!(Command::GetVersion.to_string(), "GETVER");
        assert_eq!(Operation::AutoCps.to_string(), "read streamed CPS");
    }

    proptest! {
        #[test]
        fn test_history_frame_round_trips(
            address in 0u32..0x10000,
            length in 0u16..=4096,
        ) {
            prop_assume!(u64::from(address) + u64::from(length) <= 0x10000);
            let span = HistorySpan::new(address, length).unwrap();
            let frame = Command::ReadHistory(span).encode();
            prop_assert_eq!(frame.len(), 12);
            let unpacked_address = u32::from(frame[5]) << 16
                | u32::from(frame[6]) << 8
                | u32::from(frame[7]);
            let unpacked_length =
                u16::from(frame[8]) << 8 | u16::from(frame[9]);
            prop_assert_eq!(unpacked_address, address);
            prop_assert_eq!(unpacked_length, length);
        }
    }
}
