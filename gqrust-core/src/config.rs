//! Configuration block
//!
//! The device keeps every setting in a 256-byte NVM block that is read
//! and written only as a whole. [`Config`] is the host-side mirror of
//! that block: field accessors edit the mirror, and the device sees
//! nothing until the whole mirror is committed back.
//!
//! Multi-byte fields are big-endian in the block. Toggle fields hold 0
//! or 1. Offsets past 58 are reserved and carried through untouched.

use std::fmt;

use byteorder::{BigEndian, ByteOrder};

use gqrust_types::{DeviceDateTime, LoggingMode};

use crate::constants::config as offset;
use crate::constants::{CONFIG_SIZE, DATA_SAVE_RESET};
use crate::error::{Error, Result};

/// Number of points on the CPM to µSv/h calibration curve.
pub const CALIBRATION_POINTS: usize = 3;

/// One point of the calibration curve: a count rate and the dose rate
/// the display should show for it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationPoint {
    pub cpm: u16,
    pub usv_per_hour: f32,
}

/// Host-side mirror of the device configuration block.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    bytes: [u8; CONFIG_SIZE],
}

impl Config {
    /// Wrap a block as read from the device.
    pub fn from_bytes(bytes: [u8; CONFIG_SIZE]) -> Self {
        Self { bytes }
    }

    /// The raw block, as it would be written back.
    pub fn as_bytes(&self) -> &[u8; CONFIG_SIZE] {
        &self.bytes
    }

    // === Display and sound toggles ===

    pub fn power_on(&self) -> bool {
        self.flag(offset::POWER)
    }

    pub fn set_power_on(&mut self, on: bool) {
        self.set_flag(offset::POWER, on);
    }

    pub fn alarm_enabled(&self) -> bool {
        self.flag(offset::ALARM)
    }

    pub fn set_alarm_enabled(&mut self, on: bool) {
        self.set_flag(offset::ALARM, on);
    }

    pub fn speaker_enabled(&self) -> bool {
        self.flag(offset::SPEAKER)
    }

    pub fn set_speaker_enabled(&mut self, on: bool) {
        self.set_flag(offset::SPEAKER, on);
    }

    pub fn graphic_mode(&self) -> bool {
        self.flag(offset::GRAPHIC_MODE)
    }

    pub fn set_graphic_mode(&mut self, on: bool) {
        self.set_flag(offset::GRAPHIC_MODE, on);
    }

    pub fn backlight_timeout(&self) -> u8 {
        self.bytes[offset::BACKLIGHT_TIMEOUT]
    }

    pub fn set_backlight_timeout(&mut self, seconds: u8) {
        self.bytes[offset::BACKLIGHT_TIMEOUT] = seconds;
    }

    pub fn idle_title_mode(&self) -> u8 {
        self.bytes[offset::IDLE_TITLE]
    }

    pub fn set_idle_title_mode(&mut self, mode: u8) {
        self.bytes[offset::IDLE_TITLE] = mode;
    }

    pub fn idle_display_mode(&self) -> u8 {
        self.bytes[offset::IDLE_DISPLAY]
    }

    pub fn set_idle_display_mode(&mut self, mode: u8) {
        self.bytes[offset::IDLE_DISPLAY] = mode;
    }

    pub fn swivel_display(&self) -> bool {
        self.flag(offset::SWIVEL_DISPLAY)
    }

    pub fn set_swivel_display(&mut self, on: bool) {
        self.set_flag(offset::SWIVEL_DISPLAY, on);
    }

    pub fn zoom(&self) -> f32 {
        self.read_f32(offset::ZOOM)
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        self.write_f32(offset::ZOOM, zoom);
    }

    // === Alarm ===

    pub fn alarm_cpm(&self) -> u16 {
        self.read_u16(offset::ALARM_CPM)
    }

    pub fn set_alarm_cpm(&mut self, cpm: u16) {
        self.write_u16(offset::ALARM_CPM, cpm);
    }

    pub fn alarm_usv_per_hour(&self) -> f32 {
        self.read_f32(offset::ALARM_USV)
    }

    pub fn set_alarm_usv_per_hour(&mut self, usv: f32) {
        self.write_f32(offset::ALARM_USV, usv);
    }

    pub fn alarm_type(&self) -> u8 {
        self.bytes[offset::ALARM_TYPE]
    }

    pub fn set_alarm_type(&mut self, alarm_type: u8) {
        self.bytes[offset::ALARM_TYPE] = alarm_type;
    }

    // === Calibration ===

    /// Read one calibration point. Points are numbered 0 through 2.
    pub fn calibration(&self, point: usize) -> Result<CalibrationPoint> {
        let (cpm, usv) = Self::calibration_offsets(point)?;
        Ok(CalibrationPoint {
            cpm: self.read_u16(cpm),
            usv_per_hour: self.read_f32(usv),
        })
    }

    /// Replace one calibration point.
    pub fn set_calibration(
        &mut self,
        point: usize,
        cal: CalibrationPoint,
    ) -> Result<()> {
        let (cpm, usv) = Self::calibration_offsets(point)?;
        self.write_u16(cpm, cal.cpm);
        self.write_f32(usv, cal.usv_per_hour);
        Ok(())
    }

    fn calibration_offsets(point: usize) -> Result<(usize, usize)> {
        if point >= CALIBRATION_POINTS {
            return Err(Error::FieldRange {
                offset: offset::CALIBRATION_CPM_0 + 6 * point,
                len: 6,
            });
        }
        let cpm = offset::CALIBRATION_CPM_0 + 6 * point;
        Ok((cpm, cpm + 2))
    }

    // === History logging ===

    /// The configured logging mode, or `None` when the stored byte is
    /// not one the mode table knows (fresh NVM reads 0xFF).
    pub fn logging_mode(&self) -> Option<LoggingMode> {
        LoggingMode::try_from(self.bytes[offset::LOGGING_MODE]).ok()
    }

    pub fn set_logging_mode(&mut self, mode: LoggingMode) {
        self.bytes[offset::LOGGING_MODE] = mode.wire();
    }

    /// Flash address the next history sample will be written to.
    pub fn data_save_address(&self) -> u32 {
        self.read_u24(offset::DATA_SAVE_ADDRESS)
    }

    /// Rewind the history write pointer to the start of flash, leaving
    /// room for the timestamp tag the device writes ahead of the first
    /// sample.
    pub fn reset_data_save_address(&mut self) {
        self.write_u24(offset::DATA_SAVE_ADDRESS, DATA_SAVE_RESET);
    }

    /// Companion read pointer. Observed to stay zero.
    pub fn data_read_address(&self) -> u32 {
        self.read_u24(offset::DATA_READ_ADDRESS)
    }

    /// Clock reading taken when the current logging run started.
    pub fn save_timestamp(&self) -> DeviceDateTime {
        DeviceDateTime {
            year: self.bytes[offset::SAVE_DATE],
            month: self.bytes[offset::SAVE_DATE + 1],
            day: self.bytes[offset::SAVE_DATE + 2],
            hour: self.bytes[offset::SAVE_TIME],
            minute: self.bytes[offset::SAVE_TIME + 1],
            second: self.bytes[offset::SAVE_TIME + 2],
        }
    }

    // === Power and sensitivity ===

    pub fn power_saving_mode(&self) -> u8 {
        self.bytes[offset::POWER_SAVING]
    }

    pub fn set_power_saving_mode(&mut self, mode: u8) {
        self.bytes[offset::POWER_SAVING] = mode;
    }

    pub fn sensitivity_mode(&self) -> u8 {
        self.bytes[offset::SENSITIVITY]
    }

    pub fn set_sensitivity_mode(&mut self, mode: u8) {
        self.bytes[offset::SENSITIVITY] = mode;
    }

    pub fn sensitivity_auto_threshold(&self) -> u8 {
        self.bytes[offset::SENSITIVITY_AUTO_THRESHOLD]
    }

    pub fn set_sensitivity_auto_threshold(&mut self, threshold: u8) {
        self.bytes[offset::SENSITIVITY_AUTO_THRESHOLD] = threshold;
    }

    pub fn counter_delay(&self) -> u16 {
        self.read_u16(offset::COUNTER_DELAY)
    }

    pub fn set_counter_delay(&mut self, delay: u16) {
        self.write_u16(offset::COUNTER_DELAY, delay);
    }

    pub fn voltage_offset(&self) -> u8 {
        self.bytes[offset::VOLTAGE_OFFSET]
    }

    pub fn set_voltage_offset(&mut self, offset_value: u8) {
        self.bytes[offset::VOLTAGE_OFFSET] = offset_value;
    }

    /// Highest CPM the device has recorded. Maintained by the device.
    pub fn max_cpm(&self) -> u16 {
        self.read_u16(offset::MAX_CPM)
    }

    /// Per-record ceiling marker. Reads 0xFF on every known unit.
    pub fn max_bytes(&self) -> u8 {
        self.bytes[offset::MAX_BYTES]
    }

    // === Raw access ===

    /// Read `len` bytes at `offset`, reserved space included.
    pub fn read_raw(&self, offset: usize, len: usize) -> Result<&[u8]> {
        self.bytes
            .get(offset..offset.saturating_add(len))
            .ok_or(Error::FieldRange { offset, len })
    }

    /// Overwrite bytes at `offset`, reserved space included.
    pub fn write_raw(&mut self, offset: usize, data: &[u8]) -> Result<()> {
        let slot = self
            .bytes
            .get_mut(offset..offset.saturating_add(data.len()))
            .ok_or(Error::FieldRange {
                offset,
                len: data.len(),
            })?;
        slot.copy_from_slice(data);
        Ok(())
    }

    // === Big-endian field codec ===

    fn flag(&self, offset: usize) -> bool {
        self.bytes[offset] != 0
    }

    fn set_flag(&mut self, offset: usize, on: bool) {
        self.bytes[offset] = u8::from(on);
    }

    fn read_u16(&self, offset: usize) -> u16 {
        BigEndian::read_u16(&self.bytes[offset..offset + 2])
    }

    fn write_u16(&mut self, offset: usize, value: u16) {
        BigEndian::write_u16(&mut self.bytes[offset..offset + 2], value);
    }

    fn read_u24(&self, offset: usize) -> u32 {
        BigEndian::read_u24(&self.bytes[offset..offset + 3])
    }

    fn write_u24(&mut self, offset: usize, value: u32) {
        BigEndian::write_u24(&mut self.bytes[offset..offset + 3], value);
    }

    fn read_f32(&self, offset: usize) -> f32 {
        BigEndian::read_f32(&self.bytes[offset..offset + 4])
    }

    fn write_f32(&mut self, offset: usize, value: f32) {
        BigEndian::write_f32(&mut self.bytes[offset..offset + 4], value);
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bytes: [0; CONFIG_SIZE],
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("power_on", &self.power_on())
            .field("logging_mode", &self.logging_mode())
            .field("data_save_address", &self.data_save_address())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_u16_fields_are_big_endian() {
        let mut config = Config::default();
        config.set_alarm_cpm(0x1234);
        assert_eq!(config.as_bytes()[6], 0x12);
        assert_eq!(config.as_bytes()[7], 0x34);
        assert_eq!(config.alarm_cpm(), 0x1234);
    }

    #[test]
    fn test_f32_fields_are_big_endian() {
        let mut config = Config::default();
        config.set_zoom(2.0);
        assert_eq!(&config.as_bytes()[34..38], &2.0f32.to_be_bytes());
        assert_eq!(config.zoom(), 2.0);
    }

    #[test]
    fn test_data_save_address_reset() {
        let mut config = Config::from_bytes([0xFF; CONFIG_SIZE]);
        config.reset_data_save_address();
        assert_eq!(&config.as_bytes()[38..41], &[0x00, 0x00, 0x10]);
        assert_eq!(config.data_save_address(), 0x10);
    }

    #[test]
    fn test_calibration_round_trip() {
        let mut config = Config::default();
        let point = CalibrationPoint {
            cpm: 1000,
            usv_per_hour: 6.5,
        };
        config.set_calibration(2, point).unwrap();
        assert_eq!(config.calibration(2).unwrap(), point);
        assert_eq!(&config.as_bytes()[20..22], &[0x03, 0xE8]);
        assert!(config.set_calibration(3, point).is_err());
    }

    #[test]
    fn test_logging_mode_round_trip() {
        let mut config = Config::default();
        assert_eq!(config.logging_mode(), Some(LoggingMode::Off));
        config.set_logging_mode(LoggingMode::Cpm);
        assert_eq!(config.as_bytes()[32], 2);
        assert_eq!(config.logging_mode(), Some(LoggingMode::Cpm));
    }

    #[test]
    fn test_fresh_nvm_has_no_logging_mode() {
        let config = Config::from_bytes([0xFF; CONFIG_SIZE]);
        assert_eq!(config.logging_mode(), None);
    }

    #[test]
    fn test_save_timestamp_layout() {
        let mut bytes = [0u8; CONFIG_SIZE];
        bytes[52..58].copy_from_slice(&[12, 4, 1, 17, 31, 10]);
        let config = Config::from_bytes(bytes);
        assert_eq!(
            config.save_timestamp().to_string(),
            "2012-04-01 17:31:10"
        );
    }

    #[test]
    fn test_toggles_write_zero_or_one() {
        let mut config = Config::default();
        config.set_speaker_enabled(true);
        assert_eq!(config.as_bytes()[2], 1);
        config.set_speaker_enabled(false);
        assert_eq!(config.as_bytes()[2], 0);
    }

    #[test]
    fn test_typed_writes_leave_reserved_space_alone() {
        let mut config = Config::from_bytes([0xA5; CONFIG_SIZE]);
        config.set_alarm_cpm(60);
        config.set_logging_mode(LoggingMode::Cps);
        assert_eq!(config.as_bytes()[59], 0xA5);
        assert_eq!(config.as_bytes()[255], 0xA5);
    }

    #[test]
    fn test_raw_access_bounds() {
        let mut config = Config::default();
        config.write_raw(200, &[1, 2, 3]).unwrap();
        assert_eq!(config.read_raw(200, 3).unwrap(), &[1, 2, 3]);
        assert!(config.write_raw(255, &[1, 2]).is_err());
        assert!(config.read_raw(256, 1).is_err());
        assert!(config.read_raw(usize::MAX, 2).is_err());
    }

    proptest! {
        #[test]
        fn test_u16_round_trip(cpm in any::<u16>(), delay in any::<u16>()) {
            let mut config = Config::default();
            config.set_alarm_cpm(cpm);
            config.set_counter_delay(delay);
            prop_assert_eq!(config.alarm_cpm(), cpm);
            prop_assert_eq!(config.counter_delay(), delay);
        }

        #[test]
        fn test_raw_round_trip(
            offset in 0usize..256,
            data in proptest::collection::vec(any::<u8>(), 0..32),
        ) {
            prop_assume!(offset + data.len() <= 256);
            let mut config = Config::default();
            config.write_raw(offset, &data).unwrap();
            prop_assert_eq!(config.read_raw(offset, data.len()).unwrap(), &data[..]);
        }
    }
}
