//! Device clock representation

use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::error::{Error, Result};

/// A wall-clock instant exactly as the device stores it: year counted
/// from 2000, then month, day, hour, minute, second, one byte each.
/// This is the shape found in history timestamp tags and in the
/// configuration block's last-save fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceDateTime {
    /// Years since 2000.
    pub year: u8,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl DeviceDateTime {
    /// Widen to a chrono datetime. `None` when the bytes do not name a
    /// real calendar instant, which happens for never-written NVM.
    pub fn to_naive(&self) -> Option<NaiveDateTime> {
        let date = NaiveDate::from_ymd_opt(
            2000 + i32::from(self.year),
            u32::from(self.month),
            u32::from(self.day),
        )?;
        let time = NaiveTime::from_hms_opt(
            u32::from(self.hour),
            u32::from(self.minute),
            u32::from(self.second),
        )?;
        Some(NaiveDateTime::new(date, time))
    }

    /// Narrow a chrono datetime to device bytes. The device keeps a
    /// two-digit year, so dates outside 2000-2099 are rejected.
    pub fn from_naive(dt: &NaiveDateTime) -> Result<Self> {
        let year = dt.year();
        if !(2000..=2099).contains(&year) {
            return Err(Error::YearOutOfRange(year));
        }
        Ok(Self {
            year: (year - 2000) as u8,
            month: dt.month() as u8,
            day: dt.day() as u8,
            hour: dt.hour() as u8,
            minute: dt.minute() as u8,
            second: dt.second() as u8,
        })
    }
}

impl fmt::Display for DeviceDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            2000 + u16::from(self.year),
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chrono_round_trip() {
        let dt = NaiveDate::from_ymd_opt(2012, 4, 1)
            .unwrap()
            .and_hms_opt(17, 31, 10)
            .unwrap();
        let device = DeviceDateTime::from_naive(&dt).unwrap();
        assert_eq!(device.year, 12);
        assert_eq!(device.to_naive(), Some(dt));
    }

    #[test]
    fn rejects_years_outside_device_range() {
        let early = NaiveDate::from_ymd_opt(1999, 12, 31)
            .unwrap()
            .and_hms_opt(23, 59, 59)
            .unwrap();
        assert!(matches!(
            DeviceDateTime::from_naive(&early),
            Err(Error::YearOutOfRange(1999))
        ));
    }

    #[test]
    fn nonsense_bytes_widen_to_none() {
        let torn = DeviceDateTime {
            year: 0xFF,
            month: 0xFF,
            day: 0xFF,
            hour: 0xFF,
            minute: 0xFF,
            second: 0xFF,
        };
        assert_eq!(torn.to_naive(), None);
    }

    #[test]
    fn display_is_full_width() {
        let device = DeviceDateTime {
            year: 12,
            month: 4,
            day: 1,
            hour: 17,
            minute: 31,
            second: 10,
        };
        assert_eq!(device.to_string(), "2012-04-01 17:31:10");
    }
}
