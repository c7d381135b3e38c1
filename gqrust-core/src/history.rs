//! History flash records
//!
//! The device logs counts into a 64 KiB flash as a stream of plain
//! sample bytes interleaved with tagged records. A tag is the two-byte
//! sequence `55 AA` followed by a code byte; everything else is a
//! sample under whatever logging mode the last timestamp announced.

use tracing::trace;

use gqrust_types::{DeviceDateTime, LoggingMode};

use crate::constants::history::{
    CODE_LABEL, CODE_TIMESTAMP, CODE_WIDE_SAMPLE, TAG_LEAD, TAG_TRAIL,
};
use crate::constants::{HISTORY_READ_MAX, HISTORY_SIZE};
use crate::error::{Error, Result};

/// A validated window into the history flash.
///
/// Construction checks the request against the device limits: at most
/// 4096 bytes per read, and the window must lie inside the 64 KiB
/// flash. Every limit is checked; when more than one fails, the
/// overrun is the one reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistorySpan {
    address: u32,
    length: u16,
}

impl HistorySpan {
    /// Validate an (address, length) request window.
    pub fn new(address: u32, length: u16) -> Result<Self> {
        let mut problem = None;
        if length > HISTORY_READ_MAX {
            problem = Some(Error::HistoryLength { length });
        }
        if address > HISTORY_SIZE {
            problem = Some(Error::HistoryAddress { address });
        }
        if u64::from(address) + u64::from(length) > u64::from(HISTORY_SIZE) {
            problem = Some(Error::HistoryOverrun { address, length });
        }
        match problem {
            Some(err) => Err(err),
            None => Ok(Self { address, length }),
        }
    }

    /// Start address within the flash.
    pub fn address(self) -> u32 {
        self.address
    }

    /// Number of bytes to read.
    pub fn length(self) -> u16 {
        self.length
    }
}

/// One decoded history record.
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryRecord {
    /// A count, under the logging mode in force at that point in the
    /// stream. `mode` is `None` when no timestamp has announced one
    /// yet, which happens for reads that start mid-log.
    Sample {
        value: u16,
        mode: Option<LoggingMode>,
    },
    /// Clock reading written when logging starts or the mode changes.
    Timestamp {
        datetime: DeviceDateTime,
        mode: Option<LoggingMode>,
    },
    /// Free-text note entered from the front panel.
    Label(String),
}

/// Decode a raw history buffer into records.
///
/// Decoding never fails: unrecognized tag codes fall back to treating
/// the lead byte as a sample, and a record truncated by the end of the
/// buffer is dropped rather than misread. `0xFF` fill from
/// never-written flash comes through as samples of 255.
pub fn decode(data: &[u8]) -> Vec<HistoryRecord> {
    let mut records = Vec::new();
    let mut mode: Option<LoggingMode> = None;
    let mut i = 0;

    while i < data.len() {
        let byte = data[i];
        if byte != TAG_LEAD || data.get(i + 1) != Some(&TAG_TRAIL) {
            records.push(HistoryRecord::Sample {
                value: u16::from(byte),
                mode,
            });
            i += 1;
            continue;
        }
        let Some(&code) = data.get(i + 2) else {
            // Tag cut off by the end of the buffer.
            trace!(offset = i, "dropping truncated trailing tag");
            break;
        };
        match code {
            CODE_TIMESTAMP => {
                let Some(stamp) = data.get(i + 3..i + 9) else {
                    trace!(offset = i, "dropping truncated timestamp");
                    break;
                };
                let datetime = DeviceDateTime {
                    year: stamp[0],
                    month: stamp[1],
                    day: stamp[2],
                    hour: stamp[3],
                    minute: stamp[4],
                    second: stamp[5],
                };
                // The device writes a closing 55 AA and a mode byte
                // after the six clock bytes. A bare nine-byte form
                // (no closing marker) is accepted too and leaves the
                // active mode alone.
                if data.get(i + 9) == Some(&TAG_LEAD)
                    && data.get(i + 10) == Some(&TAG_TRAIL)
                {
                    let Some(&mode_byte) = data.get(i + 11) else {
                        trace!(offset = i, "dropping timestamp with no mode byte");
                        break;
                    };
                    mode = LoggingMode::try_from(mode_byte).ok();
                    records.push(HistoryRecord::Timestamp { datetime, mode });
                    i += 12;
                } else {
                    records.push(HistoryRecord::Timestamp { datetime, mode });
                    i += 9;
                }
            }
            CODE_WIDE_SAMPLE => {
                let Some(wide) = data.get(i + 3..i + 5) else {
                    trace!(offset = i, "dropping truncated two-byte sample");
                    break;
                };
                let value = u16::from(wide[0]) << 8 | u16::from(wide[1]);
                records.push(HistoryRecord::Sample { value, mode });
                i += 5;
            }
            CODE_LABEL => {
                let Some(&len) = data.get(i + 3) else {
                    trace!(offset = i, "dropping truncated label");
                    break;
                };
                let end = i + 4 + usize::from(len);
                let Some(text) = data.get(i + 4..end) else {
                    trace!(offset = i, "dropping truncated label");
                    break;
                };
                records.push(HistoryRecord::Label(
                    String::from_utf8_lossy(text).into_owned(),
                ));
                i = end;
            }
            other => {
                // Not a tag after all. Keep the lead byte as a sample
                // and rescan from the 0xAA, which may itself start a
                // real tag.
                trace!(offset = i, code = other, "unknown tag code");
                records.push(HistoryRecord::Sample {
                    value: u16::from(TAG_LEAD),
                    mode,
                });
                i += 1;
            }
        }
    }
    records
}
