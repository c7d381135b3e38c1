//! Protocol constants

/// Acknowledgement byte returned by write-style commands
pub const ACK: u8 = 0xAA;

/// Size of the on-device configuration block (bytes)
pub const CONFIG_SIZE: usize = 256;

/// Length of a firmware version reply (bytes)
pub const VERSION_LEN: usize = 14;

/// Length of a serial number reply (bytes)
pub const SERIAL_LEN: usize = 7;

/// Significant bits of a two-byte count reply; the top two are status
pub const RATE_MASK: u16 = 0x3FFF;

/// Total size of the on-device history flash (bytes)
pub const HISTORY_SIZE: u32 = 0x10000;

/// Largest history chunk a single read may request (bytes)
pub const HISTORY_READ_MAX: u16 = 0x1000;

/// Address the data-save pointer is rewound to on reset
pub const DATA_SAVE_RESET: u32 = 0x10;

/// Maximum single-byte reads drained before each command
pub const FLUSH_LIMIT: usize = 10;

/// History stream framing
pub mod history {
    /// First byte of a record tag
    pub const TAG_LEAD: u8 = 0x55;

    /// Second byte of a record tag
    pub const TAG_TRAIL: u8 = 0xAA;

    /// Tag code: six-byte timestamp follows
    pub const CODE_TIMESTAMP: u8 = 0x00;

    /// Tag code: two-byte big-endian sample follows
    pub const CODE_WIDE_SAMPLE: u8 = 0x01;

    /// Tag code: length-prefixed ASCII label follows
    pub const CODE_LABEL: u8 = 0x02;
}

/// Configuration block field offsets
pub mod config {
    /// Power state (0 = on)
    pub const POWER: usize = 0;

    /// Audible alarm enable
    pub const ALARM: usize = 1;

    /// Speaker enable
    pub const SPEAKER: usize = 2;

    /// Graphic display mode
    pub const GRAPHIC_MODE: usize = 3;

    /// Backlight timeout (seconds)
    pub const BACKLIGHT_TIMEOUT: usize = 4;

    /// Idle title display index
    pub const IDLE_TITLE: usize = 5;

    /// Alarm threshold (CPM, u16)
    pub const ALARM_CPM: usize = 6;

    /// First calibration point (u16 CPM then f32 uSv/h)
    pub const CALIBRATION_CPM_0: usize = 8;
    pub const CALIBRATION_USV_0: usize = 10;

    /// Second calibration point
    pub const CALIBRATION_CPM_1: usize = 14;
    pub const CALIBRATION_USV_1: usize = 16;

    /// Third calibration point
    pub const CALIBRATION_CPM_2: usize = 20;
    pub const CALIBRATION_USV_2: usize = 22;

    /// Idle display mode
    pub const IDLE_DISPLAY: usize = 26;

    /// Alarm threshold (uSv/h, f32)
    pub const ALARM_USV: usize = 27;

    /// Alarm type selector
    pub const ALARM_TYPE: usize = 31;

    /// History logging mode
    pub const LOGGING_MODE: usize = 32;

    /// Swivel display enable
    pub const SWIVEL_DISPLAY: usize = 33;

    /// Graph zoom factor (f32)
    pub const ZOOM: usize = 34;

    /// Next history write address (u24)
    pub const DATA_SAVE_ADDRESS: usize = 38;

    /// Next history read address (u24)
    pub const DATA_READ_ADDRESS: usize = 41;

    /// Power saving mode
    pub const POWER_SAVING: usize = 44;

    /// Sensitivity mode
    pub const SENSITIVITY: usize = 45;

    /// Counter display delay (u16)
    pub const COUNTER_DELAY: usize = 46;

    /// Battery voltage calibration offset
    pub const VOLTAGE_OFFSET: usize = 48;

    /// Maximum CPM seen (u16)
    pub const MAX_CPM: usize = 49;

    /// Sensitivity auto-mode threshold
    pub const SENSITIVITY_AUTO_THRESHOLD: usize = 51;

    /// Date the configuration was last saved (year, month, day)
    pub const SAVE_DATE: usize = 52;

    /// Time the configuration was last saved (hour, minute, second)
    pub const SAVE_TIME: usize = 55;

    /// Per-record byte ceiling marker (0xFF)
    pub const MAX_BYTES: usize = 58;
}
