//! # gqrust
//!
//! Driver for GQ Electronics GMC-300 geiger counters over their USB
//! serial link.
//!
//! ## Features
//!
//! - Readings: CPM, CPS and battery voltage
//! - Identity: firmware version and unit serial number
//! - Full 256-byte configuration mirror with typed field access and
//!   verified write-back
//! - History flash dump with record decoding
//! - Once-a-second CPS streaming
//! - Device clock, front-panel key emulation and power-off
//!
//! ## Quick Start
//!
//! ```no_run
//! use gqrust::Device;
//!
//! fn main() -> gqrust::Result<()> {
//!     let mut device = Device::open("/dev/ttyUSB0")?;
//!
//!     println!("Device: {}", device.firmware());
//!     println!("Serial: {}", device.serial_number()?);
//!     println!("CPM:    {}", device.cpm()?);
//!
//!     Ok(())
//! }
//! ```

pub mod device;
pub mod error;
pub mod stream;

pub use device::Device;
pub use error::{Error, ErrorKind, Result};
pub use stream::CpsStream;

pub use gqrust_core::history;
pub use gqrust_core::{CalibrationPoint, Command, Config, HistoryRecord, HistorySpan, Operation};
pub use gqrust_transport::{MockTransport, SerialConfig, SerialTransport, SharedMock, Transport};
pub use gqrust_types::{DeviceDateTime, DeviceInfo, LoggingMode, SoftKey};
