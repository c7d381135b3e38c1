//! Shared value types for the gqrust workspace

pub mod datetime;
pub mod device_info;
pub mod error;
pub mod key;
pub mod mode;

pub use datetime::DeviceDateTime;
pub use device_info::DeviceInfo;
pub use error::{Error, Result};
pub use key::SoftKey;
pub use mode::LoggingMode;
