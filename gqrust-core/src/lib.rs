//! # gqrust-core
//!
//! Protocol layer for GQ Electronics GMC geiger counters.
//!
//! This crate provides the transport-free protocol primitives:
//! - Command frame encoding and the reply-length table
//! - Reply decoding for counts, voltage, serial number and version
//! - Configuration block mirror with typed field access
//! - History stream decoding
//! - Protocol constants

pub mod command;
pub mod config;
pub mod constants;
pub mod error;
pub mod history;
pub mod reply;

pub use command::{Command, Operation};
pub use config::{CalibrationPoint, Config};
pub use error::{Error, Result};
pub use history::{HistoryRecord, HistorySpan};
