//! High-level error types

use gqrust_core::Operation;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Protocol error: {0}")]
    Protocol(#[from] gqrust_core::Error),

    #[error("Transport error: {0}")]
    Transport(#[from] gqrust_transport::Error),

    #[error("Type error: {0}")]
    Types(#[from] gqrust_types::Error),

    #[error("Failed to {operation}: {source}")]
    Command {
        operation: Operation,
        source: gqrust_transport::Error,
    },

    #[error("Inbound buffer would not drain before sending")]
    FlushFailed,

    #[error("Committed configuration reads back differently at offset {offset}")]
    ConfigVerify { offset: usize },
}

/// Coarse classification of a failure. The device keeps the kind of
/// its most recent failure for polling after the fact; see
/// `Device::last_error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Serial port could not be opened
    Open,
    /// Inbound buffer would not drain
    Flush,
    /// A command exchange failed
    Command(Operation),
    /// History read longer than the chunk limit
    HistoryLength,
    /// History address past the end of flash
    HistoryAddress,
    /// History window runs past the end of flash
    HistoryOverrun,
    /// Configuration offset or length out of range
    FieldRange,
    /// Reply had the wrong length for its command
    ReplyLength,
    /// Clock write outside the device's 2000-2099 range
    DateRange,
    /// Committed configuration did not read back
    ConfigVerify,
    /// Firmware predates the full command set
    LegacyFirmware,
}

impl Error {
    /// The classification latched by the device handle.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Protocol(inner) => match inner {
                gqrust_core::Error::ReplyLength { .. } => ErrorKind::ReplyLength,
                gqrust_core::Error::HistoryLength { .. } => ErrorKind::HistoryLength,
                gqrust_core::Error::HistoryAddress { .. } => {
                    ErrorKind::HistoryAddress
                }
                gqrust_core::Error::HistoryOverrun { .. } => {
                    ErrorKind::HistoryOverrun
                }
                gqrust_core::Error::FieldRange { .. } => ErrorKind::FieldRange,
            },
            Error::Transport(_) => ErrorKind::Open,
            Error::Types(inner) => match inner {
                gqrust_types::Error::YearOutOfRange(_) => ErrorKind::DateRange,
                gqrust_types::Error::UnknownLoggingMode(_) => ErrorKind::FieldRange,
            },
            Error::Command { operation, .. } => ErrorKind::Command(*operation),
            Error::FlushFailed => ErrorKind::Flush,
            Error::ConfigVerify { .. } => ErrorKind::ConfigVerify,
        }
    }
}
