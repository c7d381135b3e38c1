//! Transport errors

use std::io;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: serialport::Error,
    },

    #[error("Not connected")]
    NotConnected,

    #[error("Read timeout")]
    Timeout,

    #[error("Short read: expected {expected} bytes, got {got}")]
    ShortRead { expected: usize, got: usize },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Mock script violation: {0}")]
    Script(String),
}
