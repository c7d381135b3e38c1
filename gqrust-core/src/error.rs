//! Error types for gqrust-core

/// Result type alias for protocol operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core protocol errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reply is the wrong length for the command that produced it
    #[error("Reply length mismatch: expected {expected} bytes, got {actual} bytes")]
    ReplyLength {
        expected: usize,
        actual: usize,
    },

    /// History read longer than the device accepts
    #[error("History read of {length} bytes exceeds the 4096-byte chunk limit")]
    HistoryLength {
        length: u16,
    },

    /// History address beyond the end of flash
    #[error("History address {address:#07x} is past the end of the 64 KiB flash")]
    HistoryAddress {
        address: u32,
    },

    /// History read runs off the end of flash
    #[error(
        "History read of {length} bytes at {address:#07x} runs past the end of flash"
    )]
    HistoryOverrun {
        address: u32,
        length: u16,
    },

    /// Raw configuration access outside the 256-byte block
    #[error("Configuration field at offset {offset} with length {len} is out of range")]
    FieldRange {
        offset: usize,
        len: usize,
    },
}
