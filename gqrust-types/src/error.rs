pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unknown logging mode byte {0:#04x}")]
    UnknownLoggingMode(u8),

    #[error("Device clock holds years 2000-2099, got {0}")]
    YearOutOfRange(i32),
}
