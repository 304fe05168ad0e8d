use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("probe timeout")]
    Timeout,
    #[error("probe exhausted")]
    Exhausted,
    #[error("probe disconnected: {0}")]
    Disconnected(String),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DeviceError>;
