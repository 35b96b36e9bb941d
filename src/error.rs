//! Error types for the wellbeing-store library.
//!
//! Only failures of the underlying storage (and invalid caller input) are
//! errors. A missing record is `None`/empty, and a malformed stored collection
//! is recovered inside the repository layer, so neither shows up here.

use thiserror::Error;

/// Errors that can occur in the wellbeing-store library.
#[derive(Error, Debug)]
pub enum WellbeingError {
    /// Underlying key-value store failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors on the write path
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Caller supplied a value outside its allowed range
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Convenience type alias for Result with `WellbeingError`
pub type Result<T> = std::result::Result<T, WellbeingError>;

impl From<sled::Error> for WellbeingError {
    fn from(err: sled::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<std::string::FromUtf8Error> for WellbeingError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        Self::Storage(format!("stored value is not valid UTF-8: {err}"))
    }
}
