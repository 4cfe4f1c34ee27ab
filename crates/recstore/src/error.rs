//! Error types for recstore

use std::fmt;

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for store client operations
#[derive(Debug)]
pub enum Error {
    /// No record with the requested key exists in the backing collection
    NotFound,

    /// Transport failure or timed-out call to the store
    Unavailable(String),

    /// Stored payload could not be decoded
    Decode(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotFound => write!(f, "Key not found"),
            Error::Unavailable(msg) => write!(f, "Store unavailable: {}", msg),
            Error::Decode(msg) => write!(f, "Decode error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<redis::RedisError> for Error {
    fn from(err: redis::RedisError) -> Self {
        Error::Unavailable(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Decode(err.to_string())
    }
}
