//! Protocol error types

use thiserror::Error;

/// Errors that can occur while encoding or decoding protocol messages
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// Status code outside the defined set
    #[error("Unknown status code: {0}")]
    UnknownStatus(u8),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
