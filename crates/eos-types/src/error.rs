//! Error types for the eos-types crate.

use thiserror::Error;

/// Errors that can occur while encoding or decoding wire messages.
#[derive(Error, Debug)]
pub enum WireError {
    #[error("Failed to encode message: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Failed to decode message: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Result type alias for wire codec operations.
pub type Result<T> = std::result::Result<T, WireError>;
