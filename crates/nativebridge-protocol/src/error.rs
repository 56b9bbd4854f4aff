//! Protocol error types.

use thiserror::Error;

use crate::types::StatusCode;

/// Result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Errors that can occur while encoding or decoding envelopes.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Message exceeds maximum allowed size.
    #[error("message too large: {size} bytes (max: {max})")]
    MessageTooLarge { size: usize, max: usize },

    /// Envelope or payload is not valid JSON for its type.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Empty message received.
    #[error("empty message")]
    EmptyMessage,
}

impl ProtocolError {
    /// Status code reported to the caller for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MessageTooLarge { .. } => StatusCode::PayloadTooLarge,
            Self::Serialization(_) | Self::EmptyMessage => StatusCode::BadRequest,
        }
    }
}
