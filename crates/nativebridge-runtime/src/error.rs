//! Runtime error types.
//!
//! None of these cross the bridge boundary: the dispatcher turns each one
//! into a status code and a log line.

use nativebridge_core::CodecError;
use nativebridge_protocol::{ApiResponse, AsyncId, StatusCode};
use thiserror::Error;

/// Result type for dispatch operations.
pub type DispatchResult<T> = Result<T, DispatchError>;

/// Result type for parameter decoding.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Result type for callback registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Errors raised by the callback registry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// Async ids must be positive.
    #[error("async id must be positive, got {0}")]
    InvalidId(AsyncId),

    /// A live registration already uses this id.
    #[error("async id {0} is already registered")]
    AlreadyRegistered(AsyncId),

    /// The id was consumed or removed and cannot be registered again.
    #[error("async id {0} was already consumed or removed")]
    Retired(AsyncId),
}

/// Errors raised while decoding positional parameters.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Fewer parameters than the method expects.
    #[error("missing parameter #{index} for '{method}'")]
    MissingParameter { method: String, index: usize },

    /// A required parameter is `null` or `"<null>"`.
    #[error("parameter #{index} for '{method}' must not be null")]
    NullParameter { method: String, index: usize },

    /// A parameter does not decode into the expected type.
    #[error("invalid parameter #{index} for '{method}': {source}")]
    InvalidParameter {
        method: String,
        index: usize,
        source: CodecError,
    },

    /// An asynchronous method was called without an async id.
    #[error("'{method}' is asynchronous but the request carries no asyncId")]
    MissingAsyncId { method: String },

    /// The callback could not be registered.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Errors raised while dispatching one request.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The bridge has no method with this name (or arity, for overloads).
    #[error(
        "{bridge}Bridge does not provide the function '{method}'. Please check your client-side API version; should be API version >= v{api_version}."
    )]
    UnknownMethod {
        bridge: String,
        method: String,
        api_version: String,
    },

    /// No bridge is registered for the requested type.
    #[error("no bridge is registered for type '{bridge_type}'")]
    UnknownBridge { bridge_type: String },

    /// Parameter decoding failed.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The delegate's result could not be encoded.
    #[error("failed to encode result: {0}")]
    Encode(#[from] CodecError),
}

impl DispatchError {
    /// Status code reported to the caller for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::UnknownMethod { .. } | Self::UnknownBridge { .. } => StatusCode::NotFound,
            Self::Decode(DecodeError::Registry(
                RegistryError::AlreadyRegistered(_) | RegistryError::Retired(_),
            )) => StatusCode::Conflict,
            Self::Decode(_) => StatusCode::BadRequest,
            Self::Encode(_) => StatusCode::InternalError,
        }
    }

    /// Converts the error into the response sent back to the caller.
    pub fn into_response(self) -> ApiResponse {
        ApiResponse::error(self.status_code(), self.to_string())
    }
}
