//! Envelope text encoding.
//!
//! The host transport (a web view message handler, a JNI call, ...) hands the
//! runtime one JSON text per request and expects one JSON text back.

use crate::error::{ProtocolError, ProtocolResult};
use crate::types::{ApiRequest, ApiResponse};

/// Decodes a request envelope, enforcing `max_size` bytes.
pub fn decode_request(text: &str, max_size: usize) -> ProtocolResult<ApiRequest> {
    if text.len() > max_size {
        return Err(ProtocolError::MessageTooLarge {
            size: text.len(),
            max: max_size,
        });
    }
    if text.trim().is_empty() {
        return Err(ProtocolError::EmptyMessage);
    }
    Ok(serde_json::from_str(text)?)
}

/// Encodes a request envelope.
pub fn encode_request(request: &ApiRequest) -> ProtocolResult<String> {
    Ok(serde_json::to_string(request)?)
}

/// Decodes a response envelope.
pub fn decode_response(text: &str) -> ProtocolResult<ApiResponse> {
    if text.trim().is_empty() {
        return Err(ProtocolError::EmptyMessage);
    }
    Ok(serde_json::from_str(text)?)
}

/// Encodes a response envelope.
pub fn encode_response(response: &ApiResponse) -> ProtocolResult<String> {
    Ok(serde_json::to_string(response)?)
}
