//! Request and response envelope types.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ProtocolResult;
use crate::STATUS_OK_MESSAGE;

/// Correlation id linking a request to later callback deliveries.
pub type AsyncId = i64;

/// Encoded form of a void or absent result.
const NULL_PAYLOAD: &str = "null";

/// One bridge invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRequest {
    /// Caller's protocol version.
    #[serde(default)]
    pub api_version: Option<String>,
    /// Callback correlation id; absent or zero for synchronous calls.
    #[serde(default)]
    pub async_id: Option<AsyncId>,
    /// Capability group, e.g. "Device".
    #[serde(default)]
    pub bridge_type: Option<String>,
    /// Method within the group.
    #[serde(default)]
    pub method_name: Option<String>,
    /// Positional parameters, each one JSON text.
    #[serde(default)]
    pub parameters: Option<Vec<String>>,
}

impl ApiRequest {
    /// Creates a request for `bridge_type.method_name` with no parameters.
    pub fn new(bridge_type: impl Into<String>, method_name: impl Into<String>) -> Self {
        Self {
            api_version: Some(crate::API_VERSION.to_string()),
            async_id: None,
            bridge_type: Some(bridge_type.into()),
            method_name: Some(method_name.into()),
            parameters: None,
        }
    }

    /// Builder: append one parameter, already encoded as JSON text.
    pub fn with_parameter(mut self, json: impl Into<String>) -> Self {
        self.parameters.get_or_insert_with(Vec::new).push(json.into());
        self
    }

    /// Builder: set all parameters.
    pub fn with_parameters(mut self, parameters: Vec<String>) -> Self {
        self.parameters = Some(parameters);
        self
    }

    /// Builder: set the async id.
    pub fn with_async_id(mut self, async_id: AsyncId) -> Self {
        self.async_id = Some(async_id);
        self
    }

    /// Builder: set the caller's API version.
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    /// Returns the async id, treating zero as absent.
    pub fn async_id(&self) -> Option<AsyncId> {
        self.async_id.filter(|id| *id != 0)
    }

    /// Returns true if the caller expects an out-of-band callback.
    pub fn is_async(&self) -> bool {
        self.async_id().is_some()
    }

    /// Returns the parameters, empty when absent.
    pub fn parameters(&self) -> &[String] {
        self.parameters.as_deref().unwrap_or(&[])
    }
}

/// Status codes carried in [`ApiResponse::status_code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    /// Success, async placeholder, or unimplemented capability.
    Ok,
    /// Malformed envelope or undecodable parameter.
    BadRequest,
    /// Unknown bridge type or method.
    NotFound,
    /// Async id already in use or already retired.
    Conflict,
    /// Request text exceeds the size limit.
    PayloadTooLarge,
    /// Result could not be encoded.
    InternalError,
}

impl StatusCode {
    /// Numeric wire value.
    pub fn as_i32(self) -> i32 {
        match self {
            Self::Ok => 200,
            Self::BadRequest => 400,
            Self::NotFound => 404,
            Self::Conflict => 409,
            Self::PayloadTooLarge => 413,
            Self::InternalError => 500,
        }
    }

    /// Parses a numeric wire value.
    pub fn from_i32(code: i32) -> Option<Self> {
        match code {
            200 => Some(Self::Ok),
            400 => Some(Self::BadRequest),
            404 => Some(Self::NotFound),
            409 => Some(Self::Conflict),
            413 => Some(Self::PayloadTooLarge),
            500 => Some(Self::InternalError),
            _ => None,
        }
    }

    /// Returns a human-readable description of the status.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::BadRequest => "The request was invalid",
            Self::NotFound => "The bridge or method does not exist",
            Self::Conflict => "The async id is already in use",
            Self::PayloadTooLarge => "The request is too large",
            Self::InternalError => "An internal error occurred",
        }
    }
}

/// Reply to one bridge invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    /// JSON text of the result, `"null"` for void or absent results.
    #[serde(default)]
    pub response: Option<String>,
    /// Numeric status, see [`StatusCode`].
    pub status_code: i32,
    /// Human-readable status.
    pub status_message: String,
}

impl ApiResponse {
    /// Creates a successful response carrying `payload` (JSON text).
    pub fn ok(payload: impl Into<String>) -> Self {
        Self {
            response: Some(payload.into()),
            status_code: StatusCode::Ok.as_i32(),
            status_message: STATUS_OK_MESSAGE.to_string(),
        }
    }

    /// Creates a successful response with a `"null"` payload.
    pub fn null() -> Self {
        Self::ok(NULL_PAYLOAD)
    }

    /// Creates a failed response; the payload is `"null"`.
    pub fn error(code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            response: Some(NULL_PAYLOAD.to_string()),
            status_code: code.as_i32(),
            status_message: message.into(),
        }
    }

    /// Returns the status as a known code, if it is one.
    pub fn status(&self) -> Option<StatusCode> {
        StatusCode::from_i32(self.status_code)
    }

    /// Returns true for a 200 response.
    pub fn is_success(&self) -> bool {
        self.status_code == StatusCode::Ok.as_i32()
    }

    /// Returns the payload text, `"null"` when absent.
    pub fn payload(&self) -> &str {
        self.response.as_deref().unwrap_or(NULL_PAYLOAD)
    }

    /// Decodes the payload text as `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> ProtocolResult<T> {
        Ok(serde_json::from_str(self.payload())?)
    }
}
