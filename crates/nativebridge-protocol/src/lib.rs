//! Request/response envelope for bridge invocations.
//!
//! One [`ApiRequest`] names a capability group (`bridgeType`), a method and
//! its positional parameters; the bridge answers with one [`ApiResponse`].
//! Both are transient DTOs created fresh per invocation.
//!
//! # Wire shape
//!
//! ```text
//! { "apiVersion": "2.2.0", "asyncId": 123, "bridgeType": "Device",
//!   "methodName": "getDeviceInfo", "parameters": ["<json>", ...] }
//!
//! { "response": "<json>", "statusCode": 200, "statusMessage": "OK" }
//! ```
//!
//! Every parameter and the `response` field are themselves JSON text
//! ("stringified" values). Absent optional fields serialize as `null`; no
//! key is ever omitted.
//!
//! # Example
//!
//! ```rust
//! use nativebridge_protocol::{ApiRequest, decode_request, encode_request};
//!
//! let request = ApiRequest::new("Telephony", "call").with_parameter(r#""+34911234567""#);
//! let text = encode_request(&request).unwrap();
//! let decoded = decode_request(&text, nativebridge_protocol::MAX_MESSAGE_SIZE).unwrap();
//! assert_eq!(decoded, request);
//! ```

mod error;
mod types;
mod wire;

pub use error::{ProtocolError, ProtocolResult};
pub use types::{ApiRequest, ApiResponse, AsyncId, StatusCode};
pub use wire::{decode_request, decode_response, encode_request, encode_response};

/// API version implemented by this runtime.
pub const API_VERSION: &str = "2.2.0";

/// Maximum accepted size of one request text (1 MiB).
pub const MAX_MESSAGE_SIZE: usize = 1024 * 1024;

/// `statusMessage` of a successful response.
pub const STATUS_OK_MESSAGE: &str = "OK";
