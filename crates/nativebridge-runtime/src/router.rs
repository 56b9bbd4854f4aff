//! Routes envelopes to bridges by `bridgeType`.

use std::collections::HashMap;
use std::sync::Arc;

use nativebridge_protocol::{ApiRequest, ApiResponse, decode_request, encode_response};
use tracing::{debug, error, info, warn};

use crate::config::RuntimeConfig;
use crate::dispatcher::Bridge;
use crate::error::DispatchError;

/// Response text used when even the error response fails to encode.
const ENCODE_FAILURE_RESPONSE: &str =
    r#"{"response":"null","statusCode":500,"statusMessage":"failed to encode response"}"#;

/// The set of bridges a host exposes.
pub struct BridgeRouter {
    bridges: HashMap<&'static str, Arc<dyn Bridge>>,
    max_message_size: usize,
}

impl BridgeRouter {
    /// Creates an empty router.
    pub fn new(config: &RuntimeConfig) -> Self {
        Self {
            bridges: HashMap::new(),
            max_message_size: config.max_message_size,
        }
    }

    /// Adds a bridge, replacing any bridge of the same type.
    pub fn register(&mut self, bridge: Arc<dyn Bridge>) -> Option<Arc<dyn Bridge>> {
        let bridge_type = bridge.bridge_type();
        let previous = self.bridges.insert(bridge_type, bridge);
        if previous.is_some() {
            info!(bridge_type, "Replaced bridge");
        } else {
            debug!(bridge_type, "Registered bridge");
        }
        previous
    }

    /// Builder: add a bridge.
    #[must_use]
    pub fn with_bridge(mut self, bridge: Arc<dyn Bridge>) -> Self {
        self.register(bridge);
        self
    }

    pub fn bridge(&self, bridge_type: &str) -> Option<&Arc<dyn Bridge>> {
        self.bridges.get(bridge_type)
    }

    /// Registered bridge types, sorted.
    pub fn bridge_types(&self) -> Vec<&'static str> {
        let mut types: Vec<_> = self.bridges.keys().copied().collect();
        types.sort_unstable();
        types
    }

    /// Handles a decoded request.
    pub fn route(&self, request: &ApiRequest) -> ApiResponse {
        let bridge_type = request.bridge_type.as_deref().unwrap_or_default();
        match self.bridges.get(bridge_type) {
            Some(bridge) => bridge.invoke(request),
            None => {
                let err = DispatchError::UnknownBridge {
                    bridge_type: bridge_type.to_string(),
                };
                warn!(
                    bridge_type,
                    method = request.method_name.as_deref().unwrap_or_default(),
                    "Rejected request for unknown bridge"
                );
                err.into_response()
            }
        }
    }

    /// Handles one request text and returns the response text.
    pub fn handle_json(&self, text: &str) -> String {
        let response = match decode_request(text, self.max_message_size) {
            Ok(request) => self.route(&request),
            Err(e) => {
                warn!(error = %e, size = text.len(), "Rejected malformed request");
                ApiResponse::error(e.status_code(), e.to_string())
            }
        };
        encode_response(&response).unwrap_or_else(|e| {
            error!(error = %e, "Failed to encode response");
            ENCODE_FAILURE_RESPONSE.to_string()
        })
    }
}

impl std::fmt::Debug for BridgeRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeRouter")
            .field("bridges", &self.bridge_types())
            .field("max_message_size", &self.max_message_size)
            .finish()
    }
}
