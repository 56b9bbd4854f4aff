//! Method-name dispatch for one capability group.
//!
//! A capability is a typed command enum implementing [`Capability`]: it knows
//! how to decode a request into one of its variants, run that variant against
//! the group's delegate, and what to answer when no delegate is bound.
//! [`Dispatcher`] wraps the common envelope handling around it.

use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Instant;

use nativebridge_core::{NULL_LITERAL, encode};
use nativebridge_protocol::{ApiRequest, ApiResponse, StatusCode};
use parking_lot::RwLock;
use serde::Serialize;
use tracing::{Span, debug, error, warn};

use crate::call::MethodCall;
use crate::config::RuntimeConfig;
use crate::error::{DecodeResult, DispatchError, DispatchResult};
use crate::registry::CallbackRegistry;

/// What a command answers with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Encoded result, `"null"` for void.
    Value(String),
    /// Result follows through the callback registry.
    Pending,
}

impl Reply {
    /// Encodes a result value.
    pub fn encode<T: Serialize + ?Sized>(value: &T) -> DispatchResult<Self> {
        Ok(Self::Value(encode(value)?))
    }

    /// Void or absent result.
    pub fn null() -> Self {
        Self::Value(NULL_LITERAL.to_string())
    }

    /// Empty array result.
    pub fn empty_list() -> Self {
        Self::Value("[]".to_string())
    }

    fn into_response(self) -> ApiResponse {
        match self {
            Self::Value(payload) => ApiResponse::ok(payload),
            Self::Pending => ApiResponse::null(),
        }
    }
}

/// A capability group's command table.
pub trait Capability: Sized + Send + 'static {
    /// Native implementation of the group.
    type Delegate: ?Sized + Send + Sync + 'static;

    /// `bridgeType` this group answers to, e.g. "Device".
    const BRIDGE_TYPE: &'static str;

    /// Decodes the call into a command; `Ok(None)` if no method matches.
    ///
    /// Asynchronous commands register their callback here through
    /// [`MethodCall::callback`] or [`MethodCall::listener`].
    fn decode(call: &MethodCall<'_>) -> DecodeResult<Option<Self>>;

    /// Wire name of the command's method.
    fn method_name(&self) -> &'static str;

    /// Runs the command against the bound delegate.
    fn execute(self, delegate: &Self::Delegate, registry: &CallbackRegistry)
    -> DispatchResult<Reply>;

    /// Answer given when no delegate is bound.
    fn unimplemented(self, registry: &CallbackRegistry) -> DispatchResult<Reply>;
}

/// Type-erased bridge, as held by [`BridgeRouter`](crate::BridgeRouter).
pub trait Bridge: Send + Sync {
    /// `bridgeType` this bridge answers to.
    fn bridge_type(&self) -> &'static str;

    /// Minimum client API version, reported in not-found diagnostics.
    fn api_version(&self) -> &str;

    /// Handles one request. Never fails: errors become status codes.
    fn invoke(&self, request: &ApiRequest) -> ApiResponse;
}

/// Dispatcher for capability `C`.
pub struct Dispatcher<C: Capability> {
    delegate: RwLock<Option<Arc<C::Delegate>>>,
    registry: Arc<CallbackRegistry>,
    api_version: String,
    _command: PhantomData<fn() -> C>,
}

impl<C: Capability> Dispatcher<C> {
    /// Creates a dispatcher with no delegate bound.
    pub fn new(registry: Arc<CallbackRegistry>, config: &RuntimeConfig) -> Self {
        Self {
            delegate: RwLock::new(None),
            registry,
            api_version: config.api_version.clone(),
            _command: PhantomData,
        }
    }

    /// Builder: bind a delegate.
    #[must_use]
    pub fn with_delegate(self, delegate: Arc<C::Delegate>) -> Self {
        self.set_delegate(delegate);
        self
    }

    /// Binds (or replaces) the delegate.
    pub fn set_delegate(&self, delegate: Arc<C::Delegate>) {
        *self.delegate.write() = Some(delegate);
    }

    /// Unbinds the delegate; later calls answer with defaults.
    pub fn clear_delegate(&self) {
        *self.delegate.write() = None;
    }

    pub fn has_delegate(&self) -> bool {
        self.delegate.read().is_some()
    }

    /// Registry callbacks are registered in.
    pub fn registry(&self) -> &Arc<CallbackRegistry> {
        &self.registry
    }

    /// Handles one request.
    #[tracing::instrument(
        skip(self, request),
        fields(bridge = C::BRIDGE_TYPE, method, async_id, duration_ms)
    )]
    pub fn invoke(&self, request: &ApiRequest) -> ApiResponse {
        let start = Instant::now();
        let method = request.method_name.as_deref().unwrap_or_default();
        let span = Span::current();
        span.record("method", method);
        if let Some(async_id) = request.async_id() {
            span.record("async_id", async_id);
        }
        debug!(
            client_api_version = request.api_version.as_deref().unwrap_or("unknown"),
            parameters = request.parameters().len(),
            "Invoking bridge method"
        );

        let response = match self.dispatch(method, request) {
            Ok(reply) => reply.into_response(),
            Err(e) => {
                match e.status_code() {
                    StatusCode::InternalError => error!(error = %e, "Bridge method failed"),
                    _ => warn!(error = %e, "Rejected bridge request"),
                }
                e.into_response()
            }
        };

        let duration = start.elapsed();
        if tracing::enabled!(tracing::Level::DEBUG) {
            span.record("duration_ms", duration.as_millis());
            debug!(
                status = response.status_code,
                duration_ms = duration.as_millis(),
                "Bridge method handled"
            );
        }
        response
    }

    fn dispatch(&self, method: &str, request: &ApiRequest) -> DispatchResult<Reply> {
        let call = MethodCall::new(
            method,
            request.parameters(),
            request.async_id(),
            &self.registry,
        );
        let command = match C::decode(&call) {
            Ok(Some(command)) => command,
            Ok(None) => {
                call.rollback();
                return Err(DispatchError::UnknownMethod {
                    bridge: C::BRIDGE_TYPE.to_string(),
                    method: method.to_string(),
                    api_version: self.api_version.clone(),
                });
            }
            Err(e) => {
                call.rollback();
                return Err(e.into());
            }
        };

        let delegate = self.delegate.read().clone();
        let result = match delegate {
            Some(delegate) => command.execute(&delegate, &self.registry),
            None => {
                error!(
                    bridge = C::BRIDGE_TYPE,
                    method = command.method_name(),
                    "No delegate bound, answering with the default value"
                );
                call.rollback();
                command.unimplemented(&self.registry)
            }
        };
        if result.is_err() {
            call.rollback();
        }
        result
    }
}

impl<C: Capability> Bridge for Dispatcher<C> {
    fn bridge_type(&self) -> &'static str {
        C::BRIDGE_TYPE
    }

    fn api_version(&self) -> &str {
        &self.api_version
    }

    fn invoke(&self, request: &ApiRequest) -> ApiResponse {
        Dispatcher::invoke(self, request)
    }
}

impl<C: Capability> std::fmt::Debug for Dispatcher<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("bridge_type", &C::BRIDGE_TYPE)
            .field("api_version", &self.api_version)
            .field("has_delegate", &self.has_delegate())
            .finish_non_exhaustive()
    }
}
