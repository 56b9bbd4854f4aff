//! Callback events and the typed handles native delegates fire them through.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use nativebridge_core::{BridgeEnum, CodecResult, encode};
use nativebridge_protocol::AsyncId;
use serde::Serialize;
use tracing::error;

use crate::registry::{CallbackRegistry, Delivery};

/// Payload of one event, tagged by the entry point that produced it.
///
/// Every field is JSON text in the same stringified form used for request
/// parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "channel")]
pub enum EventPayload {
    /// `onResult(data)`.
    Result { data: String },
    /// `onWarning(data, warning)`.
    Warning { data: String, warning: String },
    /// `onError(error)`.
    Error { error: String },
}

impl EventPayload {
    /// Name of the entry point, as used in handler function names.
    pub fn channel(&self) -> &'static str {
        match self {
            Self::Result { .. } => "Result",
            Self::Warning { .. } => "Warning",
            Self::Error { .. } => "Error",
        }
    }
}

/// One out-of-band delivery tagged with the originating async id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackEvent {
    /// Id of the request that registered the callback.
    pub async_id: AsyncId,
    /// Callback or listener type, e.g. "ServiceResultCallback".
    pub kind: &'static str,
    #[serde(flatten)]
    pub payload: EventPayload,
}

impl CallbackEvent {
    /// Renders the event as a call to the caller-side handler, e.g.
    /// `Bridge.handleServiceResultCallbackResult(12, {...})`.
    pub fn to_script(&self, namespace: &str) -> String {
        let arguments = match &self.payload {
            EventPayload::Result { data } => data.clone(),
            EventPayload::Warning { data, warning } => format!("{data}, {warning}"),
            EventPayload::Error { error } => error.clone(),
        };
        format!(
            "{namespace}.handle{}{}({}, {arguments})",
            self.kind,
            self.payload.channel(),
            self.async_id
        )
    }

    /// Encodes the event as a JSON object.
    pub fn to_json(&self) -> CodecResult<String> {
        encode(self)
    }
}

/// Handle a native delegate uses to report back to the caller.
///
/// `T` is the result bean, `W` the warning enum and `E` the error enum of
/// the callback type. Whether the handle fires once or repeatedly is decided
/// by how it was registered (see [`CallbackRegistry`]); handles are cheap to
/// clone and may be moved to any thread.
pub struct Callback<T, W, E> {
    async_id: AsyncId,
    kind: &'static str,
    registry: Arc<CallbackRegistry>,
    _payload: PhantomData<fn(&T, W, E)>,
}

impl<T, W, E> Callback<T, W, E>
where
    T: Serialize,
    W: BridgeEnum + Serialize,
    E: BridgeEnum + Serialize,
{
    pub(crate) fn new(
        async_id: AsyncId,
        kind: &'static str,
        registry: Arc<CallbackRegistry>,
    ) -> Self {
        Self {
            async_id,
            kind,
            registry,
            _payload: PhantomData,
        }
    }

    /// Id this handle reports under.
    pub fn async_id(&self) -> AsyncId {
        self.async_id
    }

    /// Callback or listener type name.
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Delivers a result.
    pub fn on_result(&self, data: &T) -> Delivery {
        self.send(encode(data).map(|data| EventPayload::Result { data }))
    }

    /// Delivers a result together with a warning.
    pub fn on_warning(&self, data: &T, warning: W) -> Delivery {
        self.send(encode(data).and_then(|data| {
            Ok(EventPayload::Warning {
                data,
                warning: encode(&warning)?,
            })
        }))
    }

    /// Delivers an error instead of a result.
    pub fn on_error(&self, error: E) -> Delivery {
        self.send(encode(&error).map(|error| EventPayload::Error { error }))
    }

    fn send(&self, payload: CodecResult<EventPayload>) -> Delivery {
        match payload {
            Ok(payload) => self.registry.deliver(CallbackEvent {
                async_id: self.async_id,
                kind: self.kind,
                payload,
            }),
            Err(e) => {
                error!(
                    async_id = self.async_id,
                    kind = self.kind,
                    error = %e,
                    "Failed to encode callback payload"
                );
                Delivery::Dropped
            }
        }
    }
}

impl<T, W, E> Clone for Callback<T, W, E> {
    fn clone(&self) -> Self {
        Self {
            async_id: self.async_id,
            kind: self.kind,
            registry: Arc::clone(&self.registry),
            _payload: PhantomData,
        }
    }
}

impl<T, W, E> fmt::Debug for Callback<T, W, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callback")
            .field("async_id", &self.async_id)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}
