//! Acceleration: accelerometer sample streams.

use nativebridge_core::{Acceleration, AccelerationListenerError, AccelerationListenerWarning};
use nativebridge_protocol::AsyncId;

use crate::call::MethodCall;
use crate::callback::Callback;
use crate::dispatcher::{Capability, Dispatcher, Reply};
use crate::error::{DecodeResult, DispatchResult};
use crate::registry::CallbackRegistry;

/// Callback type name of acceleration listeners.
pub const ACCELERATION_LISTENER: &str = "AccelerationListener";

/// Listener receiving [`Acceleration`] samples.
pub type AccelerationListener =
    Callback<Acceleration, AccelerationListenerWarning, AccelerationListenerError>;

/// Native accelerometer implementation.
pub trait AccelerationDelegate: Send + Sync {
    /// Starts streaming samples to `listener`.
    fn add_acceleration_listener(&self, listener: AccelerationListener);

    /// Stops the stream feeding listener `async_id`.
    fn remove_acceleration_listener(&self, async_id: AsyncId);

    /// Stops every stream.
    fn remove_acceleration_listeners(&self);
}

/// Acceleration methods.
#[derive(Debug, Clone)]
pub enum AccelerationCommand {
    AddListener { listener: AccelerationListener },
    RemoveListener { async_id: Option<AsyncId> },
    RemoveListeners,
}

impl Capability for AccelerationCommand {
    type Delegate = dyn AccelerationDelegate;
    const BRIDGE_TYPE: &'static str = "Acceleration";

    fn decode(call: &MethodCall<'_>) -> DecodeResult<Option<Self>> {
        Ok(Some(match call.method() {
            "addAccelerationListener" => Self::AddListener {
                listener: call.listener(ACCELERATION_LISTENER)?,
            },
            "removeAccelerationListener" => Self::RemoveListener {
                async_id: call.listener_id(),
            },
            "removeAccelerationListeners" => Self::RemoveListeners,
            _ => return Ok(None),
        }))
    }

    fn method_name(&self) -> &'static str {
        match self {
            Self::AddListener { .. } => "addAccelerationListener",
            Self::RemoveListener { .. } => "removeAccelerationListener",
            Self::RemoveListeners => "removeAccelerationListeners",
        }
    }

    fn execute(
        self,
        delegate: &dyn AccelerationDelegate,
        registry: &CallbackRegistry,
    ) -> DispatchResult<Reply> {
        match self {
            Self::AddListener { listener } => {
                delegate.add_acceleration_listener(listener);
                Ok(Reply::Pending)
            }
            Self::RemoveListener { async_id } => {
                if let Some(id) = async_id {
                    if registry.remove_listener(ACCELERATION_LISTENER, id) {
                        delegate.remove_acceleration_listener(id);
                    }
                }
                Ok(Reply::null())
            }
            Self::RemoveListeners => {
                registry.remove_listeners(ACCELERATION_LISTENER);
                delegate.remove_acceleration_listeners();
                Ok(Reply::null())
            }
        }
    }

    fn unimplemented(self, registry: &CallbackRegistry) -> DispatchResult<Reply> {
        match self {
            Self::RemoveListener { async_id } => {
                super::remove_listener(registry, ACCELERATION_LISTENER, async_id);
            }
            Self::RemoveListeners => {
                registry.remove_listeners(ACCELERATION_LISTENER);
            }
            Self::AddListener { .. } => {}
        }
        Ok(Reply::null())
    }
}

/// Dispatcher for the `Acceleration` bridge type.
pub type AccelerationBridge = Dispatcher<AccelerationCommand>;
