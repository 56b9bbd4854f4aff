//! Telephony: placing phone calls.

use nativebridge_core::TelephonyStatus;

use crate::call::MethodCall;
use crate::dispatcher::{Capability, Dispatcher, Reply};
use crate::error::{DecodeResult, DispatchResult};
use crate::registry::CallbackRegistry;

/// Native telephony implementation.
pub trait TelephonyDelegate: Send + Sync {
    /// Dials `number`.
    fn call(&self, number: &str) -> TelephonyStatus;
}

/// Telephony methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TelephonyCommand {
    /// `call(number)`.
    Call { number: String },
}

impl Capability for TelephonyCommand {
    type Delegate = dyn TelephonyDelegate;
    const BRIDGE_TYPE: &'static str = "Telephony";

    fn decode(call: &MethodCall<'_>) -> DecodeResult<Option<Self>> {
        Ok(Some(match call.method() {
            "call" => Self::Call { number: call.string(0)? },
            _ => return Ok(None),
        }))
    }

    fn method_name(&self) -> &'static str {
        match self {
            Self::Call { .. } => "call",
        }
    }

    fn execute(
        self,
        delegate: &dyn TelephonyDelegate,
        _registry: &CallbackRegistry,
    ) -> DispatchResult<Reply> {
        match self {
            Self::Call { number } => Reply::encode(&delegate.call(&number)),
        }
    }

    fn unimplemented(self, _registry: &CallbackRegistry) -> DispatchResult<Reply> {
        Ok(Reply::null())
    }
}

/// Dispatcher for the `Telephony` bridge type.
pub type TelephonyBridge = Dispatcher<TelephonyCommand>;
