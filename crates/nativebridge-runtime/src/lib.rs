//! Bridge runtime: dispatch, capability tables, async callbacks.
//!
//! This crate turns [`ApiRequest`](nativebridge_protocol::ApiRequest)
//! envelopes into calls on native delegates:
//! - [`BridgeRouter`] picks the bridge named by `bridgeType`
//! - [`Dispatcher`] decodes the positional parameters into a typed command
//!   and runs it against the bound delegate
//! - [`CallbackRegistry`] correlates `asyncId`s with callbacks and listeners
//!   and pushes their events into an [`EventSink`]
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use nativebridge_core::TelephonyStatus;
//! use nativebridge_runtime::{
//!     BridgeRouter, CallbackRegistry, ChannelSink, RuntimeConfig, TelephonyBridge,
//!     TelephonyDelegate,
//! };
//!
//! struct Dialer;
//!
//! impl TelephonyDelegate for Dialer {
//!     fn call(&self, _number: &str) -> TelephonyStatus {
//!         TelephonyStatus::Dialing
//!     }
//! }
//!
//! let config = RuntimeConfig::default();
//! let (sink, _events) = ChannelSink::channel();
//! let registry = Arc::new(CallbackRegistry::with_config(Arc::new(sink), &config));
//!
//! let telephony = TelephonyBridge::new(registry, &config).with_delegate(Arc::new(Dialer));
//! let router = BridgeRouter::new(&config).with_bridge(Arc::new(telephony));
//!
//! let reply = router.handle_json(
//!     r#"{"bridgeType":"Telephony","methodName":"call","parameters":["\"+34911234567\""]}"#,
//! );
//! assert!(reply.contains(r#"{\"value\":\"Dialing\"}"#));
//! ```

mod call;
mod callback;
mod capabilities;
mod config;
mod dispatcher;
mod error;
mod registry;
mod router;
mod sink;

pub use call::MethodCall;
pub use callback::{Callback, CallbackEvent, EventPayload};
pub use capabilities::{
    ACCELERATION_LISTENER, AccelerationBridge, AccelerationCommand, AccelerationDelegate,
    AccelerationListener, BrowserBridge, BrowserCommand, BrowserDelegate, BrowserPage,
    DEVICE_ORIENTATION_LISTENER, DeviceBridge, DeviceCommand, DeviceDelegate,
    DeviceOrientationListener, GlobalizationBridge, GlobalizationCommand, GlobalizationDelegate,
    SERVICE_RESULT_CALLBACK, ServiceBridge, ServiceCommand, ServiceDelegate, ServiceLookup,
    ServiceResultCallback, TelephonyBridge, TelephonyCommand, TelephonyDelegate,
};
pub use config::{DEFAULT_SCRIPT_NAMESPACE, RuntimeConfig};
pub use dispatcher::{Bridge, Capability, Dispatcher, Reply};
pub use error::{
    DecodeError, DecodeResult, DispatchError, DispatchResult, RegistryError, RegistryResult,
};
pub use registry::{CallbackMode, CallbackRegistry, Delivery, RegistrationInfo};
pub use router::BridgeRouter;
pub use sink::{ChannelSink, EventSink, FnSink, ScriptSink};
