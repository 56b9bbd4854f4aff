//! Capability groups.
//!
//! Each group defines a delegate trait (the native side), a command enum
//! implementing [`Capability`](crate::Capability), and a `...Bridge` alias for
//! its dispatcher. Delegates are pass-through: they receive decoded values
//! and return beans, and report asynchronous results through the callback
//! handle they are given.

mod acceleration;
mod browser;
mod device;
mod globalization;
mod service;
mod telephony;

pub use acceleration::{
    ACCELERATION_LISTENER, AccelerationBridge, AccelerationCommand, AccelerationDelegate,
    AccelerationListener,
};
pub use browser::{BrowserBridge, BrowserCommand, BrowserDelegate, BrowserPage};
pub use device::{
    DEVICE_ORIENTATION_LISTENER, DeviceBridge, DeviceCommand, DeviceDelegate,
    DeviceOrientationListener,
};
pub use globalization::{GlobalizationBridge, GlobalizationCommand, GlobalizationDelegate};
pub use service::{
    SERVICE_RESULT_CALLBACK, ServiceBridge, ServiceCommand, ServiceDelegate, ServiceLookup,
    ServiceResultCallback,
};
pub use telephony::{TelephonyBridge, TelephonyCommand, TelephonyDelegate};

use nativebridge_protocol::AsyncId;

use crate::registry::CallbackRegistry;

/// Removes one listener; unknown or absent ids are a no-op.
fn remove_listener(
    registry: &CallbackRegistry,
    kind: &'static str,
    async_id: Option<AsyncId>,
) -> bool {
    async_id.is_some_and(|id| registry.remove_listener(kind, id))
}
