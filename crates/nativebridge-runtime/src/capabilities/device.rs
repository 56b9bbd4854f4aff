//! Device: static device information and orientation events.

use nativebridge_core::{
    CapabilitiesOrientation, DeviceInfo, DeviceOrientationListenerError,
    DeviceOrientationListenerWarning, Locale, RotationEvent,
};
use nativebridge_protocol::AsyncId;

use crate::call::MethodCall;
use crate::callback::Callback;
use crate::dispatcher::{Capability, Dispatcher, Reply};
use crate::error::{DecodeResult, DispatchResult};
use crate::registry::CallbackRegistry;

/// Callback type name of orientation listeners.
pub const DEVICE_ORIENTATION_LISTENER: &str = "DeviceOrientationListener";

/// Listener receiving [`RotationEvent`]s.
pub type DeviceOrientationListener =
    Callback<RotationEvent, DeviceOrientationListenerWarning, DeviceOrientationListenerError>;

/// Native device implementation.
pub trait DeviceDelegate: Send + Sync {
    fn get_device_info(&self) -> DeviceInfo;

    fn get_locale_current(&self) -> Locale;

    fn get_orientation_current(&self) -> CapabilitiesOrientation;

    /// Starts delivering rotation events to `listener` until it is removed.
    fn add_device_orientation_listener(&self, listener: DeviceOrientationListener);

    /// Stops the native stream feeding listener `async_id`. Only called for
    /// listeners that were live.
    fn remove_device_orientation_listener(&self, async_id: AsyncId);

    fn remove_device_orientation_listeners(&self);
}

/// Device methods.
#[derive(Debug, Clone)]
pub enum DeviceCommand {
    GetDeviceInfo,
    GetLocaleCurrent,
    GetOrientationCurrent,
    AddOrientationListener { listener: DeviceOrientationListener },
    RemoveOrientationListener { async_id: Option<AsyncId> },
    RemoveOrientationListeners,
}

impl Capability for DeviceCommand {
    type Delegate = dyn DeviceDelegate;
    const BRIDGE_TYPE: &'static str = "Device";

    fn decode(call: &MethodCall<'_>) -> DecodeResult<Option<Self>> {
        Ok(Some(match call.method() {
            "getDeviceInfo" => Self::GetDeviceInfo,
            "getLocaleCurrent" => Self::GetLocaleCurrent,
            "getOrientationCurrent" => Self::GetOrientationCurrent,
            "addDeviceOrientationListener" => Self::AddOrientationListener {
                listener: call.listener(DEVICE_ORIENTATION_LISTENER)?,
            },
            "removeDeviceOrientationListener" => Self::RemoveOrientationListener {
                async_id: call.listener_id(),
            },
            "removeDeviceOrientationListeners" => Self::RemoveOrientationListeners,
            _ => return Ok(None),
        }))
    }

    fn method_name(&self) -> &'static str {
        match self {
            Self::GetDeviceInfo => "getDeviceInfo",
            Self::GetLocaleCurrent => "getLocaleCurrent",
            Self::GetOrientationCurrent => "getOrientationCurrent",
            Self::AddOrientationListener { .. } => "addDeviceOrientationListener",
            Self::RemoveOrientationListener { .. } => "removeDeviceOrientationListener",
            Self::RemoveOrientationListeners => "removeDeviceOrientationListeners",
        }
    }

    fn execute(
        self,
        delegate: &dyn DeviceDelegate,
        registry: &CallbackRegistry,
    ) -> DispatchResult<Reply> {
        match self {
            Self::GetDeviceInfo => Reply::encode(&delegate.get_device_info()),
            Self::GetLocaleCurrent => Reply::encode(&delegate.get_locale_current()),
            Self::GetOrientationCurrent => Reply::encode(&delegate.get_orientation_current()),
            Self::AddOrientationListener { listener } => {
                delegate.add_device_orientation_listener(listener);
                Ok(Reply::Pending)
            }
            Self::RemoveOrientationListener { async_id } => {
                if let Some(id) = async_id {
                    if registry.remove_listener(DEVICE_ORIENTATION_LISTENER, id) {
                        delegate.remove_device_orientation_listener(id);
                    }
                }
                Ok(Reply::null())
            }
            Self::RemoveOrientationListeners => {
                registry.remove_listeners(DEVICE_ORIENTATION_LISTENER);
                delegate.remove_device_orientation_listeners();
                Ok(Reply::null())
            }
        }
    }

    fn unimplemented(self, registry: &CallbackRegistry) -> DispatchResult<Reply> {
        match self {
            Self::RemoveOrientationListener { async_id } => {
                super::remove_listener(registry, DEVICE_ORIENTATION_LISTENER, async_id);
            }
            Self::RemoveOrientationListeners => {
                registry.remove_listeners(DEVICE_ORIENTATION_LISTENER);
            }
            _ => {}
        }
        Ok(Reply::null())
    }
}

/// Dispatcher for the `Device` bridge type.
pub type DeviceBridge = Dispatcher<DeviceCommand>;

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use nativebridge_core::RotationEventState;

    use super::*;
    use crate::capabilities::testing::{assert_ok, dispatcher, request};

    #[derive(Default)]
    struct Phone {
        listeners: Mutex<Vec<DeviceOrientationListener>>,
        removed: Mutex<Vec<AsyncId>>,
    }

    impl DeviceDelegate for Phone {
        fn get_device_info(&self) -> DeviceInfo {
            DeviceInfo::new("Pixel", "P8", "Google", "0a1b")
        }

        fn get_locale_current(&self) -> Locale {
            Locale::new("es", "ES")
        }

        fn get_orientation_current(&self) -> CapabilitiesOrientation {
            CapabilitiesOrientation::LandscapeLeft
        }

        fn add_device_orientation_listener(&self, listener: DeviceOrientationListener) {
            self.listeners.lock().unwrap().push(listener);
        }

        fn remove_device_orientation_listener(&self, async_id: AsyncId) {
            self.removed.lock().unwrap().push(async_id);
        }

        fn remove_device_orientation_listeners(&self) {
            self.listeners.lock().unwrap().clear();
        }
    }

    #[test]
    fn sync_getters() {
        let (bridge, _) = dispatcher::<DeviceCommand>();
        let bridge = bridge.with_delegate(Arc::new(Phone::default()));

        let response = bridge.invoke(&request("Device", "getDeviceInfo", &[]));
        insta::assert_snapshot!(response.payload(), @r#"{"name":"Pixel","model":"P8","vendor":"Google","uuid":"0a1b"}"#);
        assert_ok(
            &bridge.invoke(&request("Device", "getOrientationCurrent", &[])),
            r#"{"value":"LandscapeLeft"}"#,
        );
        assert_ok(
            &bridge.invoke(&request("Device", "getLocaleCurrent", &[])),
            r#"{"language":"es","country":"ES"}"#,
        );
    }

    #[test]
    fn unknown_method_names_bridge_and_method() {
        let (bridge, _) = dispatcher::<DeviceCommand>();
        let response = bridge.invoke(&request("Device", "bogus", &[]));
        assert_eq!(response.status_code, 404);
        assert!(response.status_message.contains("Device"));
        assert!(response.status_message.contains("bogus"));
    }

    #[test]
    fn orientation_listener_lifecycle() {
        let (bridge, events) = dispatcher::<DeviceCommand>();
        let phone = Arc::new(Phone::default());
        bridge.set_delegate(phone.clone());

        let add = request("Device", "addDeviceOrientationListener", &[]).with_async_id(21);
        assert_ok(&bridge.invoke(&add), "null");

        let listener = phone.listeners.lock().unwrap()[0].clone();
        let event = RotationEvent::new(
            CapabilitiesOrientation::PortraitUp,
            CapabilitiesOrientation::LandscapeLeft,
            RotationEventState::DidFinishRotation,
            1_700_000_000_000,
        );
        listener.on_result(&event);
        listener.on_result(&event);

        let remove = request("Device", "removeDeviceOrientationListener", &[]).with_async_id(21);
        assert_ok(&bridge.invoke(&remove), "null");
        assert_ok(&bridge.invoke(&remove), "null");
        listener.on_result(&event);

        assert_eq!(events.lock().unwrap().len(), 2);
        assert_eq!(*phone.removed.lock().unwrap(), [21]);
        assert!(bridge.registry().is_empty());
    }

    #[test]
    fn remove_all_listeners() {
        let (bridge, _) = dispatcher::<DeviceCommand>();
        bridge.set_delegate(Arc::new(Phone::default()));
        for id in [1, 2] {
            let add = request("Device", "addDeviceOrientationListener", &[]).with_async_id(id);
            bridge.invoke(&add);
        }
        assert_eq!(bridge.registry().listeners_of(DEVICE_ORIENTATION_LISTENER), vec![1, 2]);

        let remove_all = request("Device", "removeDeviceOrientationListeners", &[]);
        assert_ok(&bridge.invoke(&remove_all), "null");
        assert_ok(&bridge.invoke(&remove_all), "null");
        assert!(bridge.registry().is_empty());
    }

    #[test]
    fn removal_without_delegate_still_unregisters() {
        let (bridge, _) = dispatcher::<DeviceCommand>();
        bridge.set_delegate(Arc::new(Phone::default()));
        let add = request("Device", "addDeviceOrientationListener", &[]).with_async_id(4);
        bridge.invoke(&add);
        bridge.clear_delegate();

        let remove = request("Device", "removeDeviceOrientationListener", &[]).with_async_id(4);
        assert_ok(&bridge.invoke(&remove), "null");
        assert!(bridge.registry().is_empty());
    }

    #[test]
    fn unimplemented_defaults() {
        let (bridge, _) = dispatcher::<DeviceCommand>();
        assert_ok(&bridge.invoke(&request("Device", "getDeviceInfo", &[])), "null");
        assert_ok(&bridge.invoke(&request("Device", "getOrientationCurrent", &[])), "null");

        let add = request("Device", "addDeviceOrientationListener", &[]).with_async_id(9);
        assert_ok(&bridge.invoke(&add), "null");
        assert!(!bridge.registry().is_registered(9));
    }
}
