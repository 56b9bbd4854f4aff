//! End-to-end tests: request text in, response text and callback events out.

use std::sync::{Arc, Mutex};

use nativebridge_core::{
    Acceleration, AccelerationListenerError, CapabilitiesOrientation, DeviceInfo, Locale,
    ServiceMethod, ServiceRequest, ServiceResponse, ServiceResultCallbackError, ServiceToken,
    TelephonyStatus,
};
use nativebridge_protocol::{ApiRequest, ApiResponse, AsyncId, decode_response, encode_request};
use nativebridge_runtime::{
    AccelerationBridge, AccelerationDelegate, AccelerationListener, BridgeRouter, BrowserBridge,
    CallbackEvent, CallbackRegistry, ChannelSink, Delivery, DeviceBridge, DeviceDelegate,
    DeviceOrientationListener, EventPayload, GlobalizationBridge, RuntimeConfig, ServiceBridge,
    ServiceDelegate, ServiceResultCallback, TelephonyBridge, TelephonyDelegate,
};
use tokio::sync::mpsc::UnboundedReceiver;

struct Dialer;

impl TelephonyDelegate for Dialer {
    fn call(&self, _number: &str) -> TelephonyStatus {
        TelephonyStatus::Dialing
    }
}

struct Phone;

impl DeviceDelegate for Phone {
    fn get_device_info(&self) -> DeviceInfo {
        DeviceInfo::new("Pixel", "P8", "Google", "0a1b")
    }

    fn get_locale_current(&self) -> Locale {
        Locale::new("es", "ES")
    }

    fn get_orientation_current(&self) -> CapabilitiesOrientation {
        CapabilitiesOrientation::PortraitUp
    }

    fn add_device_orientation_listener(&self, _listener: DeviceOrientationListener) {}

    fn remove_device_orientation_listener(&self, _async_id: AsyncId) {}

    fn remove_device_orientation_listeners(&self) {}
}

#[derive(Default)]
struct Sensor {
    listeners: Mutex<Vec<AccelerationListener>>,
}

impl AccelerationDelegate for Sensor {
    fn add_acceleration_listener(&self, listener: AccelerationListener) {
        self.listeners.lock().unwrap().push(listener);
    }

    fn remove_acceleration_listener(&self, async_id: AsyncId) {
        self.listeners.lock().unwrap().retain(|l| l.async_id() != async_id);
    }

    fn remove_acceleration_listeners(&self) {
        self.listeners.lock().unwrap().clear();
    }
}

#[derive(Default)]
struct Http {
    pending: Mutex<Vec<ServiceResultCallback>>,
}

impl ServiceDelegate for Http {
    fn get_service_token(
        &self,
        service: &str,
        endpoint: &str,
        function: &str,
        method: ServiceMethod,
    ) -> ServiceToken {
        ServiceToken::new(service, endpoint, function, method)
    }

    fn get_service_token_by_uri(&self, _uri: &str) -> Option<ServiceToken> {
        None
    }

    fn get_services_registered(&self) -> Vec<ServiceToken> {
        Vec::new()
    }

    fn get_service_request(&self, token: &ServiceToken) -> ServiceRequest {
        ServiceRequest::new(token.clone())
    }

    fn is_service_registered(&self, _: &str, _: &str, _: &str, _: ServiceMethod) -> bool {
        false
    }

    fn invoke_service(&self, _request: ServiceRequest, callback: ServiceResultCallback) {
        self.pending.lock().unwrap().push(callback);
    }
}

struct Host {
    router: BridgeRouter,
    registry: Arc<CallbackRegistry>,
    events: UnboundedReceiver<CallbackEvent>,
    sensor: Arc<Sensor>,
    http: Arc<Http>,
}

impl Host {
    /// Telephony, Device, Acceleration and Service bound; Browser and
    /// Globalization registered without delegates.
    fn new() -> Self {
        let config = RuntimeConfig::default();
        let (sink, events) = ChannelSink::channel();
        let registry = Arc::new(CallbackRegistry::with_config(Arc::new(sink), &config));
        let sensor = Arc::new(Sensor::default());
        let http = Arc::new(Http::default());

        let acceleration = AccelerationBridge::new(registry.clone(), &config);
        acceleration.set_delegate(sensor.clone());
        let service = ServiceBridge::new(registry.clone(), &config);
        service.set_delegate(http.clone());

        let router = BridgeRouter::new(&config)
            .with_bridge(Arc::new(
                TelephonyBridge::new(registry.clone(), &config).with_delegate(Arc::new(Dialer)),
            ))
            .with_bridge(Arc::new(
                DeviceBridge::new(registry.clone(), &config).with_delegate(Arc::new(Phone)),
            ))
            .with_bridge(Arc::new(acceleration))
            .with_bridge(Arc::new(service))
            .with_bridge(Arc::new(BrowserBridge::new(registry.clone(), &config)))
            .with_bridge(Arc::new(GlobalizationBridge::new(registry.clone(), &config)));

        Self {
            router,
            registry,
            events,
            sensor,
            http,
        }
    }

    fn send(&self, request: &ApiRequest) -> ApiResponse {
        let text = encode_request(request).unwrap();
        decode_response(&self.router.handle_json(&text)).unwrap()
    }

    fn drain(&mut self) -> Vec<CallbackEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            events.push(event);
        }
        events
    }
}

#[test]
fn telephony_call_over_json() {
    let host = Host::new();
    let text = host.router.handle_json(
        r#"{"apiVersion":"2.2.0","asyncId":null,"bridgeType":"Telephony","methodName":"call","parameters":["\"+34911234567\""]}"#,
    );
    insta::assert_snapshot!(text, @r#"{"response":"{\"value\":\"Dialing\"}","statusCode":200,"statusMessage":"OK"}"#);
}

#[test]
fn unknown_method_reports_bridge_method_and_version() {
    let host = Host::new();
    let response = host.send(&ApiRequest::new("Device", "bogus"));
    assert_eq!(response.status_code, 404);
    assert_eq!(response.payload(), "null");
    insta::assert_snapshot!(response.status_message, @"DeviceBridge does not provide the function 'bogus'. Please check your client-side API version; should be API version >= v2.2.0.");
}

#[test]
fn unknown_bridge_is_not_found() {
    let host = Host::new();
    let response = host.send(&ApiRequest::new("Contact", "getContacts"));
    assert_eq!(response.status_code, 404);
    assert!(response.status_message.contains("Contact"));
}

#[test]
fn unimplemented_capability_answers_default() {
    let host = Host::new();
    let response = host.send(
        &ApiRequest::new("Browser", "openExtenalBrowser")
            .with_parameter(r#""https://example.org""#),
    );
    assert_eq!(response.status_code, 200);
    assert_eq!(response.payload(), "false");

    let response = host.send(&ApiRequest::new("Globalization", "getDefaultLocale"));
    assert_eq!(response.status_code, 200);
    assert_eq!(response.payload(), "null");
}

#[test]
fn decode_failure_is_client_error() {
    let host = Host::new();
    let response = host.send(&ApiRequest::new("Telephony", "call").with_parameter("{broken"));
    assert_eq!(response.status_code, 400);

    let response = host.send(&ApiRequest::new("Telephony", "call"));
    assert_eq!(response.status_code, 400);
}

#[test]
fn async_service_call_delivers_one_event() {
    let mut host = Host::new();
    let token = ServiceToken::new("weather", "api", "forecast", ServiceMethod::Get);
    let request = ServiceRequest::new(token);
    let request = ApiRequest::new("Service", "invokeService")
        .with_parameter(serde_json::to_string(&request).unwrap())
        .with_async_id(12);

    let response = host.send(&request);
    assert_eq!(response.status_code, 200);
    assert_eq!(response.payload(), "null");
    assert!(host.drain().is_empty());

    let callback = host.http.pending.lock().unwrap().pop().unwrap();
    assert_eq!(callback.on_result(&ServiceResponse::new(200, "sunny")), Delivery::Delivered);
    assert_eq!(callback.on_error(ServiceResultCallbackError::TimeOut), Delivery::Dropped);

    let events = host.drain();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].async_id, 12);
    assert!(matches!(events[0].payload, EventPayload::Result { .. }));
    insta::assert_snapshot!(events[0].to_script("Bridge"), @r#"Bridge.handleServiceResultCallbackResult(12, {"content":"sunny","contentType":null,"contentEncoding":null,"contentLength":5,"serviceHeaders":null,"serviceSession":null,"statusCode":200})"#);

    assert_eq!(host.send(&request).status_code, 409);
}

#[test]
fn listener_removal_is_idempotent() {
    let mut host = Host::new();
    let add = ApiRequest::new("Acceleration", "addAccelerationListener").with_async_id(7);
    assert_eq!(host.send(&add).status_code, 200);

    let listener = host.sensor.listeners.lock().unwrap()[0].clone();
    listener.on_result(&Acceleration::new(0.1, 0.2, 0.98, 1));
    listener.on_error(AccelerationListenerError::Unavailable);

    let remove = ApiRequest::new("Acceleration", "removeAccelerationListener").with_async_id(7);
    assert_eq!(host.send(&remove).status_code, 200);
    assert_eq!(host.send(&remove).status_code, 200);
    let never = ApiRequest::new("Acceleration", "removeAccelerationListener").with_async_id(8);
    assert_eq!(host.send(&never).status_code, 200);

    assert_eq!(listener.on_result(&Acceleration::default()), Delivery::Dropped);
    assert_eq!(host.drain().len(), 2);
    assert!(host.registry.is_empty());

    assert_eq!(host.send(&add).status_code, 409);
}

#[tokio::test]
async fn events_drain_on_another_task() {
    let mut host = Host::new();
    let add = ApiRequest::new("Acceleration", "addAccelerationListener").with_async_id(3);
    host.send(&add);
    let listener = host.sensor.listeners.lock().unwrap()[0].clone();

    let mut events = std::mem::replace(&mut host.events, ChannelSink::channel().1);
    let consumer = tokio::spawn(async move {
        let mut seen = Vec::new();
        while seen.len() < 3 {
            match events.recv().await {
                Some(event) => seen.push(event.async_id),
                None => break,
            }
        }
        seen
    });

    std::thread::spawn(move || {
        for t in 0..3 {
            listener.on_result(&Acceleration::new(0.0, 0.0, 1.0, t));
        }
    })
    .join()
    .unwrap();

    assert_eq!(consumer.await.unwrap(), vec![3, 3, 3]);
}
