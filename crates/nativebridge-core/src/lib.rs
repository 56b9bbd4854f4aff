//! Core types: bean serializer, enum codec, bean catalog, tracing.
//!
//! Every value that crosses the bridge is either a primitive, a *bean* (a
//! plain record whose fields are all nullable) or a *bridge enum* (wrapped as
//! `{"value": "<Name>"}` on the wire). This crate owns those conventions so
//! the protocol and runtime crates never hand-roll JSON.

pub mod beans;
pub mod codec;
pub mod enums;
pub mod tracing;

pub use beans::{
    Acceleration, AccelerationListenerError, AccelerationListenerWarning,
    CapabilitiesOrientation, DeviceInfo, DeviceOrientationListenerError,
    DeviceOrientationListenerWarning, KeyPair, Locale, RotationEvent, RotationEventState,
    ServiceContentEncoding, ServiceHeader, ServiceMethod, ServiceRequest,
    ServiceRequestParameter, ServiceResponse, ServiceResultCallbackError,
    ServiceResultCallbackWarning, ServiceSession, ServiceSessionCookie, ServiceToken,
    TelephonyStatus,
};
pub use codec::{Bean, CodecError, CodecResult, NULL_LITERAL, NULL_SENTINEL, decode, encode};
pub use enums::BridgeEnum;
pub use crate::tracing::{LogFormat, TracingConfig, TracingError, init_tracing};
