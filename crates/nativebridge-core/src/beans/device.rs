//! Device, orientation and motion beans.

use serde::{Deserialize, Serialize};

use crate::bridge_enum;
use crate::codec::{Bean, finite, nullable};

bridge_enum! {
    /// Physical orientation of the device.
    pub enum CapabilitiesOrientation {
        PortraitUp,
        PortraitDown,
        LandscapeLeft,
        LandscapeRight,
    }
}

bridge_enum! {
    /// Phase of a rotation reported to orientation listeners.
    pub enum RotationEventState {
        WillStartRotation,
        IsRotating,
        DidFinishRotation,
    }
}

bridge_enum! {
    /// Warnings raised by device orientation listeners.
    pub enum DeviceOrientationListenerWarning {}
}

bridge_enum! {
    /// Errors raised by device orientation listeners.
    pub enum DeviceOrientationListenerError {}
}

bridge_enum! {
    /// Warnings raised by acceleration listeners.
    pub enum AccelerationListenerWarning {
        NeedsCalibration,
        Stale,
    }
}

bridge_enum! {
    /// Errors raised by acceleration listeners.
    pub enum AccelerationListenerError {
        Unauthorized,
        Unavailable,
    }
}

/// Static description of the device.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    /// User-visible device name.
    #[serde(default, deserialize_with = "nullable")]
    pub name: Option<String>,
    /// Hardware model identifier.
    #[serde(default, deserialize_with = "nullable")]
    pub model: Option<String>,
    /// Manufacturer.
    #[serde(default, deserialize_with = "nullable")]
    pub vendor: Option<String>,
    /// Installation-scoped unique identifier.
    #[serde(default, deserialize_with = "nullable")]
    pub uuid: Option<String>,
}

impl DeviceInfo {
    /// Creates a fully populated device description.
    pub fn new(
        name: impl Into<String>,
        model: impl Into<String>,
        vendor: impl Into<String>,
        uuid: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            model: Some(model.into()),
            vendor: Some(vendor.into()),
            uuid: Some(uuid.into()),
        }
    }
}

impl Bean for DeviceInfo {}

/// Orientation change delivered to orientation listeners.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RotationEvent {
    #[serde(default, deserialize_with = "nullable")]
    pub origin: Option<CapabilitiesOrientation>,
    #[serde(default, deserialize_with = "nullable")]
    pub destination: Option<CapabilitiesOrientation>,
    #[serde(default, deserialize_with = "nullable")]
    pub state: Option<RotationEventState>,
    /// Milliseconds since the Unix epoch.
    #[serde(default, deserialize_with = "nullable")]
    pub timestamp: Option<i64>,
}

impl RotationEvent {
    /// Creates a rotation event.
    pub fn new(
        origin: CapabilitiesOrientation,
        destination: CapabilitiesOrientation,
        state: RotationEventState,
        timestamp: i64,
    ) -> Self {
        Self {
            origin: Some(origin),
            destination: Some(destination),
            state: Some(state),
            timestamp: Some(timestamp),
        }
    }
}

impl Bean for RotationEvent {}

/// A single accelerometer sample, in g.
///
/// Axes must be finite to encode; a NaN or infinite reading makes
/// [`Bean::to_json`] fail.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Acceleration {
    #[serde(default, deserialize_with = "nullable", serialize_with = "finite")]
    pub x: Option<f64>,
    #[serde(default, deserialize_with = "nullable", serialize_with = "finite")]
    pub y: Option<f64>,
    #[serde(default, deserialize_with = "nullable", serialize_with = "finite")]
    pub z: Option<f64>,
    /// Milliseconds since the Unix epoch.
    #[serde(default, deserialize_with = "nullable")]
    pub timestamp: Option<i64>,
}

impl Acceleration {
    /// Creates a sample.
    pub fn new(x: f64, y: f64, z: f64, timestamp: i64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            z: Some(z),
            timestamp: Some(timestamp),
        }
    }
}

impl Bean for Acceleration {}
