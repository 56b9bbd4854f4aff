//! Bean and enum catalog shared by the capability bridges.
//!
//! Field order in each struct is the wire order. Every field is nullable
//! and decoded through [`nullable`](crate::codec::nullable).

mod device;
mod service;

use serde::{Deserialize, Serialize};

use crate::bridge_enum;
use crate::codec::{Bean, nullable};

pub use device::{
    Acceleration, AccelerationListenerError, AccelerationListenerWarning,
    CapabilitiesOrientation, DeviceInfo, DeviceOrientationListenerError,
    DeviceOrientationListenerWarning, RotationEvent, RotationEventState,
};
pub use service::{
    ServiceContentEncoding, ServiceHeader, ServiceMethod, ServiceRequest,
    ServiceRequestParameter, ServiceResponse, ServiceResultCallbackError,
    ServiceResultCallbackWarning, ServiceSession, ServiceSessionCookie, ServiceToken,
};

bridge_enum! {
    /// Outcome of placing a phone call.
    pub enum TelephonyStatus {
        Dialing,
        Failed,
    }
}

/// A language/country pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Locale {
    /// ISO 639 language code (e.g. "es").
    #[serde(default, deserialize_with = "nullable")]
    pub language: Option<String>,
    /// ISO 3166 country code (e.g. "ES").
    #[serde(default, deserialize_with = "nullable")]
    pub country: Option<String>,
}

impl Locale {
    /// Creates a locale from language and country codes.
    pub fn new(language: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            language: Some(language.into()),
            country: Some(country.into()),
        }
    }

    /// Builder: set language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Builder: set country.
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    /// Returns the `language-COUNTRY` tag, or just the language.
    pub fn tag(&self) -> Option<String> {
        match (&self.language, &self.country) {
            (Some(language), Some(country)) => Some(format!("{language}-{country}")),
            (Some(language), None) => Some(language.clone()),
            _ => None,
        }
    }
}

impl Bean for Locale {}

/// A generic key/value string pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyPair {
    #[serde(default, deserialize_with = "nullable")]
    pub key_name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub key_value: Option<String>,
}

impl KeyPair {
    /// Creates a populated pair.
    pub fn new(key_name: impl Into<String>, key_value: impl Into<String>) -> Self {
        Self {
            key_name: Some(key_name.into()),
            key_value: Some(key_value.into()),
        }
    }
}

impl Bean for KeyPair {}
