//! Enum codec.
//!
//! Bridge enums travel as `{"value": "<Name>"}`. Decoding never fails: a
//! missing, null or unrecognised name resolves to the enum's `Unknown`
//! variant so that clients speaking a newer protocol keep working.

use serde::de::Deserializer;
use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Key of the wrapper object carrying an enum name.
pub const ENUM_VALUE_KEY: &str = "value";

/// An enumeration exchanged across the bridge.
///
/// Use [`bridge_enum!`](crate::bridge_enum) to declare one; it adds the
/// `Unknown` variant and the wire representation.
pub trait BridgeEnum: Copy + Eq + 'static {
    /// Variant that unrecognised input resolves to.
    const UNKNOWN: Self;

    /// All variants, `UNKNOWN` included.
    const VARIANTS: &'static [Self];

    /// Canonical wire name of this value.
    fn as_str(&self) -> &'static str;

    /// Resolves a wire name, falling back to [`BridgeEnum::UNKNOWN`].
    fn to_enum(name: Option<&str>) -> Self {
        name.and_then(|name| Self::VARIANTS.iter().copied().find(|v| v.as_str() == name))
            .unwrap_or(Self::UNKNOWN)
    }

    /// Resolves any decoded JSON value: a wrapper object, a bare name, or
    /// anything else (which yields `UNKNOWN`).
    fn from_wire(value: &Value) -> Self {
        match value {
            Value::Object(map) => Self::to_enum(map.get(ENUM_VALUE_KEY).and_then(Value::as_str)),
            Value::String(name) => Self::to_enum(Some(name)),
            _ => Self::UNKNOWN,
        }
    }
}

/// Serializes an enum as `{"value": "<Name>"}`.
pub fn serialize_wrapped<E, S>(value: &E, serializer: S) -> Result<S::Ok, S::Error>
where
    E: BridgeEnum,
    S: Serializer,
{
    let mut wrapper = serializer.serialize_struct("EnumValue", 1)?;
    wrapper.serialize_field(ENUM_VALUE_KEY, value.as_str())?;
    wrapper.end()
}

/// Deserializes an enum leniently; see [`BridgeEnum::from_wire`].
pub fn deserialize_wrapped<'de, E, D>(deserializer: D) -> Result<E, D::Error>
where
    E: BridgeEnum,
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(E::from_wire(&value))
}

/// Wire wrapper used when an enum must be handled as a standalone object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumValue {
    /// Canonical enum name, if any.
    pub value: Option<String>,
}

impl EnumValue {
    /// Wraps an enum value.
    pub fn of<E: BridgeEnum>(value: E) -> Self {
        Self {
            value: Some(value.as_str().to_string()),
        }
    }

    /// Resolves the wrapped name as `E`.
    pub fn resolve<E: BridgeEnum>(&self) -> E {
        E::to_enum(self.value.as_deref())
    }
}

/// Declares a bridge enum.
///
/// The generated type gets an extra `Unknown` variant (also its `Default`),
/// implements [`BridgeEnum`], `Display`, and serde using the
/// `{"value": "<Name>"}` wrapper.
///
/// ```
/// nativebridge_core::bridge_enum! {
///     /// Network reachability.
///     pub enum Reachability { Wifi, Cellular }
/// }
///
/// use nativebridge_core::BridgeEnum;
/// assert_eq!(Reachability::to_enum(Some("Wifi")), Reachability::Wifi);
/// assert_eq!(Reachability::to_enum(Some("Satellite")), Reachability::Unknown);
/// ```
#[macro_export]
macro_rules! bridge_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant, )*
            /// Not recognised by this side of the bridge.
            #[default]
            Unknown,
        }

        impl $crate::enums::BridgeEnum for $name {
            const UNKNOWN: Self = Self::Unknown;
            const VARIANTS: &'static [Self] = &[$( Self::$variant, )* Self::Unknown];

            fn as_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => stringify!($variant), )*
                    Self::Unknown => "Unknown",
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::enums::BridgeEnum::as_str(self))
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                $crate::enums::serialize_wrapped(self, serializer)
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D: ::serde::Deserializer<'de>>(
                deserializer: D,
            ) -> Result<Self, D::Error> {
                $crate::enums::deserialize_wrapped(deserializer)
            }
        }
    };
}
