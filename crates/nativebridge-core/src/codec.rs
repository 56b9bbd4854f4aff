//! Bean serializer.
//!
//! Beans are encoded as JSON object literals with one key per field, in
//! declaration order, and `null` for every unset field. Decoding populates
//! only the fields that are present and non-null; a field whose value is the
//! string `"<null>"` is treated as absent as well, which existing web clients
//! rely on.

use serde::de::{DeserializeOwned, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Text some clients emit in place of a JSON `null`.
pub const NULL_SENTINEL: &str = "<null>";

/// Encoded form of an absent or void value.
pub const NULL_LITERAL: &str = "null";

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors raised while encoding or decoding bridge values.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The input is not valid JSON or does not fit the target type.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A bean was expected but the JSON value is not an object.
    #[error("expected a JSON object, found {found}")]
    NotAnObject { found: &'static str },
}

/// A plain serializable record crossing the bridge.
///
/// Implementors derive `Serialize`/`Deserialize` with every field declared as
/// `Option<_>` and annotated with `#[serde(default, deserialize_with =
/// "crate::codec::nullable")]`.
pub trait Bean: Serialize + DeserializeOwned {
    /// Encodes the bean as a JSON object literal.
    fn to_json(&self) -> CodecResult<String> {
        encode(self)
    }

    /// Decodes a bean from JSON text, which must hold an object.
    fn from_json(json: &str) -> CodecResult<Self> {
        match serde_json::from_str::<Value>(json)? {
            Value::Object(map) => Self::from_dictionary(&map),
            other => Err(CodecError::NotAnObject {
                found: value_kind(&other),
            }),
        }
    }

    /// Decodes a bean from an already parsed JSON object.
    fn from_dictionary(map: &Map<String, Value>) -> CodecResult<Self> {
        Ok(serde_json::from_value(Value::Object(map.clone()))?)
    }
}

/// Encodes any serializable value into its JSON text form.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> CodecResult<String> {
    Ok(serde_json::to_string(value)?)
}

/// Decodes JSON text into `T`.
pub fn decode<T: DeserializeOwned>(json: &str) -> CodecResult<T> {
    Ok(serde_json::from_str(json)?)
}

/// Field deserializer for nullable bean fields.
///
/// Maps JSON `null` and the `"<null>"` sentinel to `None`.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s == NULL_SENTINEL => Ok(None),
        Some(value) => T::deserialize(value)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Field serializer for floating point bean fields.
///
/// JSON has no NaN or infinity; such values are refused instead of being
/// written as `null`.
pub fn finite<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) if !v.is_finite() => Err(serde::ser::Error::custom(format!(
            "non-finite number {v} cannot be encoded"
        ))),
        _ => value.serialize(serializer),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
