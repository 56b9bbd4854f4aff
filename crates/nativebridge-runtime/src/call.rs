//! Decoding context for one bridge invocation.

use std::cell::Cell;
use std::sync::Arc;

use nativebridge_core::{Bean, BridgeEnum, CodecError, NULL_LITERAL, NULL_SENTINEL, decode};
use nativebridge_protocol::AsyncId;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::callback::Callback;
use crate::error::{DecodeError, DecodeResult};
use crate::registry::CallbackRegistry;

/// Positional parameters of one request plus the means to register its
/// callback.
///
/// Parameters are JSON texts decoded on demand. At most one callback or
/// listener is registered per call; if dispatch fails afterwards the
/// registration is rolled back with [`MethodCall::rollback`].
#[derive(Debug)]
pub struct MethodCall<'a> {
    method: &'a str,
    params: &'a [String],
    async_id: Option<AsyncId>,
    registry: &'a Arc<CallbackRegistry>,
    registered: Cell<Option<AsyncId>>,
}

impl<'a> MethodCall<'a> {
    pub fn new(
        method: &'a str,
        params: &'a [String],
        async_id: Option<AsyncId>,
        registry: &'a Arc<CallbackRegistry>,
    ) -> Self {
        Self {
            method,
            params,
            async_id,
            registry,
            registered: Cell::new(None),
        }
    }

    pub fn method(&self) -> &'a str {
        self.method
    }

    /// Number of positional parameters.
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// The request's async id, zero already treated as absent.
    pub fn async_id(&self) -> Option<AsyncId> {
        self.async_id
    }

    fn raw(&self, index: usize) -> DecodeResult<&'a str> {
        self.params
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| DecodeError::MissingParameter {
                method: self.method.to_string(),
                index,
            })
    }

    fn invalid(&self, index: usize) -> impl FnOnce(CodecError) -> DecodeError + '_ {
        move |source| DecodeError::InvalidParameter {
            method: self.method.to_string(),
            index,
            source,
        }
    }

    /// Raw text of a required parameter; `null` and `"<null>"` are refused.
    fn required(&self, index: usize) -> DecodeResult<&'a str> {
        let raw = self.raw(index)?;
        if is_null(raw) {
            return Err(DecodeError::NullParameter {
                method: self.method.to_string(),
                index,
            });
        }
        Ok(raw)
    }

    /// Decodes parameter `index` as any deserializable value.
    ///
    /// The parameter is required. Use [`MethodCall::optional`] where the
    /// caller may pass `null`.
    pub fn value<T: DeserializeOwned>(&self, index: usize) -> DecodeResult<T> {
        decode(self.required(index)?).map_err(self.invalid(index))
    }

    /// Decodes parameter `index` as a string.
    pub fn string(&self, index: usize) -> DecodeResult<String> {
        self.value(index)
    }

    /// Decodes parameter `index`, mapping `null` and `"<null>"` to `None`.
    pub fn optional<T: DeserializeOwned>(&self, index: usize) -> DecodeResult<Option<T>> {
        let raw = self.raw(index)?;
        if is_null(raw) {
            return Ok(None);
        }
        decode(raw).map(Some).map_err(self.invalid(index))
    }

    /// Decodes parameter `index` as a bean. The parameter must be an object.
    pub fn bean<T: Bean>(&self, index: usize) -> DecodeResult<T> {
        T::from_json(self.required(index)?).map_err(self.invalid(index))
    }

    /// Decodes parameter `index` as a bridge enum.
    ///
    /// Anything that is not a recognised name, malformed JSON included,
    /// resolves to `UNKNOWN`. Only a missing parameter is an error.
    pub fn enumeration<E: BridgeEnum>(&self, index: usize) -> DecodeResult<E> {
        let raw = self.raw(index)?;
        Ok(serde_json::from_str::<Value>(raw)
            .map(|value| E::from_wire(&value))
            .unwrap_or(E::UNKNOWN))
    }

    /// Registers a single-shot callback of type `kind` under the request's
    /// async id.
    pub fn callback<T, W, E>(&self, kind: &'static str) -> DecodeResult<Callback<T, W, E>>
    where
        T: Serialize,
        W: BridgeEnum + Serialize,
        E: BridgeEnum + Serialize,
    {
        let async_id = self.require_async_id()?;
        let callback = self.registry.register_callback(async_id, kind)?;
        self.registered.set(Some(async_id));
        Ok(callback)
    }

    /// Registers a listener of type `kind` under the request's async id.
    pub fn listener<T, W, E>(&self, kind: &'static str) -> DecodeResult<Callback<T, W, E>>
    where
        T: Serialize,
        W: BridgeEnum + Serialize,
        E: BridgeEnum + Serialize,
    {
        let async_id = self.require_async_id()?;
        let listener = self.registry.register_listener(async_id, kind)?;
        self.registered.set(Some(async_id));
        Ok(listener)
    }

    /// Id of the listener a `remove...Listener` call refers to, if any.
    pub fn listener_id(&self) -> Option<AsyncId> {
        self.async_id
    }

    /// Undoes the registration made by this call, if any.
    pub fn rollback(&self) {
        if let Some(async_id) = self.registered.take() {
            self.registry.discard(async_id);
        }
    }

    fn require_async_id(&self) -> DecodeResult<AsyncId> {
        self.async_id.ok_or_else(|| DecodeError::MissingAsyncId {
            method: self.method.to_string(),
        })
    }
}

fn is_null(raw: &str) -> bool {
    let raw = raw.trim();
    raw == NULL_LITERAL
        || raw.strip_prefix('"').and_then(|s| s.strip_suffix('"')) == Some(NULL_SENTINEL)
}

#[cfg(test)]
mod tests {
    use nativebridge_core::{
        CapabilitiesOrientation, Locale, ServiceResponse, ServiceResultCallbackError,
        ServiceResultCallbackWarning,
    };

    use super::*;
    use crate::callback::CallbackEvent;
    use crate::error::RegistryError;
    use crate::sink::FnSink;

    type ResultCallback =
        Callback<ServiceResponse, ServiceResultCallbackWarning, ServiceResultCallbackError>;

    fn registry() -> Arc<CallbackRegistry> {
        Arc::new(CallbackRegistry::new(Arc::new(FnSink::new(|_: CallbackEvent| {}))))
    }

    fn params(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn decodes_primitives_and_beans() {
        let registry = registry();
        let params = params(&[r#""+34911234567""#, "true", r#"{"language":"es","country":"ES"}"#]);
        let call = MethodCall::new("m", &params, None, &registry);

        assert_eq!(call.arity(), 3);
        assert_eq!(call.string(0).unwrap(), "+34911234567");
        assert!(call.value::<bool>(1).unwrap());
        assert_eq!(call.bean::<Locale>(2).unwrap(), Locale::new("es", "ES"));
    }

    #[test]
    fn missing_and_invalid_parameters() {
        let registry = registry();
        let params = params(&["42"]);
        let call = MethodCall::new("call", &params, None, &registry);

        assert!(matches!(
            call.string(0),
            Err(DecodeError::InvalidParameter { index: 0, .. })
        ));
        assert!(matches!(
            call.bean::<Locale>(0),
            Err(DecodeError::InvalidParameter { index: 0, .. })
        ));
        assert!(matches!(
            call.string(1),
            Err(DecodeError::MissingParameter { index: 1, .. })
        ));
    }

    #[test]
    fn required_parameters_refuse_null() {
        let registry = registry();
        let params = params(&["null", r#""<null>""#, r#" "<null>" "#]);
        let call = MethodCall::new("m", &params, None, &registry);

        for index in 0..3 {
            assert!(matches!(
                call.string(index),
                Err(DecodeError::NullParameter { index: i, .. }) if i == index
            ));
        }
        assert!(matches!(
            call.bean::<Locale>(1),
            Err(DecodeError::NullParameter { index: 1, .. })
        ));
        assert!(matches!(
            call.value::<bool>(0),
            Err(DecodeError::NullParameter { index: 0, .. })
        ));
    }

    #[test]
    fn optional_parameters() {
        let registry = registry();
        let params = params(&["null", r#""<null>""#, r#""x""#]);
        let call = MethodCall::new("m", &params, None, &registry);

        assert_eq!(call.optional::<String>(0).unwrap(), None);
        assert_eq!(call.optional::<String>(1).unwrap(), None);
        assert_eq!(call.optional::<String>(2).unwrap().as_deref(), Some("x"));
    }

    #[test]
    fn enums_fail_soft() {
        let registry = registry();
        let params = params(&[r#"{"value":"LandscapeLeft"}"#, r#"{"value":"Sideways"}"#, "{oops"]);
        let call = MethodCall::new("m", &params, None, &registry);

        assert_eq!(
            call.enumeration::<CapabilitiesOrientation>(0).unwrap(),
            CapabilitiesOrientation::LandscapeLeft
        );
        assert_eq!(
            call.enumeration::<CapabilitiesOrientation>(1).unwrap(),
            CapabilitiesOrientation::Unknown
        );
        assert_eq!(
            call.enumeration::<CapabilitiesOrientation>(2).unwrap(),
            CapabilitiesOrientation::Unknown
        );
        assert!(call.enumeration::<CapabilitiesOrientation>(3).is_err());
    }

    #[test]
    fn callback_requires_async_id() {
        let registry = registry();
        let call = MethodCall::new("invokeService", &[], None, &registry);
        let result: DecodeResult<ResultCallback> = call.callback("ServiceResultCallback");
        assert!(matches!(result, Err(DecodeError::MissingAsyncId { .. })));
        assert!(registry.is_empty());
    }

    #[test]
    fn rollback_discards_registration() {
        let registry = registry();
        let call = MethodCall::new("invokeService", &[], Some(9), &registry);
        let _callback: ResultCallback = call.callback("ServiceResultCallback").unwrap();
        assert!(registry.is_registered(9));

        call.rollback();
        assert!(!registry.is_registered(9));
        assert!(!registry.is_retired(9));
        call.rollback();
    }

    #[test]
    fn duplicate_registration_is_reported() {
        let registry = registry();
        let call = MethodCall::new("invokeService", &[], Some(9), &registry);
        let _first: ResultCallback = call.callback("ServiceResultCallback").unwrap();

        let again = MethodCall::new("invokeService", &[], Some(9), &registry);
        let result: DecodeResult<ResultCallback> = again.callback("ServiceResultCallback");
        assert!(matches!(
            result,
            Err(DecodeError::Registry(RegistryError::AlreadyRegistered(9)))
        ));
        again.rollback();
        assert!(registry.is_registered(9));
    }
}
