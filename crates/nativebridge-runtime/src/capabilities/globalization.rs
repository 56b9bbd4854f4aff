//! Globalization: locales and localized resource literals.

use nativebridge_core::{KeyPair, Locale};

use crate::call::MethodCall;
use crate::dispatcher::{Capability, Dispatcher, Reply};
use crate::error::{DecodeResult, DispatchResult};
use crate::registry::CallbackRegistry;

/// Native globalization implementation.
pub trait GlobalizationDelegate: Send + Sync {
    fn get_default_locale(&self) -> Locale;

    fn get_locale_supported_descriptors(&self) -> Vec<Locale>;

    /// Literal for `key` in `locale`, `None` when the key is not defined.
    ///
    /// A caller passing no locale is answered in [`get_default_locale`].
    ///
    /// [`get_default_locale`]: GlobalizationDelegate::get_default_locale
    fn get_resource_literal(&self, key: &str, locale: &Locale) -> Option<String>;

    fn get_resource_literals(&self, locale: &Locale) -> Vec<KeyPair>;
}

/// Globalization methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GlobalizationCommand {
    GetDefaultLocale,
    GetLocaleSupportedDescriptors,
    GetResourceLiteral {
        key: String,
        locale: Option<Locale>,
    },
    GetResourceLiterals { locale: Locale },
}

impl Capability for GlobalizationCommand {
    type Delegate = dyn GlobalizationDelegate;
    const BRIDGE_TYPE: &'static str = "Globalization";

    fn decode(call: &MethodCall<'_>) -> DecodeResult<Option<Self>> {
        Ok(Some(match call.method() {
            "getDefaultLocale" => Self::GetDefaultLocale,
            "getLocaleSupportedDescriptors" => Self::GetLocaleSupportedDescriptors,
            "getResourceLiteral" => Self::GetResourceLiteral {
                key: call.string(0)?,
                locale: call.optional(1)?,
            },
            "getResourceLiterals" => Self::GetResourceLiterals { locale: call.bean(0)? },
            _ => return Ok(None),
        }))
    }

    fn method_name(&self) -> &'static str {
        match self {
            Self::GetDefaultLocale => "getDefaultLocale",
            Self::GetLocaleSupportedDescriptors => "getLocaleSupportedDescriptors",
            Self::GetResourceLiteral { .. } => "getResourceLiteral",
            Self::GetResourceLiterals { .. } => "getResourceLiterals",
        }
    }

    fn execute(
        self,
        delegate: &dyn GlobalizationDelegate,
        _registry: &CallbackRegistry,
    ) -> DispatchResult<Reply> {
        match self {
            Self::GetDefaultLocale => Reply::encode(&delegate.get_default_locale()),
            Self::GetLocaleSupportedDescriptors => {
                Reply::encode(&delegate.get_locale_supported_descriptors())
            }
            Self::GetResourceLiteral { key, locale } => {
                let locale = locale.unwrap_or_else(|| delegate.get_default_locale());
                Reply::encode(&delegate.get_resource_literal(&key, &locale))
            }
            Self::GetResourceLiterals { locale } => {
                Reply::encode(&delegate.get_resource_literals(&locale))
            }
        }
    }

    fn unimplemented(self, _registry: &CallbackRegistry) -> DispatchResult<Reply> {
        match self {
            Self::GetLocaleSupportedDescriptors | Self::GetResourceLiterals { .. } => {
                Ok(Reply::empty_list())
            }
            Self::GetDefaultLocale | Self::GetResourceLiteral { .. } => Ok(Reply::null()),
        }
    }
}

/// Dispatcher for the `Globalization` bridge type.
pub type GlobalizationBridge = Dispatcher<GlobalizationCommand>;
