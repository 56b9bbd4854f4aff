//! Browser: opening URLs in the system or an in-app browser.

use crate::call::MethodCall;
use crate::dispatcher::{Capability, Dispatcher, Reply};
use crate::error::{DecodeResult, DispatchResult};
use crate::registry::CallbackRegistry;

/// Native browser implementation. Each method returns whether the URL was
/// opened.
pub trait BrowserDelegate: Send + Sync {
    fn open_external_browser(&self, url: &str) -> bool;

    fn open_internal_browser(&self, url: &str, title: &str, back_button_text: &str) -> bool;

    fn open_internal_browser_modal(&self, url: &str, title: &str, back_button_text: &str) -> bool;
}

/// In-app browser page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserPage {
    pub url: String,
    pub title: String,
    pub back_button_text: String,
}

impl BrowserPage {
    fn decode(call: &MethodCall<'_>) -> DecodeResult<Self> {
        Ok(Self {
            url: call.string(0)?,
            title: call.string(1)?,
            back_button_text: call.string(2)?,
        })
    }
}

/// Browser methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowserCommand {
    /// `openExtenalBrowser(url)`; the misspelling is the wire name.
    OpenExternal { url: String },
    /// `openInternalBrowser(url, title, backButtonText)` and its four
    /// parameter overload taking a trailing `modal` flag.
    OpenInternal { page: BrowserPage, modal: bool },
    /// `openInternalBrowserModal(url, title, backButtonText)`.
    OpenInternalModal { page: BrowserPage },
}

impl Capability for BrowserCommand {
    type Delegate = dyn BrowserDelegate;
    const BRIDGE_TYPE: &'static str = "Browser";

    fn decode(call: &MethodCall<'_>) -> DecodeResult<Option<Self>> {
        Ok(Some(match call.method() {
            "openExtenalBrowser" => Self::OpenExternal { url: call.string(0)? },
            "openInternalBrowser" => match call.arity() {
                3 => Self::OpenInternal {
                    page: BrowserPage::decode(call)?,
                    modal: false,
                },
                4 => Self::OpenInternal {
                    page: BrowserPage::decode(call)?,
                    modal: call.value(3)?,
                },
                _ => return Ok(None),
            },
            "openInternalBrowserModal" => Self::OpenInternalModal {
                page: BrowserPage::decode(call)?,
            },
            _ => return Ok(None),
        }))
    }

    fn method_name(&self) -> &'static str {
        match self {
            Self::OpenExternal { .. } => "openExtenalBrowser",
            Self::OpenInternal { .. } => "openInternalBrowser",
            Self::OpenInternalModal { .. } => "openInternalBrowserModal",
        }
    }

    fn execute(
        self,
        delegate: &dyn BrowserDelegate,
        _registry: &CallbackRegistry,
    ) -> DispatchResult<Reply> {
        let opened = match self {
            Self::OpenExternal { url } => delegate.open_external_browser(&url),
            Self::OpenInternal { page, modal: false } => {
                delegate.open_internal_browser(&page.url, &page.title, &page.back_button_text)
            }
            Self::OpenInternal { page, modal: true } | Self::OpenInternalModal { page } => {
                delegate.open_internal_browser_modal(&page.url, &page.title, &page.back_button_text)
            }
        };
        Reply::encode(&opened)
    }

    fn unimplemented(self, _registry: &CallbackRegistry) -> DispatchResult<Reply> {
        Reply::encode(&false)
    }
}

/// Dispatcher for the `Browser` bridge type.
pub type BrowserBridge = Dispatcher<BrowserCommand>;
