//! Event sinks: where fired callback events go.
//!
//! The registry pushes every accepted [`CallbackEvent`] into one sink. Hosts
//! typically drain a [`ChannelSink`] on their UI/web-view thread and evaluate
//! [`CallbackEvent::to_script`] for each event.

use tokio::sync::mpsc;
use tracing::warn;

use crate::callback::CallbackEvent;
use crate::config::RuntimeConfig;

/// Receives callback events on behalf of the caller side.
///
/// `push` may be called from any native thread and must not block for long.
pub trait EventSink: Send + Sync {
    /// Delivers one event.
    fn push(&self, event: CallbackEvent);
}

/// Sink backed by an unbounded tokio channel.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: mpsc::UnboundedSender<CallbackEvent>,
}

impl ChannelSink {
    /// Creates a sink and the receiver that drains it.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<CallbackEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl EventSink for ChannelSink {
    fn push(&self, event: CallbackEvent) {
        if let Err(mpsc::error::SendError(event)) = self.sender.send(event) {
            warn!(
                async_id = event.async_id,
                kind = event.kind,
                "Event receiver dropped, discarding callback event"
            );
        }
    }
}

/// Sink that forwards every event to a closure.
pub struct FnSink<F>(F);

impl<F> FnSink<F>
where
    F: Fn(CallbackEvent) + Send + Sync,
{
    /// Wraps a closure.
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> EventSink for FnSink<F>
where
    F: Fn(CallbackEvent) + Send + Sync,
{
    fn push(&self, event: CallbackEvent) {
        (self.0)(event)
    }
}

impl<F> std::fmt::Debug for FnSink<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnSink").finish_non_exhaustive()
    }
}

/// Sink that renders every event as a caller-side script and hands the text
/// to a closure, typically one evaluating it in a web view.
pub struct ScriptSink<F> {
    namespace: String,
    evaluate: F,
}

impl<F> ScriptSink<F>
where
    F: Fn(String) + Send + Sync,
{
    /// Creates a sink rendering handler calls under `namespace`.
    pub fn new(namespace: impl Into<String>, evaluate: F) -> Self {
        Self {
            namespace: namespace.into(),
            evaluate,
        }
    }

    /// Creates a sink using the configured script namespace.
    pub fn from_config(config: &RuntimeConfig, evaluate: F) -> Self {
        Self::new(config.script_namespace.clone(), evaluate)
    }
}

impl<F> EventSink for ScriptSink<F>
where
    F: Fn(String) + Send + Sync,
{
    fn push(&self, event: CallbackEvent) {
        (self.evaluate)(event.to_script(&self.namespace))
    }
}

impl<F> std::fmt::Debug for ScriptSink<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptSink")
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}
