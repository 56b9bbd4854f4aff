//! Async callback registry.
//!
//! Maps async ids to live registrations and routes fired events to the
//! [`EventSink`]. Per id the lifecycle is:
//!
//! ```text
//! callback:  Registered -> Fired (once)
//! listener:  Registered -> Fired (0..N) -> Removed
//! ```
//!
//! Consumed and removed ids are retired: they are remembered (up to a bounded
//! capacity) so that a late second delivery is dropped and a re-registration
//! is refused. Removing a listener stops future deliveries only; a native
//! event already racing past the lock may still be delivered once.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use nativebridge_core::BridgeEnum;
use nativebridge_protocol::AsyncId;
use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::callback::{Callback, CallbackEvent};
use crate::config::RuntimeConfig;
use crate::error::{RegistryError, RegistryResult};
use crate::sink::EventSink;

/// How many times a registration may fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackMode {
    /// Fires at most once, then is retired.
    SingleShot,
    /// Fires any number of times until removed.
    Listener,
}

/// Outcome of firing an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The event was pushed to the sink.
    Delivered,
    /// No live registration matched; the event was discarded.
    Dropped,
}

/// Snapshot of one live registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationInfo {
    pub async_id: AsyncId,
    pub kind: &'static str,
    pub mode: CallbackMode,
    pub registered_at: DateTime<Utc>,
    pub fire_count: u64,
    pub last_fired_at: Option<DateTime<Utc>>,
}

#[derive(Debug)]
struct Entry {
    kind: &'static str,
    mode: CallbackMode,
    registered_at: DateTime<Utc>,
    fire_count: u64,
    last_fired_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default)]
struct Inner {
    live: HashMap<AsyncId, Entry>,
    retired: HashSet<AsyncId>,
    retired_order: VecDeque<AsyncId>,
}

impl Inner {
    fn retire(&mut self, async_id: AsyncId, capacity: usize) {
        if capacity == 0 || !self.retired.insert(async_id) {
            return;
        }
        self.retired_order.push_back(async_id);
        while self.retired_order.len() > capacity {
            if let Some(oldest) = self.retired_order.pop_front() {
                self.retired.remove(&oldest);
            }
        }
    }
}

/// Registry of pending callbacks and listeners.
///
/// Safe to share between the dispatch thread and any number of native
/// callback threads. The lock is never held while the sink runs.
pub struct CallbackRegistry {
    inner: Mutex<Inner>,
    sink: Arc<dyn EventSink>,
    retired_capacity: usize,
}

impl CallbackRegistry {
    /// Creates a registry with default settings.
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self::with_config(sink, &RuntimeConfig::default())
    }

    /// Creates a registry honouring `config.retired_id_capacity`.
    pub fn with_config(sink: Arc<dyn EventSink>, config: &RuntimeConfig) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            sink,
            retired_capacity: config.retired_id_capacity,
        }
    }

    /// Registers `async_id` for callbacks of type `kind`.
    pub fn register(
        &self,
        async_id: AsyncId,
        kind: &'static str,
        mode: CallbackMode,
    ) -> RegistryResult<()> {
        if async_id <= 0 {
            return Err(RegistryError::InvalidId(async_id));
        }
        let mut inner = self.inner.lock();
        if inner.live.contains_key(&async_id) {
            return Err(RegistryError::AlreadyRegistered(async_id));
        }
        if inner.retired.contains(&async_id) {
            return Err(RegistryError::Retired(async_id));
        }
        inner.live.insert(
            async_id,
            Entry {
                kind,
                mode,
                registered_at: Utc::now(),
                fire_count: 0,
                last_fired_at: None,
            },
        );
        debug!(async_id, kind, ?mode, "Callback registered");
        Ok(())
    }

    /// Registers a single-shot callback and returns its handle.
    pub fn register_callback<T, W, E>(
        self: &Arc<Self>,
        async_id: AsyncId,
        kind: &'static str,
    ) -> RegistryResult<Callback<T, W, E>>
    where
        T: Serialize,
        W: BridgeEnum + Serialize,
        E: BridgeEnum + Serialize,
    {
        self.register(async_id, kind, CallbackMode::SingleShot)?;
        Ok(Callback::new(async_id, kind, Arc::clone(self)))
    }

    /// Registers a listener and returns its handle.
    pub fn register_listener<T, W, E>(
        self: &Arc<Self>,
        async_id: AsyncId,
        kind: &'static str,
    ) -> RegistryResult<Callback<T, W, E>>
    where
        T: Serialize,
        W: BridgeEnum + Serialize,
        E: BridgeEnum + Serialize,
    {
        self.register(async_id, kind, CallbackMode::Listener)?;
        Ok(Callback::new(async_id, kind, Arc::clone(self)))
    }

    /// Routes one event to the sink if its id has a live registration of the
    /// same kind. A single-shot registration is retired by its first delivery.
    pub fn deliver(&self, event: CallbackEvent) -> Delivery {
        {
            let mut inner = self.inner.lock();
            let Some(entry) = inner.live.get_mut(&event.async_id) else {
                let retired = inner.retired.contains(&event.async_id);
                drop(inner);
                warn!(
                    async_id = event.async_id,
                    kind = event.kind,
                    retired,
                    "Dropping event for an id with no live registration"
                );
                return Delivery::Dropped;
            };
            if entry.kind != event.kind {
                warn!(
                    async_id = event.async_id,
                    registered = entry.kind,
                    fired = event.kind,
                    "Dropping event fired with a mismatched callback type"
                );
                return Delivery::Dropped;
            }
            entry.fire_count += 1;
            entry.last_fired_at = Some(Utc::now());
            if entry.mode == CallbackMode::SingleShot {
                inner.live.remove(&event.async_id);
                inner.retire(event.async_id, self.retired_capacity);
            }
        }
        trace!(
            async_id = event.async_id,
            kind = event.kind,
            channel = event.payload.channel(),
            "Delivering callback event"
        );
        self.sink.push(event);
        Delivery::Delivered
    }

    /// Removes the listener `async_id` if it is registered as `kind`.
    ///
    /// Idempotent: removing an unknown or already removed id is a no-op.
    /// Returns true if a registration was removed.
    pub fn remove_listener(&self, kind: &'static str, async_id: AsyncId) -> bool {
        let mut inner = self.inner.lock();
        match inner.live.get(&async_id) {
            Some(entry) if entry.kind == kind => {
                inner.live.remove(&async_id);
                inner.retire(async_id, self.retired_capacity);
                debug!(async_id, kind, "Listener removed");
                true
            }
            _ => false,
        }
    }

    /// Removes every listener of type `kind`. Returns how many were removed.
    pub fn remove_listeners(&self, kind: &'static str) -> usize {
        let mut inner = self.inner.lock();
        let ids: Vec<AsyncId> = inner
            .live
            .iter()
            .filter(|(_, entry)| entry.kind == kind)
            .map(|(id, _)| *id)
            .collect();
        for id in &ids {
            inner.live.remove(id);
            inner.retire(*id, self.retired_capacity);
        }
        debug!(kind, removed = ids.len(), "Listeners removed");
        ids.len()
    }

    /// Drops a registration without retiring its id, so the caller may retry
    /// with the same id. Used when the request that registered it fails.
    pub fn discard(&self, async_id: AsyncId) -> bool {
        let removed = self.inner.lock().live.remove(&async_id).is_some();
        if removed {
            debug!(async_id, "Registration discarded");
        }
        removed
    }

    /// Returns true if `async_id` has a live registration.
    pub fn is_registered(&self, async_id: AsyncId) -> bool {
        self.inner.lock().live.contains_key(&async_id)
    }

    /// Returns true if `async_id` was consumed or removed (and is still
    /// remembered).
    pub fn is_retired(&self, async_id: AsyncId) -> bool {
        self.inner.lock().retired.contains(&async_id)
    }

    /// Number of live registrations.
    pub fn len(&self) -> usize {
        self.inner.lock().live.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of one registration.
    pub fn registration(&self, async_id: AsyncId) -> Option<RegistrationInfo> {
        self.inner.lock().live.get(&async_id).map(|entry| RegistrationInfo {
            async_id,
            kind: entry.kind,
            mode: entry.mode,
            registered_at: entry.registered_at,
            fire_count: entry.fire_count,
            last_fired_at: entry.last_fired_at,
        })
    }

    /// Ids of the live listeners of type `kind`, ascending.
    pub fn listeners_of(&self, kind: &str) -> Vec<AsyncId> {
        let inner = self.inner.lock();
        let mut ids: Vec<AsyncId> = inner
            .live
            .iter()
            .filter(|(_, entry)| entry.kind == kind && entry.mode == CallbackMode::Listener)
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();
        ids
    }
}

impl std::fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("live", &self.len())
            .field("retired_capacity", &self.retired_capacity)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use nativebridge_core::{
        Acceleration, AccelerationListenerError, AccelerationListenerWarning, ServiceResponse,
        ServiceResultCallbackError, ServiceResultCallbackWarning,
    };
    use tokio::sync::mpsc::UnboundedReceiver;

    use super::*;
    use crate::callback::EventPayload;
    use crate::sink::ChannelSink;

    type ResultCallback =
        Callback<ServiceResponse, ServiceResultCallbackWarning, ServiceResultCallbackError>;
    type Listener = Callback<Acceleration, AccelerationListenerWarning, AccelerationListenerError>;

    const SERVICE: &str = "ServiceResultCallback";
    const ACCEL: &str = "AccelerationListener";

    fn registry() -> (Arc<CallbackRegistry>, UnboundedReceiver<CallbackEvent>) {
        let (sink, receiver) = ChannelSink::channel();
        (Arc::new(CallbackRegistry::new(Arc::new(sink))), receiver)
    }

    fn drain(receiver: &mut UnboundedReceiver<CallbackEvent>) -> Vec<CallbackEvent> {
        let mut events = Vec::new();
        while let Ok(event) = receiver.try_recv() {
            events.push(event);
        }
        events
    }

    #[test]
    fn single_shot_fires_once() {
        let (registry, mut receiver) = registry();
        let callback: ResultCallback = registry.register_callback(12, SERVICE).unwrap();
        assert!(registry.is_registered(12));

        let response = ServiceResponse::new(200, "ok");
        assert_eq!(callback.on_result(&response), Delivery::Delivered);
        assert_eq!(callback.on_error(ServiceResultCallbackError::TimeOut), Delivery::Dropped);
        assert_eq!(
            callback.clone().on_warning(&response, ServiceResultCallbackWarning::NotSecure),
            Delivery::Dropped
        );

        let events = drain(&mut receiver);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].async_id, 12);
        assert!(matches!(events[0].payload, EventPayload::Result { .. }));
        assert!(!registry.is_registered(12));
        assert!(registry.is_retired(12));
    }

    #[test]
    fn listener_fires_until_removed() {
        let (registry, mut receiver) = registry();
        let listener: Listener = registry.register_listener(4, ACCEL).unwrap();

        for i in 0..3 {
            assert_eq!(
                listener.on_result(&Acceleration::new(0.0, 0.0, 1.0, i)),
                Delivery::Delivered
            );
        }
        assert_eq!(
            listener.on_warning(&Acceleration::default(), AccelerationListenerWarning::Stale),
            Delivery::Delivered
        );
        assert_eq!(registry.registration(4).unwrap().fire_count, 4);

        assert!(registry.remove_listener(ACCEL, 4));
        assert_eq!(listener.on_result(&Acceleration::default()), Delivery::Dropped);

        let events = drain(&mut receiver);
        assert_eq!(events.len(), 4);
        assert!(events.iter().all(|e| e.async_id == 4 && e.kind == ACCEL));
        assert_eq!(events[3].payload.channel(), "Warning");
    }

    #[test]
    fn listener_events_keep_native_order() {
        let (registry, mut receiver) = registry();
        let listener: Listener = registry.register_listener(1, ACCEL).unwrap();
        for timestamp in [30, 10, 20] {
            listener.on_result(&Acceleration::new(0.0, 0.0, 0.0, timestamp));
        }
        let stamps: Vec<String> = drain(&mut receiver)
            .into_iter()
            .map(|event| match event.payload {
                EventPayload::Result { data } => data,
                other => panic!("unexpected payload {other:?}"),
            })
            .collect();
        assert!(stamps[0].contains("30"));
        assert!(stamps[1].contains("10"));
        assert!(stamps[2].contains("20"));
    }

    #[test]
    fn removal_is_idempotent() {
        let (registry, _receiver) = registry();
        let _listener: Listener = registry.register_listener(8, ACCEL).unwrap();

        assert!(registry.remove_listener(ACCEL, 8));
        assert!(!registry.remove_listener(ACCEL, 8));
        assert!(!registry.remove_listener(ACCEL, 999));
        assert!(registry.is_empty());
    }

    #[test]
    fn remove_listener_checks_kind() {
        let (registry, _receiver) = registry();
        let _listener: Listener = registry.register_listener(8, ACCEL).unwrap();
        assert!(!registry.remove_listener("DeviceOrientationListener", 8));
        assert!(registry.is_registered(8));
    }

    #[test]
    fn remove_listeners_by_kind() {
        let (registry, _receiver) = registry();
        let _a: Listener = registry.register_listener(1, ACCEL).unwrap();
        let _b: Listener = registry.register_listener(2, ACCEL).unwrap();
        let _c: ResultCallback = registry.register_callback(3, SERVICE).unwrap();

        assert_eq!(registry.listeners_of(ACCEL), vec![1, 2]);
        assert_eq!(registry.remove_listeners(ACCEL), 2);
        assert_eq!(registry.remove_listeners(ACCEL), 0);
        assert!(registry.listeners_of(ACCEL).is_empty());
        assert!(registry.is_registered(3));
    }

    #[test]
    fn registration_rules() {
        let (registry, _receiver) = registry();
        assert_eq!(
            registry.register(0, SERVICE, CallbackMode::SingleShot),
            Err(RegistryError::InvalidId(0))
        );
        registry.register(5, SERVICE, CallbackMode::SingleShot).unwrap();
        assert_eq!(
            registry.register(5, SERVICE, CallbackMode::SingleShot),
            Err(RegistryError::AlreadyRegistered(5))
        );

        registry.register(6, ACCEL, CallbackMode::Listener).unwrap();
        registry.remove_listener(ACCEL, 6);
        assert_eq!(
            registry.register(6, ACCEL, CallbackMode::Listener),
            Err(RegistryError::Retired(6))
        );
    }

    #[test]
    fn discard_allows_retry() {
        let (registry, _receiver) = registry();
        registry.register(5, SERVICE, CallbackMode::SingleShot).unwrap();
        assert!(registry.discard(5));
        assert!(!registry.discard(5));
        assert!(!registry.is_retired(5));
        registry.register(5, SERVICE, CallbackMode::SingleShot).unwrap();
    }

    #[test]
    fn retired_ids_are_bounded() {
        let (sink, _receiver) = ChannelSink::channel();
        let config = RuntimeConfig::default().with_retired_id_capacity(2);
        let registry = CallbackRegistry::with_config(Arc::new(sink), &config);

        for id in 1..=3 {
            registry.register(id, ACCEL, CallbackMode::Listener).unwrap();
            registry.remove_listener(ACCEL, id);
        }
        assert!(!registry.is_retired(1));
        assert!(registry.is_retired(2));
        assert!(registry.is_retired(3));
        registry.register(1, ACCEL, CallbackMode::Listener).unwrap();
    }

    #[test]
    fn mismatched_kind_is_dropped() {
        let (registry, mut receiver) = registry();
        registry.register(7, SERVICE, CallbackMode::SingleShot).unwrap();
        let stray: Listener = Callback::new(7, ACCEL, Arc::clone(&registry));
        assert_eq!(stray.on_result(&Acceleration::default()), Delivery::Dropped);
        assert!(registry.is_registered(7));
        assert!(drain(&mut receiver).is_empty());
    }

    #[test]
    fn concurrent_firing_delivers_single_shot_once() {
        let (registry, mut receiver) = registry();
        let callback: ResultCallback = registry.register_callback(42, SERVICE).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let callback = callback.clone();
                thread::spawn(move || callback.on_result(&ServiceResponse::new(200, "race")))
            })
            .collect();
        let delivered = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|d| *d == Delivery::Delivered)
            .count();

        assert_eq!(delivered, 1);
        assert_eq!(drain(&mut receiver).len(), 1);
    }

    #[test]
    fn concurrent_registration_and_firing() {
        let (registry, mut receiver) = registry();
        let handles: Vec<_> = (1..=16)
            .map(|id| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    let listener: Listener = registry.register_listener(id, ACCEL).unwrap();
                    listener.on_result(&Acceleration::default());
                    listener.on_result(&Acceleration::default());
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(registry.len(), 16);
        assert_eq!(drain(&mut receiver).len(), 32);
    }
}
