//! Pub/Sub event bus for decoupled trigger delivery.
//!
//! Architecture:
//! - The owner constructs one bus and hands [`EventEmitter`] handles to
//!   input adapters (no process-wide singleton).
//! - Consumers subscribe per event type; emit() invokes callbacks
//!   immediately on the emitting thread.
//! - subscribe() returns a [`SubscriptionId`] so one consumer can detach
//!   without clearing other subscribers of the same event type.
//!
//! Callback order: FIFO (first-subscribed, first-called) within same event
//! type. Callbacks run on the emitter's thread, so they must stay cheap;
//! a sequencer binding only forwards the event into its own command channel
//! and does the actual state transition on its own thread.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use log::trace;

/// Marker trait for events. Events must be Send + Sync + 'static.
pub trait Event: Any + Send + Sync + 'static {
    fn as_any(&self) -> &dyn Any;
    fn type_name(&self) -> &'static str;
}

// Blanket impl for all qualifying types
impl<T: Any + Send + Sync + 'static> Event for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// Type-erased callback
type Callback = Arc<dyn Fn(&dyn Any) + Send + Sync>;

/// Token identifying one subscription; pass to [`EventBus::unsubscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type SubscriberMap = HashMap<TypeId, Vec<(SubscriptionId, Callback)>>;

/// Pub/Sub event bus.
///
/// Cloning the bus (or taking an [`emitter`](EventBus::emitter) handle)
/// shares the same subscriber table, so producers and consumers can live
/// on different threads.
#[derive(Clone)]
pub struct EventBus {
    subscribers: Arc<RwLock<SubscriberMap>>,
    next_id: Arc<AtomicU64>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            subscribers: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Subscribe to events of type E.
    ///
    /// The callback is invoked on the thread that calls emit(), so keep it
    /// cheap and thread-safe -- typically a channel send.
    ///
    /// # Example
    /// ```ignore
    /// let (tx, rx) = crossbeam_channel::unbounded();
    /// let id = event_bus.subscribe::<TriggerEvent, _>(move |_| {
    ///     let _ = tx.send(Command::Trigger);
    /// });
    /// // later: event_bus.unsubscribe(id);
    /// ```
    pub fn subscribe<E, F>(&self, callback: F) -> SubscriptionId
    where
        E: Event,
        F: Fn(&E) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let wrapped: Callback = Arc::new(move |any: &dyn Any| {
            if let Some(event) = any.downcast_ref::<E>() {
                callback(event);
            }
        });
        self.subscribers
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .entry(TypeId::of::<E>())
            .or_default()
            .push((id, wrapped));
        id
    }

    /// Emit event: invoke all callbacks registered for its type.
    pub fn emit<E: Event>(&self, event: E) {
        trace!("Emit {}", event.type_name());
        dispatch(&self.subscribers, &event);
    }

    /// Get an emitter handle for passing to input adapters.
    pub fn emitter(&self) -> EventEmitter {
        EventEmitter {
            subscribers: Arc::clone(&self.subscribers),
        }
    }

    /// Remove one subscription by token.
    ///
    /// Returns true if the subscription was still registered. Other
    /// subscribers of the same event type stay attached.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut map = self.subscribers.write().unwrap_or_else(|e| e.into_inner());
        let mut removed = false;
        map.retain(|_, subs| {
            let before = subs.len();
            subs.retain(|(sub_id, _)| *sub_id != id);
            removed |= subs.len() != before;
            !subs.is_empty()
        });
        removed
    }

    /// Clear all subscribers for type E
    pub fn unsubscribe_all<E: Event>(&self) {
        self.subscribers
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&TypeId::of::<E>());
    }

    /// Clear all subscribers
    pub fn clear(&self) {
        self.subscribers
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }

    /// Check if there are subscribers for event type E
    pub fn has_subscribers<E: Event>(&self) -> bool {
        self.subscribers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&TypeId::of::<E>())
            .map(|v| !v.is_empty())
            .unwrap_or(false)
    }
}

/// Lightweight emitter handle for input adapters.
///
/// Can be cloned and moved into producer threads; emitting from a handle
/// reaches every subscriber of the originating bus.
#[derive(Clone)]
pub struct EventEmitter {
    subscribers: Arc<RwLock<SubscriberMap>>,
}

impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field(
                "subscriber_types",
                &self.subscribers.read().map(|s| s.len()).unwrap_or(0),
            )
            .finish()
    }
}

impl EventEmitter {
    /// Emit event: invoke all callbacks registered for its type.
    pub fn emit<E: Event>(&self, event: E) {
        trace!("Emit {}", event.type_name());
        dispatch(&self.subscribers, &event);
    }
}

fn dispatch<E: Event>(subscribers: &RwLock<SubscriberMap>, event: &E) {
    if let Some(cbs) = subscribers
        .read()
        .unwrap_or_else(|e| e.into_inner())
        .get(&TypeId::of::<E>())
    {
        for (_, cb) in cbs {
            cb(event.as_any());
        }
    }
}
