//! The event channel and its RAII subscription guard.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};

use tracing::trace;

use super::message::{EventKind, ShellEvent};

type Handler = Arc<dyn Fn(&ShellEvent) + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    subscribers: HashMap<EventKind, Vec<(u64, Handler)>>,
}

/// Cloneable handle to the window-scoped event channel
///
/// Publish is fire-and-forget: messages go synchronously to the
/// subscribers registered at that moment, and a message with no
/// subscriber is silently dropped. The channel holds no state beyond
/// its registrations.
#[derive(Clone, Default)]
pub struct EventChannel {
    registry: Arc<Mutex<Registry>>,
}

impl EventChannel {
    /// Create a fresh channel with no subscribers
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for one message kind
    ///
    /// The returned [`Subscription`] unregisters the handler when
    /// dropped, which is the only correct way to release it: tie it to
    /// the owning component so teardown happens on every exit path.
    pub fn subscribe<F>(&self, kind: EventKind, handler: F) -> Subscription
    where
        F: Fn(&ShellEvent) + Send + Sync + 'static,
    {
        let mut registry = self.registry.lock().expect("event registry poisoned");
        let id = registry.next_id;
        registry.next_id += 1;
        registry
            .subscribers
            .entry(kind)
            .or_default()
            .push((id, Arc::new(handler)));
        Subscription {
            id,
            kind,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Publish a message to every current subscriber of its kind
    ///
    /// Handlers are cloned out of the registry before invocation, so a
    /// handler may publish or subscribe re-entrantly without
    /// deadlocking. Ordering between subscribers is unspecified.
    pub fn publish(&self, event: ShellEvent) {
        let handlers: Vec<Handler> = {
            let registry = self.registry.lock().expect("event registry poisoned");
            registry
                .subscribers
                .get(&event.kind())
                .map(|subs| subs.iter().map(|(_, h)| Arc::clone(h)).collect())
                .unwrap_or_default()
        };

        trace!(kind = ?event.kind(), subscribers = handlers.len(), "publishing shell event");
        for handler in handlers {
            handler(&event);
        }
    }

    /// Number of live subscriptions for a kind
    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        let registry = self.registry.lock().expect("event registry poisoned");
        registry
            .subscribers
            .get(&kind)
            .map(|subs| subs.len())
            .unwrap_or(0)
    }
}

/// RAII guard for one registration on the channel
///
/// Dropping the guard removes the handler; if the channel itself is
/// already gone the drop is a no-op.
pub struct Subscription {
    id: u64,
    kind: EventKind,
    registry: Weak<Mutex<Registry>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            if let Ok(mut registry) = registry.lock() {
                if let Some(subs) = registry.subscribers.get_mut(&self.kind) {
                    subs.retain(|(id, _)| *id != self.id);
                }
            }
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .finish()
    }
}
