//! In-process store for tests and same-process multi-agent setups.
//!
//! One mutex-guarded map, any number of handles. Each handle stands in for
//! one process: a write through one handle is visible to `get` through every
//! handle, and is delivered as a [`StoreEvent`] to subscriptions created by
//! every *other* handle — the writer's own subscriptions stay silent.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};

use uuid::Uuid;

use winmesh_common::StoreError;

use crate::{EventSink, Result, SharedStore, StoreEvent, StoreSubscription};

struct Subscriber {
    owner: Uuid,
    sink: Weak<Mutex<Vec<StoreEvent>>>,
}

#[derive(Default)]
struct Backend {
    values: HashMap<String, String>,
    subscribers: Vec<Subscriber>,
}

impl Backend {
    /// Deliver to every live subscription not owned by `writer`.
    fn notify_others(&mut self, writer: Uuid, event: &StoreEvent) {
        self.subscribers.retain(|sub| match sub.sink.upgrade() {
            Some(sink) => {
                if sub.owner != writer {
                    if let Ok(mut events) = sink.lock() {
                        events.push(event.clone());
                    }
                }
                true
            }
            None => false,
        });
    }
}

/// A shared in-memory medium. Create one store, then one [`handle`] per
/// simulated process.
///
/// [`handle`]: MemoryStore::handle
pub struct MemoryStore {
    backend: Arc<Mutex<Backend>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            backend: Arc::new(Mutex::new(Backend::default())),
        }
    }

    /// Create a handle representing one participating process.
    pub fn handle(&self) -> MemoryHandle {
        MemoryHandle {
            backend: Arc::clone(&self.backend),
            owner: Uuid::new_v4(),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// One simulated process's view of a [`MemoryStore`].
pub struct MemoryHandle {
    backend: Arc<Mutex<Backend>>,
    owner: Uuid,
}

impl SharedStore for MemoryHandle {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let backend = self.backend.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(backend.values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut backend = self.backend.lock().map_err(|_| StoreError::Poisoned)?;

        // Re-setting the current value is not a change and notifies nobody.
        if backend.values.get(key).map(String::as_str) == Some(value) {
            return Ok(());
        }

        backend.values.insert(key.to_string(), value.to_string());
        let event = StoreEvent {
            key: key.to_string(),
            value: value.to_string(),
        };
        backend.notify_others(self.owner, &event);
        Ok(())
    }

    fn subscribe(&self) -> Result<StoreSubscription> {
        let sink: EventSink = Arc::new(Mutex::new(Vec::new()));
        let mut backend = self.backend.lock().map_err(|_| StoreError::Poisoned)?;
        backend.subscribers.push(Subscriber {
            owner: self.owner,
            sink: Arc::downgrade(&sink),
        });
        Ok(StoreSubscription::new(sink))
    }
}
