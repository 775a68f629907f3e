//! The shared medium every participating process reads and writes.
//!
//! All cross-process communication in the mesh flows through one key-value
//! store with whole-value semantics: `set` replaces the entire value under a
//! key, and every subscriber *except the writer* is told about it. There is
//! no partial update, no compare-and-swap, and no locking across processes —
//! concurrent writers overwrite each other (last writer wins) and the layers
//! above are built to tolerate that.
//!
//! Two implementations ship with identical semantics: [`MemoryStore`] for
//! single-process tests and same-process multi-agent setups, and
//! [`FileStore`] for real cross-process coordination through a watched
//! directory.

pub mod file;
pub mod memory;

use std::sync::{Arc, Mutex, Weak};

use winmesh_common::StoreError;

pub use file::FileStore;
pub use memory::{MemoryHandle, MemoryStore};

pub type Result<T> = std::result::Result<T, StoreError>;

/// A change some other process made to the shared medium.
///
/// Carries the key name and the new raw value, so subscribers never need a
/// follow-up read to see what changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreEvent {
    pub key: String,
    pub value: String,
}

pub(crate) type EventSink = Arc<Mutex<Vec<StoreEvent>>>;

/// Receiving end of store change notifications.
///
/// Events are pushed into the sink by the store (a peer handle's `set`, or
/// the file watcher thread) and drained by the subscriber on its own thread,
/// whenever it chooses to look. Dropping the subscription ends delivery.
pub struct StoreSubscription {
    events: EventSink,
}

impl StoreSubscription {
    pub(crate) fn new(events: EventSink) -> Self {
        Self { events }
    }

    /// Drain all pending events in arrival order.
    pub fn drain(&self) -> Vec<StoreEvent> {
        match self.events.lock() {
            Ok(mut events) => std::mem::take(&mut *events),
            Err(_) => Vec::new(),
        }
    }
}

/// Capability interface to the shared medium.
///
/// One value per key, strings only, whole-value overwrite. Writers never
/// hear their own writes; everyone else does.
pub trait SharedStore: Send {
    /// Read the current value of `key`; `None` if it was never set.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite `key` with `value`, notifying all other subscribers.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Subscribe to changes made by other processes.
    fn subscribe(&self) -> Result<StoreSubscription>;
}

/// Push an event to every live sink, pruning the dead ones.
pub(crate) fn fan_out(sinks: &mut Vec<Weak<Mutex<Vec<StoreEvent>>>>, event: &StoreEvent) {
    sinks.retain(|sink| match sink.upgrade() {
        Some(sink) => {
            if let Ok(mut events) = sink.lock() {
                events.push(event.clone());
            }
            true
        }
        None => false,
    });
}
