//! The per-window agent: registration, change detection, teardown.
//!
//! One agent per window. `register` announces the window, `update` runs once
//! per consumer tick, `deregister` withdraws the record on the way out. The
//! agent keeps two caches: its own record as last published and the registry
//! as last observed. Peer writes land in the store subscription and are
//! handled inline at the top of `update`; nothing touches agent state from
//! another thread.
//!
//! Every publish is a whole-value overwrite of the registry key. Two
//! processes publishing inside the same propagation window lose one of the
//! writes; the loser's state comes back on its next own-shape publish. A
//! process that dies without deregistering leaves its record behind, so
//! consumers must treat the registry as possibly holding ghost entries.


use serde::Serialize;
use tracing::{debug, info, warn};

use winmesh_common::{keys, AgentError, Rect, Registry, WindowId, WindowRecord};
use winmesh_store::{SharedStore, StoreSubscription};

use crate::codec;
use crate::geometry::GeometrySource;
use crate::identity;

/// Agent lifecycle. One way only; a deregistered agent stays down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentState {
    Unregistered,
    Registered,
    Deregistered,
}

type RegistryCallback = Box<dyn FnMut(&[WindowRecord]) + Send>;
type ShapeCallback = Box<dyn FnMut(&Rect) + Send>;

pub struct WindowAgent {
    store: Box<dyn SharedStore>,
    geometry: Box<dyn GeometrySource>,
    state: AgentState,
    subscription: Option<StoreSubscription>,
    /// Own record as last published.
    own: Option<WindowRecord>,
    /// Registry as last observed, own writes included.
    registry: Registry,
    registry_changed: Option<RegistryCallback>,
    shape_changed: Option<ShapeCallback>,
}

impl WindowAgent {
    pub fn new(store: Box<dyn SharedStore>, geometry: Box<dyn GeometrySource>) -> Self {
        Self {
            store,
            geometry,
            state: AgentState::Unregistered,
            subscription: None,
            own: None,
            registry: Registry::new(),
            registry_changed: None,
            shape_changed: None,
        }
    }

    /// Join the mesh: mint an id, append this window's record to the shared
    /// registry, and publish. `meta` travels with the record for peers to
    /// read; the core never interprets it.
    pub fn register(&mut self, meta: impl Serialize) -> Result<WindowRecord, AgentError> {
        match self.state {
            AgentState::Unregistered => {}
            AgentState::Registered => return Err(AgentError::AlreadyRegistered),
            AgentState::Deregistered => return Err(AgentError::Deregistered),
        }
        let meta = serde_json::to_value(meta)?;

        // Subscribe before the snapshot read so no peer write slips between
        // the snapshot and the first drain.
        self.subscription = Some(self.store.subscribe()?);

        let mut registry = codec::decode(self.store.get(keys::WINDOWS)?.as_deref());
        let id = identity::allocate_id(self.store.as_ref())?;
        let record = WindowRecord {
            id,
            shape: self.geometry.shape(),
            meta,
        };
        registry.push(record.clone());
        self.store.set(keys::WINDOWS, &codec::encode(&registry))?;
        info!("registered window {id} ({} in the mesh)", registry.len());

        self.registry = registry;
        self.own = Some(record.clone());
        self.state = AgentState::Registered;
        Ok(record)
    }

    /// One tick: handle peer notifications, then poll own geometry. Store
    /// failures inside a tick degrade to a warning, never an error; the
    /// consumer's frame loop must not be interruptible from here.
    pub fn update(&mut self) {
        if self.state != AgentState::Registered {
            return;
        }
        self.drain_notifications();
        self.poll_own_shape();
    }

    /// Leave the mesh: remove this window's record and publish the
    /// survivors. The last window out also rewinds the id counter. The
    /// transition to `Deregistered` sticks even when the publish fails;
    /// whatever record remains on the store is a ghost.
    pub fn deregister(&mut self) -> Result<(), AgentError> {
        match self.state {
            AgentState::Registered => {}
            AgentState::Unregistered => return Err(AgentError::NotRegistered),
            AgentState::Deregistered => return Err(AgentError::Deregistered),
        }
        self.state = AgentState::Deregistered;
        self.subscription = None;

        let Some(own) = self.own.take() else {
            return Ok(());
        };
        let raw = self.store.get(keys::WINDOWS)?;
        let mut registry = codec::decode(raw.as_deref());
        match registry.iter().position(|record| record.id == own.id) {
            Some(index) => {
                registry.remove(index);
                if registry.is_empty() {
                    // Last one out rewinds the counter, before the final
                    // registry publish.
                    identity::write_counter(self.store.as_ref(), 0)?;
                }
                self.store.set(keys::WINDOWS, &codec::encode(&registry))?;
                info!(
                    "deregistered window {} ({} remaining)",
                    own.id,
                    registry.len()
                );
            }
            None => {
                debug!("own record already gone, nothing to publish");
            }
        }
        self.registry = registry;
        Ok(())
    }

    pub fn state(&self) -> AgentState {
        self.state
    }

    /// The registry as last observed. May contain ghosts and, after a
    /// counter race, duplicate ids; look records up by id, not by position.
    pub fn registry(&self) -> &[WindowRecord] {
        &self.registry
    }

    pub fn own_id(&self) -> Option<WindowId> {
        self.own.as_ref().map(|record| record.id)
    }

    pub fn own_shape(&self) -> Option<Rect> {
        self.own.as_ref().map(|record| record.shape)
    }

    /// Called when a peer's write changes the registry. Replaces any earlier
    /// callback.
    pub fn on_registry_changed(&mut self, callback: impl FnMut(&[WindowRecord]) + Send + 'static) {
        self.registry_changed = Some(Box::new(callback));
    }

    /// Called after this window's own shape change is published. Replaces
    /// any earlier callback.
    pub fn on_own_shape_changed(&mut self, callback: impl FnMut(&Rect) + Send + 'static) {
        self.shape_changed = Some(Box::new(callback));
    }

    fn drain_notifications(&mut self) {
        let Some(subscription) = &self.subscription else {
            return;
        };
        let events = subscription.drain();
        for event in events {
            if event.key != keys::WINDOWS {
                continue;
            }
            // The event carries the written value; decode it rather than
            // re-reading a key a later write may already have replaced.
            let incoming = codec::decode(Some(&event.value));
            let changed = registries_differ(&self.registry, &incoming);
            self.registry = incoming;
            if changed {
                debug!(
                    "registry changed externally ({} windows)",
                    self.registry.len()
                );
                if let Some(callback) = &mut self.registry_changed {
                    callback(&self.registry);
                }
            }
        }
    }

    fn poll_own_shape(&mut self) {
        let shape = self.geometry.shape();
        let Some(own) = self.own.as_mut() else {
            return;
        };
        if own.shape == shape {
            return;
        }
        // The own cache moves first; a skipped publish below still counts
        // the shape as handled for this tick.
        own.shape = shape;
        let own_id = own.id;

        let raw = match self.store.get(keys::WINDOWS) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("shape publish skipped, store read failed: {e}");
                return;
            }
        };
        let mut registry = codec::decode(raw.as_deref());
        let Some(entry) = registry.iter_mut().find(|record| record.id == own_id) else {
            debug!("own record missing from the shared registry, publish skipped");
            return;
        };
        entry.shape = shape;
        if let Err(e) = self.store.set(keys::WINDOWS, &codec::encode(&registry)) {
            warn!("shape publish skipped, store write failed: {e}");
            return;
        }
        self.registry = registry;
        if let Some(callback) = &mut self.shape_changed {
            callback(&shape);
        }
    }
}

/// Structural change test: length difference is the fast path, otherwise
/// record-by-record equality. Byte-level differences in the encoded value
/// (key order, whitespace) do not count.
fn registries_differ(previous: &Registry, next: &Registry) -> bool {
    if previous.len() != next.len() {
        return true;
    }
    previous != next
}
