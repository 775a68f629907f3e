//! File-backed store for real cross-process coordination.
//!
//! One directory, one file per key. Writes go to a temp file first and are
//! renamed into place, so a peer reading mid-write never observes a torn
//! value. A `notify` watcher on the directory turns peer writes into
//! [`StoreEvent`]s; values this process wrote itself are recognized by
//! content and suppressed, so the writer never hears its own echo. A peer
//! writing a byte-identical value is suppressed too, which is invisible to
//! consumers: an identical value carries no change.
//!
//! The watcher owns the only background thread in the workspace. Its
//! callback does nothing but push events into subscriber sinks; all handling
//! happens on the subscriber's own thread when it drains.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, Weak};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, info, warn};

use winmesh_common::StoreError;

use crate::{fan_out, EventSink, Result, SharedStore, StoreEvent, StoreSubscription};

const TMP_SUFFIX: &str = ".tmp";

/// State shared between the store handle and the watcher callback.
#[derive(Default)]
struct Shared {
    /// Last value this process wrote per key, for self-echo suppression.
    last_written: HashMap<String, String>,
    subscribers: Vec<Weak<Mutex<Vec<StoreEvent>>>>,
}

/// A store rooted at a directory that all participating processes open.
pub struct FileStore {
    root: PathBuf,
    shared: Arc<Mutex<Shared>>,
    /// Created on first subscribe; kept alive for the life of the store.
    watcher: Mutex<Option<RecommendedWatcher>>,
}

impl FileStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            shared: Arc::new(Mutex::new(Shared::default())),
            watcher: Mutex::new(None),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    fn ensure_watcher(&self) -> Result<()> {
        let mut guard = self.watcher.lock().map_err(|_| StoreError::Poisoned)?;
        if guard.is_some() {
            return Ok(());
        }

        let shared = Arc::clone(&self.shared);
        let mut watcher = RecommendedWatcher::new(
            move |result: std::result::Result<Event, notify::Error>| match result {
                Ok(event) => {
                    if matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                        dispatch_paths(&event.paths, &shared);
                    }
                }
                Err(e) => warn!("store watcher error: {e}"),
            },
            notify::Config::default(),
        )
        .map_err(|e| StoreError::Watch(format!("failed to create watcher: {e}")))?;

        watcher
            .watch(&self.root, RecursiveMode::NonRecursive)
            .map_err(|e| {
                StoreError::Watch(format!("failed to watch {}: {e}", self.root.display()))
            })?;

        info!("watching store directory {}", self.root.display());
        *guard = Some(watcher);
        Ok(())
    }
}

impl SharedStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.key_path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        // Remember the write first so the echo is recognizable no matter how
        // soon the watcher fires.
        {
            let mut shared = self.shared.lock().map_err(|_| StoreError::Poisoned)?;
            shared
                .last_written
                .insert(key.to_string(), value.to_string());
        }

        let tmp = self
            .root
            .join(format!(".{key}.{}{TMP_SUFFIX}", std::process::id()));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, self.key_path(key))?;
        debug!("wrote store key {key} ({} bytes)", value.len());
        Ok(())
    }

    fn subscribe(&self) -> Result<StoreSubscription> {
        self.ensure_watcher()?;
        let sink: EventSink = Arc::new(Mutex::new(Vec::new()));
        let mut shared = self.shared.lock().map_err(|_| StoreError::Poisoned)?;
        shared.subscribers.push(Arc::downgrade(&sink));
        Ok(StoreSubscription::new(sink))
    }
}

/// Turn changed paths into events for values some other process wrote.
///
/// Standalone so the dispatch rules are testable without filesystem timing.
fn dispatch_paths(paths: &[PathBuf], shared: &Arc<Mutex<Shared>>) {
    for path in paths {
        let Some(key) = key_of(path) else { continue };
        // A racing overwrite or teardown can remove the file before we read
        // it; the next event carries the newer state anyway.
        let Ok(value) = fs::read_to_string(path) else {
            continue;
        };
        let Ok(mut shared) = shared.lock() else { return };
        if shared.last_written.get(&key).map(String::as_str) == Some(value.as_str()) {
            continue;
        }
        debug!("store key {key} changed by a peer");
        let event = StoreEvent { key, value };
        fan_out(&mut shared.subscribers, &event);
    }
}

/// The key a directory entry stores, or `None` for temp files and other
/// entries that are not keys.
fn key_of(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    if name.starts_with('.') || name.ends_with(TMP_SUFFIX) {
        return None;
    }
    Some(name.to_string())
}
