//! Identity allocation from the shared window counter.
//!
//! The counter lives under its own key and only ever moves two ways: a
//! registering window reads it, adds one, and writes it back; the last
//! window out resets it to zero. The read-increment-write is not atomic
//! across processes. Two windows registering in the same instant can read
//! the same value and mint the same id; that window of loss is part of the
//! store's contract and is exercised in the tests rather than papered over.

use tracing::debug;

use winmesh_common::{keys, StoreError, WindowId};
use winmesh_store::SharedStore;

/// Read the shared counter. Absent or unparsable values read as zero.
pub fn read_counter(store: &dyn SharedStore) -> Result<u64, StoreError> {
    Ok(store
        .get(keys::COUNT)?
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(0))
}

/// Write the shared counter.
pub fn write_counter(store: &dyn SharedStore, value: u64) -> Result<(), StoreError> {
    store.set(keys::COUNT, &value.to_string())
}

/// Mint the next window id: increment the shared counter and take the new
/// value.
pub fn allocate_id(store: &dyn SharedStore) -> Result<WindowId, StoreError> {
    let next = read_counter(store)? + 1;
    write_counter(store, next)?;
    debug!("allocated window id {next}");
    Ok(WindowId(next))
}
