//! Registry wire format: a JSON array of window records.
//!
//! Decoding is forgiving on purpose. The shared value can be absent (nobody
//! has registered yet) or unparsable (a foreign writer, a torn medium); both
//! read as the empty registry so a window can always join.

use tracing::warn;

use winmesh_common::Registry;

/// Encode a registry for the shared store.
pub fn encode(registry: &Registry) -> String {
    serde_json::to_string(registry).unwrap_or_else(|e| {
        warn!("failed to encode registry, publishing empty: {e}");
        "[]".to_string()
    })
}

/// Decode the shared registry value. Absent or unparsable values are the
/// empty registry.
pub fn decode(raw: Option<&str>) -> Registry {
    let Some(raw) = raw else {
        return Registry::new();
    };
    match serde_json::from_str(raw) {
        Ok(registry) => registry,
        Err(e) => {
            warn!("unparsable registry value, treating as empty: {e}");
            Registry::new()
        }
    }
}
