use serde::{Deserialize, Serialize};
use std::fmt;

/// Screen-space position and extent of one window.
///
/// Serialized with the short field names (`w`, `h`) every process on the
/// medium agrees on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    #[serde(rename = "w")]
    pub width: f64,
    #[serde(rename = "h")]
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Identity of one live window process, minted from the shared counter.
///
/// Unique for the process's lifetime under single-writer conditions; never
/// reused while that process stays registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowId(pub u64);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One process's entry in the shared registry.
///
/// `meta` is caller-supplied and opaque to the core: it is stored and
/// forwarded, never interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowRecord {
    pub id: WindowId,
    pub shape: Rect,
    #[serde(rename = "metaData", default)]
    pub meta: serde_json::Value,
}

/// The shared ordered list of all live window records.
///
/// Insertion order is preserved as written but carries no meaning. At most
/// one record per id at any time — an invariant of the operations, not of
/// the type, so consumers stay defensive about duplicates and ghosts.
pub type Registry = Vec<WindowRecord>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rect_wire_field_names() {
        let rect = Rect::new(10.0, 20.0, 100.0, 200.0);
        let json = serde_json::to_string(&rect).unwrap();
        assert!(json.contains("\"w\""));
        assert!(json.contains("\"h\""));
        assert!(!json.contains("width"));
        assert!(!json.contains("height"));
    }

    #[test]
    fn window_id_serializes_as_bare_integer() {
        let json = serde_json::to_string(&WindowId(7)).unwrap();
        assert_eq!(json, "7");
    }

    #[test]
    fn window_id_display() {
        assert_eq!(WindowId(42).to_string(), "42");
    }

    #[test]
    fn record_wire_shape() {
        let record = WindowRecord {
            id: WindowId(1),
            shape: Rect::new(0.0, 0.0, 800.0, 600.0),
            meta: json!({"label": "main"}),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"id\":1"));
        assert!(json.contains("\"metaData\""));
        assert!(json.contains("\"shape\""));
    }

    #[test]
    fn record_round_trips() {
        let record = WindowRecord {
            id: WindowId(3),
            shape: Rect::new(5.0, 6.0, 7.0, 8.0),
            meta: json!([1, "two", null]),
        };
        let json = serde_json::to_string(&record).unwrap();
        let parsed: WindowRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn record_equality_ignores_key_order() {
        let a: WindowRecord = serde_json::from_str(
            r#"{"id":1,"shape":{"x":1.0,"y":2.0,"w":3.0,"h":4.0},"metaData":{"a":1,"b":2}}"#,
        )
        .unwrap();
        let b: WindowRecord = serde_json::from_str(
            r#"{"metaData":{"b":2,"a":1},"shape":{"h":4.0,"w":3.0,"y":2.0,"x":1.0},"id":1}"#,
        )
        .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn record_missing_meta_reads_as_null() {
        let record: WindowRecord =
            serde_json::from_str(r#"{"id":2,"shape":{"x":0,"y":0,"w":1,"h":1}}"#).unwrap();
        assert_eq!(record.meta, serde_json::Value::Null);
    }

    #[test]
    fn rect_equality_is_field_by_field() {
        let a = Rect::new(1.0, 2.0, 3.0, 4.0);
        let b = Rect::new(1.0, 2.0, 3.0, 4.0);
        let c = Rect::new(1.5, 2.0, 3.0, 4.0);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
