//! Where a window's shape comes from.
//!
//! The agent polls a [`GeometrySource`] every tick instead of reading a
//! windowing system directly, so the same agent runs under a real window,
//! a simulation, or a test.

use std::sync::{Arc, Mutex, PoisonError};

use winmesh_common::Rect;

/// Supplier of the window's current outer shape.
pub trait GeometrySource: Send {
    fn shape(&mut self) -> Rect;
}

/// A source that reports whatever it was last told. Clones share the shape,
/// so one side can move the window while the agent polls the other.
#[derive(Clone)]
pub struct StaticSource {
    shape: Arc<Mutex<Rect>>,
}

impl StaticSource {
    pub fn new(shape: Rect) -> Self {
        Self {
            shape: Arc::new(Mutex::new(shape)),
        }
    }

    pub fn set(&self, shape: Rect) {
        if let Ok(mut current) = self.shape.lock() {
            *current = shape;
        }
    }
}

impl GeometrySource for StaticSource {
    fn shape(&mut self) -> Rect {
        *self.shape.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
