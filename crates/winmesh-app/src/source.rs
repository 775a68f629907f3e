//! Synthetic window motion for the demo binary.

use winmesh_agent::GeometrySource;
use winmesh_common::Rect;

const ORBIT_RADIUS: f64 = 40.0;
const ORBIT_STEP: f64 = 0.05;

/// Drifts the window along a slow circle around its starting point. Each
/// `shape` call advances one step, so orbit speed follows the tick rate.
pub struct DriftSource {
    origin: Rect,
    drift: bool,
    tick: u64,
}

impl DriftSource {
    pub fn new(origin: Rect, drift: bool) -> Self {
        Self {
            origin,
            drift,
            tick: 0,
        }
    }
}

impl GeometrySource for DriftSource {
    fn shape(&mut self) -> Rect {
        if !self.drift {
            return self.origin;
        }
        let angle = self.tick as f64 * ORBIT_STEP;
        self.tick += 1;
        Rect::new(
            (self.origin.x + angle.cos() * ORBIT_RADIUS).round(),
            (self.origin.y + angle.sin() * ORBIT_RADIUS).round(),
            self.origin.width,
            self.origin.height,
        )
    }
}
