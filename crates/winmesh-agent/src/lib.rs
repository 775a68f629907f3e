//! The per-window agent.
//!
//! Each participating window owns one [`WindowAgent`]. The agent mints the
//! window's identity from a shared counter, keeps the window's record in the
//! shared registry, and reports two kinds of change: the registry moving
//! under the window (peers joining, leaving, or resizing) and the window's
//! own shape drifting away from what it last published.
//!
//! Everything flows through the [`winmesh_store::SharedStore`] the agent is
//! constructed with; the agent itself never spawns threads and never blocks.

pub mod agent;
pub mod codec;
pub mod geometry;
pub mod identity;

pub use agent::{AgentState, WindowAgent};
pub use geometry::{GeometrySource, StaticSource};
