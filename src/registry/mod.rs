//! Registry module orchestrator.
//!
//! Downstream code imports the placement registry from here while the
//! implementation details live in the private `core` module.

mod core;

pub use core::{PlacementRegistry, SlotState};
