//! Occupancy module orchestrator.
//!
//! Downstream code imports the occupancy grid from here while the
//! implementation details live in the private `core` module.

mod core;

pub use core::OccupancyGrid;
