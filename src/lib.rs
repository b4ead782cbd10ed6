//! Dense tile packing core for fixed-width, unbounded-height grids.
//!
//! Tiles of arbitrary cell spans are packed first-fit in row-major order; a
//! single tile can be pinned to a target cell to preview or resolve a
//! drag-and-drop reorder, and the resulting placement's row-major rank maps
//! the drop back to a linear list index. Modules keep an orchestrator
//! `mod.rs` that re-exports from a private `core` implementation.

pub mod error;
pub mod geometry;
pub mod grid;
pub mod logging;
pub mod metrics;
pub mod packer;
pub mod registry;
pub mod runtime;
pub mod tile;

pub use error::{PackError, Result};
pub use geometry::{Cell, CellRect};
pub use grid::OccupancyGrid;
pub use logging::{
    LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError, LoggingResult, MemorySink,
};
pub use metrics::{MetricSnapshot, PackMetrics};
pub use packer::{DensePacker, Placement, TileMove, derive_move};
pub use registry::{PlacementRegistry, SlotState};
pub use runtime::observers::PackLoggerObserver;
pub use runtime::{BoardObserver, BoardRuntime, RuntimeConfig};
pub use tile::{Tile, TileKey};
