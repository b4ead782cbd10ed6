use serde::{Deserialize, Serialize};

/// Stable identifier supplied by the collaborator for each tile.
///
/// Keys are compared for equality only; nothing in the packing algorithm
/// depends on their ordering.
pub type TileKey = String;

/// A rectangular tile spanning `width x height` grid cells.
///
/// Tiles carry no placement state. Where a tile currently sits is tracked
/// externally by the [`PlacementRegistry`](crate::registry::PlacementRegistry)
/// so repacks can overwrite positions without touching tile values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub key: TileKey,
    pub width: u32,
    pub height: u32,
}

impl Tile {
    pub fn new(key: impl Into<TileKey>, width: u32, height: u32) -> Self {
        debug_assert!(width >= 1 && height >= 1, "tiles span at least one cell");
        Self {
            key: key.into(),
            width,
            height,
        }
    }

    /// Unit tile helper used heavily by tests and demos.
    pub fn unit(key: impl Into<TileKey>) -> Self {
        Self::new(key, 1, 1)
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}
