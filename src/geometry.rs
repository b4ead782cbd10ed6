use serde::{Deserialize, Serialize};

/// A single unit cell addressed by row-major grid coordinates.
///
/// Rows grow downward without bound; columns are bounded by the grid's
/// column count at the point of use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub row: u32,
    pub col: u32,
}

impl Cell {
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

/// Rectangle of cells anchored at its top-left cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRect {
    pub row: u32,
    pub col: u32,
    pub width: u32,
    pub height: u32,
}

impl CellRect {
    pub const fn new(row: u32, col: u32, width: u32, height: u32) -> Self {
        Self {
            row,
            col,
            width,
            height,
        }
    }

    pub const fn anchored(anchor: Cell, width: u32, height: u32) -> Self {
        Self::new(anchor.row, anchor.col, width, height)
    }

    pub const fn anchor(&self) -> Cell {
        Cell::new(self.row, self.col)
    }

    /// One past the last occupied row.
    pub fn bottom(&self) -> u32 {
        self.row.saturating_add(self.height)
    }

    /// One past the last occupied column.
    pub fn right(&self) -> u32 {
        self.col.saturating_add(self.width)
    }

    pub fn intersects(&self, other: &CellRect) -> bool {
        self.col < other.right()
            && other.col < self.right()
            && self.row < other.bottom()
            && other.row < self.bottom()
    }
}
