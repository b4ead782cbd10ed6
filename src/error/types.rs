use thiserror::Error;

use crate::geometry::Cell;
use crate::tile::TileKey;

/// Unified result type for the tilegrid crate.
pub type Result<T> = std::result::Result<T, PackError>;

/// Failures surfaced by the dense packer.
///
/// Every variant means "no placement": a failed pack never yields a partial
/// result, so callers keep rendering the last good placement.
#[derive(Debug, Error)]
pub enum PackError {
    /// The widest tile does not fit the column count. Structural: no pin
    /// order or scan strategy can place it until the configuration changes.
    #[error("grid has {columns} columns but the widest tile needs {min_cols}")]
    GridTooNarrow { columns: u32, min_cols: u32 },
    /// A pin referenced a key that is not in the supplied tile list.
    #[error("pinned tile `{0}` not found in the tile list")]
    UnknownPin(TileKey),
    /// A pinned coordinate is out of bounds or overlaps an earlier pin.
    /// Recoverable: the collaborator treats the candidate drop as rejected.
    #[error("pin for tile `{key}` rejected at ({}, {})", .cell.row, .cell.col)]
    PinRejected { key: TileKey, cell: Cell },
    /// The bounded scan ran out of candidate rows before placing a tile.
    /// The row limit is sized to make this unreachable; hitting it means the
    /// sizing rule is wrong, so the runtime logs it as a defect.
    #[error("tile `{key}` found no position within {row_limit} rows")]
    RowLimitExhausted { key: TileKey, row_limit: u32 },
}

impl PackError {
    /// Whether the failure is a per-drop rejection the collaborator can
    /// retry with a different target cell.
    pub fn is_rejection(&self) -> bool {
        matches!(self, PackError::PinRejected { .. })
    }
}
