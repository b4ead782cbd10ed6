use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{PackError, Result};
use crate::geometry::{Cell, CellRect};
use crate::grid::OccupancyGrid;
use crate::tile::{Tile, TileKey};

/// A complete, validated assignment of tiles to grid coordinates.
///
/// Placements are only ever produced whole: a failed pack yields no
/// placement at all, never a partial one. Rectangles of distinct tiles are
/// pairwise disjoint and every rectangle lies within the column bounds the
/// placement was solved for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    columns: u32,
    rects: HashMap<TileKey, CellRect>,
}

impl Placement {
    pub fn new(columns: u32) -> Self {
        Self {
            columns,
            rects: HashMap::new(),
        }
    }

    pub(crate) fn insert(&mut self, key: TileKey, rect: CellRect) {
        self.rects.insert(key, rect);
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    pub fn contains(&self, key: &TileKey) -> bool {
        self.rects.contains_key(key)
    }

    pub fn rect_of(&self, key: &TileKey) -> Option<CellRect> {
        self.rects.get(key).copied()
    }

    pub fn cell_of(&self, key: &TileKey) -> Option<Cell> {
        self.rects.get(key).map(CellRect::anchor)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TileKey, &CellRect)> {
        self.rects.iter()
    }

    /// Entries sorted by row, then column. This ordering defines the new
    /// canonical tile sequence after a drop resolves.
    ///
    /// A valid placement can never produce two tiles anchored at the same
    /// coordinate, so the sort needs no further tie-break.
    pub fn row_major(&self) -> Vec<(&TileKey, CellRect)> {
        let mut entries: Vec<_> = self.rects.iter().map(|(k, r)| (k, *r)).collect();
        entries.sort_by_key(|(_, rect)| (rect.row, rect.col));
        debug_assert!(
            entries
                .windows(2)
                .all(|pair| (pair[0].1.row, pair[0].1.col) != (pair[1].1.row, pair[1].1.col)),
            "two tiles anchored at the same cell"
        );
        entries
    }
}

/// First-fit dense packer for a fixed column count.
///
/// Pins are placed before anything else, in the caller's order, and are hard
/// constraints. Remaining tiles are auto-placed at the first free coordinate
/// of a row-major scan, visited in the order of their previous placement so
/// repacks stay visually stable.
#[derive(Debug, Clone, Copy)]
pub struct DensePacker {
    columns: u32,
}

impl DensePacker {
    pub fn new(columns: u32) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    /// Solve a full placement for `tiles`.
    ///
    /// `pins` fixes tiles to exact coordinates before auto-placement;
    /// `previous` orders the auto-placed tiles by their last known position
    /// (a stability heuristic only, never a correctness requirement).
    pub fn pack(
        &self,
        tiles: &[Tile],
        pins: &[(TileKey, Cell)],
        previous: Option<&Placement>,
    ) -> Result<Placement> {
        let min_cols = tiles.iter().map(|tile| tile.width).max().unwrap_or(1);
        if self.columns < min_cols {
            return Err(PackError::GridTooNarrow {
                columns: self.columns,
                min_cols,
            });
        }

        let mut grid = OccupancyGrid::new(self.columns);
        let mut placement = Placement::new(self.columns);

        for (key, cell) in pins {
            let tile = tiles
                .iter()
                .find(|tile| &tile.key == key)
                .ok_or_else(|| PackError::UnknownPin(key.clone()))?;
            if !grid.fits(*cell, tile.width, tile.height) {
                return Err(PackError::PinRejected {
                    key: key.clone(),
                    cell: *cell,
                });
            }
            grid.place(*cell, tile.width, tile.height);
            placement.insert(
                tile.key.clone(),
                CellRect::anchored(*cell, tile.width, tile.height),
            );
        }

        let row_limit = self.row_limit(tiles, &grid);

        let mut rest: Vec<&Tile> = tiles
            .iter()
            .filter(|tile| !placement.contains(&tile.key))
            .collect();
        // Stable sort: tiles without a previous position keep their list
        // order, after every tile that has one.
        rest.sort_by_key(|tile| {
            previous
                .and_then(|prev| prev.rect_of(&tile.key))
                .map(|rect| (rect.row, rect.col))
                .unwrap_or((u32::MAX, u32::MAX))
        });

        for tile in rest {
            let spot = grid
                .scan(row_limit)
                .find(|&cell| grid.fits(cell, tile.width, tile.height));
            let Some(cell) = spot else {
                return Err(PackError::RowLimitExhausted {
                    key: tile.key.clone(),
                    row_limit,
                });
            };
            grid.place(cell, tile.width, tile.height);
            placement.insert(
                tile.key.clone(),
                CellRect::anchored(cell, tile.width, tile.height),
            );
        }

        Ok(placement)
    }

    /// Finite scan bound that provably covers every feasible placement.
    ///
    /// After the pins are down, the rows at and below the current occupancy
    /// bottom are empty, so each auto-placed tile lands no deeper than that
    /// bottom and grows it by at most its own height. The bottom after the
    /// pins plus the summed tile heights therefore bounds the deepest anchor
    /// any first-fit pass can need.
    fn row_limit(&self, tiles: &[Tile], grid: &OccupancyGrid) -> u32 {
        let stacked: u32 = tiles
            .iter()
            .fold(0u32, |acc, tile| acc.saturating_add(tile.height));
        grid.rows().saturating_add(stacked).saturating_add(1)
    }
}
