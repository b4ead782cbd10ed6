use std::collections::HashSet;

use crate::geometry::Cell;

/// Sparse occupancy bookkeeping for one packing run.
///
/// The grid is bounded to a fixed column count and unbounded downward:
/// arbitrarily large row indices pass the bounds check, so a fit query can
/// only fail on column overflow or overlap with an already placed rectangle.
/// A fresh grid is built for every packing call; nothing persists between
/// runs.
#[derive(Debug, Clone)]
pub struct OccupancyGrid {
    columns: u32,
    occupied: HashSet<Cell>,
    rows: u32,
}

impl OccupancyGrid {
    pub fn new(columns: u32) -> Self {
        Self {
            columns,
            occupied: HashSet::new(),
            rows: 0,
        }
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    /// One past the highest occupied row, zero while the grid is empty.
    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn is_occupied(&self, cell: Cell) -> bool {
        self.occupied.contains(&cell)
    }

    /// Whether a `height x width` rectangle anchored at `anchor` lies within
    /// the column bounds and covers only free cells.
    pub fn fits(&self, anchor: Cell, width: u32, height: u32) -> bool {
        let Some(right) = anchor.col.checked_add(width) else {
            return false;
        };
        if right > self.columns {
            return false;
        }
        for row in anchor.row..anchor.row.saturating_add(height) {
            for col in anchor.col..right {
                if self.occupied.contains(&Cell::new(row, col)) {
                    return false;
                }
            }
        }
        true
    }

    /// Mark every cell of the rectangle occupied.
    ///
    /// Callers must have checked [`fits`](Self::fits) with the same
    /// arguments first; this performs no re-validation.
    pub fn place(&mut self, anchor: Cell, width: u32, height: u32) {
        for row in anchor.row..anchor.row.saturating_add(height) {
            for col in anchor.col..anchor.col.saturating_add(width) {
                self.occupied.insert(Cell::new(row, col));
            }
        }
        self.rows = self.rows.max(anchor.row.saturating_add(height));
    }

    /// Row-major candidate coordinates: rows `0..=row_limit`, every column
    /// of a row before advancing to the next. Lazy and restartable; each
    /// placement attempt requests a fresh scan from (0, 0).
    pub fn scan(&self, row_limit: u32) -> impl Iterator<Item = Cell> + use<> {
        let columns = self.columns;
        (0..=row_limit).flat_map(move |row| (0..columns).map(move |col| Cell::new(row, col)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_grid_fits_anywhere_within_columns() {
        let grid = OccupancyGrid::new(4);
        assert!(grid.fits(Cell::new(0, 0), 4, 1));
        assert!(grid.fits(Cell::new(1_000_000, 3), 1, 5));
        assert!(!grid.fits(Cell::new(0, 1), 4, 1));
        assert!(!grid.fits(Cell::new(0, 4), 1, 1));
    }

    #[test]
    fn place_blocks_every_covered_cell() {
        let mut grid = OccupancyGrid::new(4);
        grid.place(Cell::new(1, 1), 2, 2);
        assert!(grid.is_occupied(Cell::new(1, 1)));
        assert!(grid.is_occupied(Cell::new(2, 2)));
        assert!(!grid.is_occupied(Cell::new(0, 1)));
        assert!(!grid.fits(Cell::new(0, 0), 2, 2));
        assert!(grid.fits(Cell::new(0, 0), 1, 1));
        assert!(grid.fits(Cell::new(1, 3), 1, 2));
    }

    #[test]
    fn rows_track_the_deepest_placement() {
        let mut grid = OccupancyGrid::new(3);
        assert_eq!(grid.rows(), 0);
        grid.place(Cell::new(0, 0), 1, 2);
        assert_eq!(grid.rows(), 2);
        grid.place(Cell::new(5, 2), 1, 1);
        assert_eq!(grid.rows(), 6);
        grid.place(Cell::new(1, 1), 1, 1);
        assert_eq!(grid.rows(), 6);
    }

    #[test]
    fn scan_is_row_major_and_bounded() {
        let grid = OccupancyGrid::new(2);
        let cells: Vec<Cell> = grid.scan(1).collect();
        assert_eq!(
            cells,
            vec![
                Cell::new(0, 0),
                Cell::new(0, 1),
                Cell::new(1, 0),
                Cell::new(1, 1),
            ]
        );
    }

    #[test]
    fn scan_restarts_from_origin() {
        let grid = OccupancyGrid::new(3);
        let first: Vec<Cell> = grid.scan(0).collect();
        let second: Vec<Cell> = grid.scan(0).collect();
        assert_eq!(first, second);
        assert_eq!(first[0], Cell::new(0, 0));
    }

    #[test]
    fn fit_rejects_column_overflow_at_u32_edge() {
        let grid = OccupancyGrid::new(4);
        assert!(!grid.fits(Cell::new(0, u32::MAX), 2, 1));
    }
}
