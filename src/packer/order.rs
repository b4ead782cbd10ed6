//! Reorder index derivation.
//!
//! A successful pack with one pinned tile answers "where did the drop land";
//! this module turns that 2-D answer back into the 1-D index the collaborator
//! uses for its canonical tile list.

use serde::{Deserialize, Serialize};

use super::Placement;
use crate::tile::TileKey;

/// A resolved reorder: the dragged tile moves from `from` to `to` in the
/// canonical list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileMove {
    pub key: TileKey,
    pub from: usize,
    pub to: usize,
}

/// Derive the list move implied by a pinned-tile placement.
///
/// All placed tiles are ranked by row, then column; the dragged tile's
/// 0-based rank is its new index. Returns `None` when the key is absent from
/// the canonical list, absent from the placement, or when the rank equals
/// the current index (no move to report).
pub fn derive_move(
    placement: &Placement,
    canonical: &[TileKey],
    key: &TileKey,
) -> Option<TileMove> {
    let from = canonical.iter().position(|candidate| candidate == key)?;
    let to = placement
        .row_major()
        .iter()
        .position(|(candidate, _)| *candidate == key)?;
    if from == to {
        return None;
    }
    Some(TileMove {
        key: key.clone(),
        from,
        to,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Cell;
    use crate::packer::DensePacker;
    use crate::tile::Tile;

    fn canonical(keys: &[&str]) -> Vec<TileKey> {
        keys.iter().map(|key| key.to_string()).collect()
    }

    #[test]
    fn pin_to_the_far_cell_moves_the_tile_to_the_end() {
        // Rest state: a(0,0) b(0,1) c(0,2). Pinning `a` to (0,2) pushes b
        // and c into the freed cells, so row-major order becomes [b, c, a].
        let tiles = vec![Tile::unit("a"), Tile::unit("b"), Tile::unit("c")];
        let order = canonical(&["a", "b", "c"]);
        let pins = vec![("a".to_string(), Cell::new(0, 2))];
        let placement = DensePacker::new(3).pack(&tiles, &pins, None).unwrap();

        let mv = derive_move(&placement, &order, &"a".to_string()).unwrap();
        assert_eq!(mv.from, 0);
        assert_eq!(mv.to, 2);
    }

    #[test]
    fn unchanged_rank_reports_no_move() {
        let tiles = vec![Tile::unit("a"), Tile::unit("b")];
        let order = canonical(&["a", "b"]);
        let pins = vec![("a".to_string(), Cell::new(0, 0))];
        let placement = DensePacker::new(2).pack(&tiles, &pins, None).unwrap();
        assert!(derive_move(&placement, &order, &"a".to_string()).is_none());
    }

    #[test]
    fn key_missing_from_the_canonical_list_reports_nothing() {
        let tiles = vec![Tile::unit("a")];
        let placement = DensePacker::new(1).pack(&tiles, &[], None).unwrap();
        assert!(derive_move(&placement, &canonical(&["x"]), &"a".to_string()).is_none());
    }

    #[test]
    fn mid_list_drop_shifts_by_one() {
        // 2-column rest state: a(0,0) b(0,1) c(1,0) d(1,1). Pin d onto
        // (0,0); the others re-flow behind it, giving order [d, a, b, c].
        let tiles = vec![
            Tile::unit("a"),
            Tile::unit("b"),
            Tile::unit("c"),
            Tile::unit("d"),
        ];
        let order = canonical(&["a", "b", "c", "d"]);
        let rest = DensePacker::new(2).pack(&tiles, &[], None).unwrap();
        let pins = vec![("d".to_string(), Cell::new(0, 0))];
        let placement = DensePacker::new(2)
            .pack(&tiles, &pins, Some(&rest))
            .unwrap();

        let mv = derive_move(&placement, &order, &"d".to_string()).unwrap();
        assert_eq!(mv.from, 3);
        assert_eq!(mv.to, 0);
    }
}
