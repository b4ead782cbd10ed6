use std::collections::{HashMap, HashSet};

use blake3::{Hash, Hasher};

use crate::geometry::{Cell, CellRect};
use crate::packer::Placement;
use crate::tile::TileKey;

/// Last known slot for a placed tile.
#[derive(Debug, Clone)]
pub struct SlotState {
    pub rect: CellRect,
    pub is_dirty: bool,
}

impl SlotState {
    fn new(rect: CellRect) -> Self {
        Self {
            rect,
            is_dirty: true,
        }
    }
}

/// Store mapping tiles to their last synced placement.
///
/// Tiles never carry their own coordinates; this registry is the single
/// home for "where is everything right now". It doubles as the source of
/// the previous-placement ordering heuristic fed back into the packer, and
/// tracks which tiles moved since the collaborator last drained it so only
/// those need re-rendering.
#[derive(Debug, Default)]
pub struct PlacementRegistry {
    entries: HashMap<TileKey, SlotState>,
    dirty: HashSet<TileKey>,
    revision: Option<Hash>,
    columns: u32,
}

impl PlacementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Absorb a freshly solved placement.
    ///
    /// Tiles whose rect changed (or that are new) become dirty; tiles absent
    /// from the placement are dropped. The revision fingerprint is refreshed
    /// from the full placement content.
    pub fn sync_placement(&mut self, placement: &Placement) {
        use std::collections::hash_map::Entry;

        let mut newly_dirty = Vec::new();

        for (key, rect) in placement.iter() {
            match self.entries.entry(key.clone()) {
                Entry::Occupied(mut entry) => {
                    let state = entry.get_mut();
                    if state.rect != *rect {
                        state.rect = *rect;
                        state.is_dirty = true;
                        newly_dirty.push(key.clone());
                    }
                }
                Entry::Vacant(vacant) => {
                    vacant.insert(SlotState::new(*rect));
                    newly_dirty.push(key.clone());
                }
            }
        }

        // Drop tiles no longer placed.
        let to_remove: Vec<_> = self
            .entries
            .keys()
            .filter(|key| !placement.contains(key))
            .cloned()
            .collect();
        for key in to_remove {
            self.entries.remove(&key);
            self.dirty.remove(&key);
        }

        for key in newly_dirty {
            self.dirty.insert(key);
        }

        self.columns = placement.columns();
        self.revision = Some(fingerprint(placement));
    }

    /// Drain the moved tiles, row-major, clearing their dirty flags.
    pub fn take_dirty(&mut self) -> Vec<(TileKey, CellRect)> {
        let keys: Vec<_> = self.dirty.drain().collect();
        let mut moved: Vec<(TileKey, CellRect)> = keys
            .into_iter()
            .filter_map(|key| {
                self.entries.get_mut(&key).map(|state| {
                    state.is_dirty = false;
                    (key.clone(), state.rect)
                })
            })
            .collect();
        moved.sort_by_key(|(_, rect)| (rect.row, rect.col));
        moved
    }

    pub fn rect_of(&self, key: &TileKey) -> Option<CellRect> {
        self.entries.get(key).map(|state| state.rect)
    }

    pub fn cell_of(&self, key: &TileKey) -> Option<Cell> {
        self.rect_of(key).map(|rect| rect.anchor())
    }

    pub fn has_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Content fingerprint of the last synced placement, if any.
    pub fn revision(&self) -> Option<Hash> {
        self.revision
    }

    /// Rebuild the last synced placement, used as the stability-ordering
    /// input for the next pack.
    pub fn snapshot(&self) -> Placement {
        let mut placement = Placement::new(self.columns);
        for (key, state) in &self.entries {
            placement.insert(key.clone(), state.rect);
        }
        placement
    }
}

/// Order-independent blake3 hash of a placement's full content.
fn fingerprint(placement: &Placement) -> Hash {
    let mut entries: Vec<(&TileKey, &CellRect)> = placement.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    let mut hasher = Hasher::new();
    hasher.update(&placement.columns().to_le_bytes());
    for (key, rect) in entries {
        hasher.update(&(key.len() as u64).to_le_bytes());
        hasher.update(key.as_bytes());
        for part in [rect.row, rect.col, rect.width, rect.height] {
            hasher.update(&part.to_le_bytes());
        }
    }
    hasher.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packer::DensePacker;
    use crate::tile::Tile;

    fn tiles() -> Vec<Tile> {
        vec![Tile::unit("a"), Tile::unit("b"), Tile::unit("c")]
    }

    fn pack(tiles: &[Tile], previous: Option<&Placement>) -> Placement {
        DensePacker::new(2).pack(tiles, &[], previous).unwrap()
    }

    #[test]
    fn first_sync_flags_every_tile_dirty() {
        let mut registry = PlacementRegistry::new();
        registry.sync_placement(&pack(&tiles(), None));
        let moved = registry.take_dirty();
        assert_eq!(moved.len(), 3);
        assert!(!registry.has_dirty());
    }

    #[test]
    fn unchanged_resync_drains_nothing() {
        let mut registry = PlacementRegistry::new();
        let placement = pack(&tiles(), None);
        registry.sync_placement(&placement);
        registry.take_dirty();

        registry.sync_placement(&placement);
        assert!(registry.take_dirty().is_empty());
    }

    #[test]
    fn a_moved_tile_drains_exactly_once() {
        let mut registry = PlacementRegistry::new();
        let placement = pack(&tiles(), None);
        registry.sync_placement(&placement);
        registry.take_dirty();

        let mut shifted = Placement::new(2);
        for (key, rect) in placement.iter() {
            shifted.insert(key.clone(), *rect);
        }
        shifted.insert("c".to_string(), CellRect::new(5, 0, 1, 1));
        registry.sync_placement(&shifted);

        let moved = registry.take_dirty();
        assert_eq!(moved.len(), 1);
        assert_eq!(moved[0].0, "c");
        assert!(registry.take_dirty().is_empty());
    }

    #[test]
    fn vanished_tiles_are_forgotten() {
        let mut registry = PlacementRegistry::new();
        registry.sync_placement(&pack(&tiles(), None));
        registry.take_dirty();

        let fewer = vec![Tile::unit("a")];
        registry.sync_placement(&pack(&fewer, Some(&registry.snapshot())));
        assert_eq!(registry.len(), 1);
        assert!(registry.rect_of(&"b".to_string()).is_none());
    }

    #[test]
    fn revision_matches_for_identical_placements() {
        let mut first = PlacementRegistry::new();
        let mut second = PlacementRegistry::new();
        first.sync_placement(&pack(&tiles(), None));
        second.sync_placement(&pack(&tiles(), None));
        assert_eq!(first.revision(), second.revision());

        let other = vec![Tile::unit("a"), Tile::unit("b")];
        second.sync_placement(&pack(&other, None));
        assert_ne!(first.revision(), second.revision());
    }

    #[test]
    fn snapshot_round_trips_the_synced_placement() {
        let mut registry = PlacementRegistry::new();
        let placement = pack(&tiles(), None);
        registry.sync_placement(&placement);
        assert_eq!(registry.snapshot(), placement);
    }
}
