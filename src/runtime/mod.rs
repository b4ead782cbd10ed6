use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use serde_json::json;

use crate::logging::{LogLevel, Logger, event_with_fields, json_kv};
use crate::metrics::{MetricSnapshot, PackMetrics};
use crate::packer::derive_move;
use crate::{
    Cell, CellRect, DensePacker, PackError, Placement, PlacementRegistry, Result, Tile, TileKey,
    TileMove,
};

pub mod observers;

/// Configuration knobs for the board runtime.
#[derive(Clone)]
pub struct RuntimeConfig {
    /// Optional structured logger used by the runtime.
    pub logger: Option<Logger>,
    /// Metrics accumulator shared with whoever wants to snapshot it.
    pub metrics: Option<Arc<Mutex<PackMetrics>>>,
    /// Target field used when emitting metrics snapshots.
    pub metrics_target: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            logger: None,
            metrics: None,
            metrics_target: "tilegrid::board.metrics".to_string(),
        }
    }
}

impl RuntimeConfig {
    /// Enable metrics collection if it has not already been configured.
    pub fn enable_metrics(&mut self) {
        if self.metrics.is_none() {
            self.metrics = Some(Arc::new(Mutex::new(PackMetrics::new())));
        }
    }

    /// Disable metrics collection.
    pub fn disable_metrics(&mut self) {
        self.metrics = None;
    }

    /// Access the shared metrics handle if metrics are enabled.
    pub fn metrics_handle(&self) -> Option<Arc<Mutex<PackMetrics>>> {
        self.metrics.as_ref().map(Arc::clone)
    }
}

/// Notification seam for the presentation collaborator.
///
/// Observers are synchronous and fire-and-forget; nothing they do can fail a
/// pack. Preview placements flow through `placement_changed` exactly like
/// rest-state placements, so a renderer only ever positions what it is
/// handed.
pub trait BoardObserver: Send {
    fn name(&self) -> &str {
        "board_observer"
    }

    fn placement_changed(&mut self, _placement: &Placement) {}

    fn order_changed(&mut self, _mv: &TileMove) {}

    fn pack_rejected(&mut self, _err: &PackError) {}
}

struct DragState {
    key: TileKey,
}

/// Owns the canonical tile order and drives the packer on every change.
///
/// The runtime is the single entry point for the collaborator: tile-list and
/// column changes trigger rest-state repacks, drag lifecycle calls trigger
/// pinned packs, and every successful placement is synced into the registry
/// so the collaborator can drain exactly the tiles that moved.
pub struct BoardRuntime {
    tiles: Vec<Tile>,
    packer: DensePacker,
    registry: PlacementRegistry,
    stable: Placement,
    observers: Vec<Box<dyn BoardObserver>>,
    config: RuntimeConfig,
    drag: Option<DragState>,
    started_at: Instant,
}

impl BoardRuntime {
    pub fn new(tiles: Vec<Tile>, columns: u32) -> Result<Self> {
        let packer = DensePacker::new(columns);
        let stable = packer.pack(&tiles, &[], None)?;
        let mut registry = PlacementRegistry::new();
        registry.sync_placement(&stable);

        let runtime = Self {
            tiles,
            packer,
            registry,
            stable,
            observers: Vec::new(),
            config: RuntimeConfig::default(),
            drag: None,
            started_at: Instant::now(),
        };
        runtime.log_board_event(
            LogLevel::Info,
            "board_started",
            [
                json_kv("tiles", json!(runtime.tiles.len())),
                json_kv("columns", json!(columns)),
            ],
        );
        Ok(runtime)
    }

    pub fn config_mut(&mut self) -> &mut RuntimeConfig {
        &mut self.config
    }

    pub fn register_observer<O>(&mut self, observer: O)
    where
        O: BoardObserver + 'static,
    {
        self.log_board_event(
            LogLevel::Debug,
            "observer_registered",
            [json_kv("observer", json!(observer.name()))],
        );
        self.observers.push(Box::new(observer));
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn columns(&self) -> u32 {
        self.packer.columns()
    }

    /// The last good rest-state placement. Never reflects an in-flight
    /// preview.
    pub fn placement(&self) -> &Placement {
        &self.stable
    }

    /// Drain the tiles whose position changed since the last drain.
    pub fn take_dirty(&mut self) -> Vec<(TileKey, CellRect)> {
        self.registry.take_dirty()
    }

    pub fn has_dirty(&self) -> bool {
        self.registry.has_dirty()
    }

    /// Content fingerprint of the currently synced placement.
    pub fn revision(&self) -> Option<blake3::Hash> {
        self.registry.revision()
    }

    /// Replace the tile list and repack the rest state.
    ///
    /// On failure nothing changes: the previous tiles, placement, and
    /// registry all stay live so the collaborator can keep rendering them.
    pub fn set_tiles(&mut self, tiles: Vec<Tile>) -> Result<()> {
        self.abandon_drag("tiles_replaced");
        let previous = self.registry.snapshot();
        match self.packer.pack(&tiles, &[], Some(&previous)) {
            Ok(placement) => {
                self.tiles = tiles;
                self.record_pack_metric(placement.len());
                self.adopt_stable(placement);
                self.log_board_event(
                    LogLevel::Info,
                    "tiles_replaced",
                    [json_kv("tiles", json!(self.tiles.len()))],
                );
                Ok(())
            }
            Err(err) => {
                self.reject(&err);
                Err(err)
            }
        }
    }

    /// Change the column count, forcing a full repack with no pins.
    pub fn set_columns(&mut self, columns: u32) -> Result<()> {
        self.abandon_drag("columns_changed");
        let packer = DensePacker::new(columns);
        let previous = self.registry.snapshot();
        match packer.pack(&self.tiles, &[], Some(&previous)) {
            Ok(placement) => {
                self.packer = packer;
                self.record_pack_metric(placement.len());
                self.adopt_stable(placement);
                self.log_board_event(
                    LogLevel::Info,
                    "columns_changed",
                    [json_kv("columns", json!(columns))],
                );
                Ok(())
            }
            Err(err) => {
                self.reject(&err);
                Err(err)
            }
        }
    }

    /// Start a drag for `key`. Returns false (and changes nothing) when the
    /// key is not in the current tile list.
    pub fn begin_drag(&mut self, key: &TileKey) -> bool {
        if !self.tiles.iter().any(|tile| &tile.key == key) {
            self.log_board_event(
                LogLevel::Warn,
                "drag_ignored",
                [json_kv("key", json!(key.clone()))],
            );
            return false;
        }
        self.drag = Some(DragState { key: key.clone() });
        self.log_board_event(
            LogLevel::Debug,
            "drag_started",
            [json_kv("key", json!(key.clone()))],
        );
        true
    }

    /// Pack with the dragged tile pinned to `cell` and expose the result as
    /// a transient preview.
    ///
    /// A rejected candidate re-syncs the stable placement, so the
    /// collaborator's next drain snaps everything back.
    pub fn preview_drop(&mut self, cell: Cell) -> Option<Placement> {
        let key = self.drag.as_ref()?.key.clone();
        let pins = [(key.clone(), cell)];
        match self.packer.pack(&self.tiles, &pins, Some(&self.stable)) {
            Ok(placement) => {
                self.record_pack_metric(placement.len());
                self.record_metric(PackMetrics::record_preview);
                self.registry.sync_placement(&placement);
                self.log_board_event(
                    LogLevel::Debug,
                    "drop_previewed",
                    [
                        json_kv("key", json!(key)),
                        json_kv("row", json!(cell.row)),
                        json_kv("col", json!(cell.col)),
                    ],
                );
                self.notify_placement(&placement);
                Some(placement)
            }
            Err(err) => {
                self.reject(&err);
                self.registry.sync_placement(&self.stable);
                None
            }
        }
    }

    /// Resolve the drop: pack with the pin, derive the implied list move,
    /// apply it to the canonical order, and repack the rest state.
    ///
    /// Returns the move, or `None` when packing failed or the tile's
    /// row-major rank did not change. The drag ends either way.
    pub fn commit_drop(&mut self, cell: Cell) -> Option<TileMove> {
        let drag = self.drag.take()?;
        let pins = [(drag.key.clone(), cell)];
        let placement = match self.packer.pack(&self.tiles, &pins, Some(&self.stable)) {
            Ok(placement) => placement,
            Err(err) => {
                self.reject(&err);
                self.registry.sync_placement(&self.stable);
                self.notify_placement_stable();
                return None;
            }
        };

        self.record_pack_metric(placement.len());
        self.record_metric(PackMetrics::record_commit);

        let canonical: Vec<TileKey> = self.tiles.iter().map(|tile| tile.key.clone()).collect();
        let mv = derive_move(&placement, &canonical, &drag.key);
        if let Some(mv) = &mv {
            let tile = self.tiles.remove(mv.from);
            self.tiles.insert(mv.to, tile);
            self.record_metric(PackMetrics::record_reorder);
        }

        // Rest-state repack under the (possibly reordered) canonical list,
        // seeded by the committed placement so nothing jumps afterwards.
        let stable = match self.packer.pack(&self.tiles, &[], Some(&placement)) {
            Ok(stable) => stable,
            Err(err) => {
                // The same tiles packed moments ago; a failure here is the
                // row-limit defect path, not a user-facing rejection.
                self.log_board_event(
                    LogLevel::Error,
                    "rest_repack_defect",
                    [json_kv("error", json!(err.to_string()))],
                );
                placement
            }
        };
        self.adopt_stable(stable);

        self.log_board_event(
            LogLevel::Info,
            "drop_committed",
            [
                json_kv("key", json!(drag.key)),
                json_kv("row", json!(cell.row)),
                json_kv("col", json!(cell.col)),
                json_kv("moved", json!(mv.is_some())),
            ],
        );
        if let Some(mv) = &mv {
            for observer in &mut self.observers {
                observer.order_changed(mv);
            }
        }
        mv
    }

    /// Abort the drag and snap the registry back to the stable placement.
    pub fn cancel_drag(&mut self) {
        if self.drag.take().is_none() {
            return;
        }
        self.registry.sync_placement(&self.stable);
        self.log_board_event(LogLevel::Debug, "drag_cancelled", std::iter::empty());
        self.notify_placement_stable();
    }

    /// Snapshot the shared metrics against the runtime's uptime.
    pub fn metrics_snapshot(&self) -> Option<MetricSnapshot> {
        let metrics = self.config.metrics.as_ref()?;
        let uptime = self.uptime();
        metrics.lock().ok().map(|guard| guard.snapshot(uptime))
    }

    /// Emit a metrics snapshot through the configured logger.
    pub fn log_metrics(&self) {
        if let (Some(logger), Some(snapshot)) =
            (self.config.logger.as_ref(), self.metrics_snapshot())
        {
            let event = snapshot.to_log_event(&self.config.metrics_target);
            let _ = logger.log_event(event);
        }
    }

    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }

    fn adopt_stable(&mut self, placement: Placement) {
        self.registry.sync_placement(&placement);
        self.stable = placement;
        self.notify_placement_stable();
    }

    fn notify_placement_stable(&mut self) {
        let stable = &self.stable;
        for observer in &mut self.observers {
            observer.placement_changed(stable);
        }
    }

    fn notify_placement(&mut self, placement: &Placement) {
        for observer in &mut self.observers {
            observer.placement_changed(placement);
        }
    }

    fn reject(&mut self, err: &PackError) {
        self.record_metric(PackMetrics::record_rejection);
        // Row-limit exhaustion means the sizing rule under-estimated
        // capacity; log it loudly as a defect rather than a rejection.
        let level = match err {
            PackError::RowLimitExhausted { .. } => LogLevel::Error,
            _ => LogLevel::Warn,
        };
        self.log_board_event(
            level,
            "pack_rejected",
            [json_kv("error", json!(err.to_string()))],
        );
        for observer in &mut self.observers {
            observer.pack_rejected(err);
        }
    }

    fn abandon_drag(&mut self, reason: &str) {
        if self.drag.take().is_some() {
            self.log_board_event(
                LogLevel::Debug,
                "drag_abandoned",
                [json_kv("reason", json!(reason))],
            );
        }
    }

    fn log_board_event<I>(&self, level: LogLevel, message: &str, fields: I)
    where
        I: IntoIterator<Item = (String, serde_json::Value)>,
    {
        if let Some(logger) = self.config.logger.as_ref() {
            let event = event_with_fields(level, "tilegrid::board", message, fields);
            let _ = logger.log_event(event);
        }
    }

    fn record_pack_metric(&mut self, placed: usize) {
        if let Some(metrics) = self.config.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                guard.record_pack(placed);
            }
        }
    }

    fn record_metric(&mut self, record: fn(&mut PackMetrics)) {
        if let Some(metrics) = self.config.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                record(&mut guard);
            }
        }
    }
}
