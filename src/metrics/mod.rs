use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;
use std::time::Duration;

/// Counters accumulated across the lifetime of a board runtime.
#[derive(Debug, Default, Clone)]
pub struct PackMetrics {
    packs: u64,
    rejected_packs: u64,
    placed_tiles: u64,
    previews: u64,
    commits: u64,
    reorders: u64,
}

impl PackMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_pack(&mut self, placed: usize) {
        self.packs = self.packs.saturating_add(1);
        self.placed_tiles = self.placed_tiles.saturating_add(placed as u64);
    }

    pub fn record_rejection(&mut self) {
        self.rejected_packs = self.rejected_packs.saturating_add(1);
    }

    pub fn record_preview(&mut self) {
        self.previews = self.previews.saturating_add(1);
    }

    pub fn record_commit(&mut self) {
        self.commits = self.commits.saturating_add(1);
    }

    pub fn record_reorder(&mut self) {
        self.reorders = self.reorders.saturating_add(1);
    }

    pub fn snapshot(&self, uptime: Duration) -> MetricSnapshot {
        MetricSnapshot {
            uptime_ms: uptime.as_millis() as u64,
            packs: self.packs,
            rejected_packs: self.rejected_packs,
            placed_tiles: self.placed_tiles,
            previews: self.previews,
            commits: self.commits,
            reorders: self.reorders,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MetricSnapshot {
    pub uptime_ms: u64,
    pub packs: u64,
    pub rejected_packs: u64,
    pub placed_tiles: u64,
    pub previews: u64,
    pub commits: u64,
    pub reorders: u64,
}

impl MetricSnapshot {
    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(
            LogLevel::Info,
            target.to_string(),
            "pack_metrics".to_string(),
            self.as_fields(),
        )
    }

    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("uptime_ms".to_string(), json!(self.uptime_ms));
        map.insert("packs".to_string(), json!(self.packs));
        map.insert("rejected_packs".to_string(), json!(self.rejected_packs));
        map.insert("placed_tiles".to_string(), json!(self.placed_tiles));
        map.insert("previews".to_string(), json!(self.previews));
        map.insert("commits".to_string(), json!(self.commits));
        map.insert("reorders".to_string(), json!(self.reorders));
        map
    }
}
