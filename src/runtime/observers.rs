use serde_json::json;

use crate::error::PackError;
use crate::logging::{LogLevel, Logger, event_with_fields, json_kv};
use crate::packer::{Placement, TileMove};

use super::BoardObserver;

/// Logs board notifications for observability/debugging.
///
/// Placement traffic is chatty during a drag (one preview per candidate
/// cell), so it logs at the configured level while rejections always log at
/// Warn.
pub struct PackLoggerObserver {
    logger: Logger,
    level: LogLevel,
    log_placements: bool,
}

impl PackLoggerObserver {
    pub fn new(logger: Logger) -> Self {
        Self {
            logger,
            level: LogLevel::Debug,
            log_placements: true,
        }
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn log_placements(mut self, enabled: bool) -> Self {
        self.log_placements = enabled;
        self
    }

    fn emit(
        &self,
        level: LogLevel,
        message: &str,
        fields: impl IntoIterator<Item = (String, serde_json::Value)>,
    ) {
        let event = event_with_fields(level, "tilegrid::board.observer", message, fields);
        let _ = self.logger.log_event(event);
    }
}

impl BoardObserver for PackLoggerObserver {
    fn name(&self) -> &str {
        "observers.pack_logger"
    }

    fn placement_changed(&mut self, placement: &Placement) {
        if self.log_placements {
            self.emit(
                self.level,
                "placement_changed",
                [
                    json_kv("tiles", json!(placement.len())),
                    json_kv("columns", json!(placement.columns())),
                ],
            );
        }
    }

    fn order_changed(&mut self, mv: &TileMove) {
        self.emit(
            self.level,
            "order_changed",
            [
                json_kv("key", json!(mv.key.clone())),
                json_kv("from", json!(mv.from)),
                json_kv("to", json!(mv.to)),
            ],
        );
    }

    fn pack_rejected(&mut self, err: &PackError) {
        self.emit(
            LogLevel::Warn,
            "pack_rejected",
            [
                json_kv("error", json!(err.to_string())),
                json_kv("retryable", json!(err.is_rejection())),
            ],
        );
    }
}
