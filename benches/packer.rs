use criterion::{Criterion, black_box, criterion_group, criterion_main};
use tilegrid::logging::{LogEvent, LogSink};
use tilegrid::{
    BoardRuntime, Cell, DensePacker, LogLevel, Logger, LoggingResult, PackLoggerObserver, Result,
    Tile,
};

#[derive(Clone, Default)]
struct NullSink;

impl LogSink for NullSink {
    fn log(&self, _event: &LogEvent) -> LoggingResult<()> {
        Ok(())
    }
}

const COLUMNS: u32 = 6;

fn dashboard_tiles() -> Vec<Tile> {
    let mut tiles = Vec::new();
    tiles.push(Tile::new("hero", 4, 2));
    tiles.push(Tile::new("sidebar", 2, 4));
    for idx in 0..24 {
        let (w, h) = match idx % 4 {
            0 => (2, 1),
            1 => (1, 2),
            2 => (3, 1),
            _ => (1, 1),
        };
        tiles.push(Tile::new(format!("card-{idx}"), w, h));
    }
    tiles
}

fn pack_rest_state(c: &mut Criterion) {
    let tiles = dashboard_tiles();
    let packer = DensePacker::new(COLUMNS);
    let previous = packer.pack(&tiles, &[], None).expect("rest pack");

    c.bench_function("pack_rest_state", |b| {
        b.iter(|| {
            packer
                .pack(black_box(&tiles), &[], Some(&previous))
                .expect("rest pack")
        });
    });
}

fn drag_pin_sweep(c: &mut Criterion) {
    c.bench_function("drag_pin_sweep", |b| {
        b.iter(|| {
            let mut runtime = build_runtime().expect("runtime");
            assert!(runtime.begin_drag(&"hero".to_string()));
            for row in 0..4 {
                for col in 0..COLUMNS {
                    black_box(runtime.preview_drop(Cell::new(row, col)));
                }
            }
            runtime.commit_drop(Cell::new(3, 0));
        });
    });
}

fn build_runtime() -> Result<BoardRuntime> {
    let mut runtime = BoardRuntime::new(dashboard_tiles(), COLUMNS)?;
    let logger = Logger::new(NullSink);
    runtime.config_mut().logger = Some(logger.clone());
    runtime.config_mut().enable_metrics();
    runtime.register_observer(
        PackLoggerObserver::new(logger)
            .with_level(LogLevel::Debug)
            .log_placements(false),
    );
    Ok(runtime)
}

criterion_group!(benches, pack_rest_state, drag_pin_sweep);
criterion_main!(benches);
