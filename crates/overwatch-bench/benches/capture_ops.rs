//! Criterion micro-benchmarks for capture resolution.

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use overwatch_agents::{AgentLayer, Placement};
use overwatch_core::AgentGroup;
use overwatch_rules::{CaptureEngine, CapturePolicy};
use overwatch_space::{GridState, Layer};
use overwatch_test_utils::open_map;

use overwatch_bench::capture_rings;

/// Build sniper and target layers plus a refreshed grid for `n` rings.
fn setup(n: usize) -> (GridState, AgentLayer, AgentLayer) {
    let map = open_map(64, 64);
    let (Placement::Fixed(targets), Placement::Fixed(snipers)) = capture_rings(64, n) else {
        unreachable!("capture rings are fixed placements");
    };
    let snipers = AgentLayer::new(AgentGroup::Sniper, 0, map.clone(), snipers).unwrap();
    let targets = AgentLayer::new(AgentGroup::Target, 0, map.clone(), targets).unwrap();
    let mut grid = GridState::from_map(&map);
    grid.refresh_from(Layer::Snipers, snipers.live_positions());
    grid.refresh_from(Layer::Targets, targets.live_positions());
    (grid, snipers, targets)
}

/// Benchmark: resolve 100 surrounded targets.
fn bench_resolve_all_captured(c: &mut Criterion) {
    let (grid, snipers, targets) = setup(100);
    let engine = CaptureEngine::new(CapturePolicy::Surround);

    c.bench_function("resolve_surround_100", |b| {
        b.iter_batched(
            || targets.clone(),
            |mut targets| {
                let report = engine.resolve_captures(&grid, &snipers, &mut targets);
                std::hint::black_box(report);
            },
            BatchSize::SmallInput,
        );
    });
}

/// Benchmark: resolve 100 targets where nothing is caught.
fn bench_resolve_none_captured(c: &mut Criterion) {
    let (mut grid, snipers, targets) = setup(100);
    grid.refresh_from(Layer::Snipers, std::iter::empty());
    let engine = CaptureEngine::new(CapturePolicy::Surround);

    c.bench_function("resolve_surround_miss_100", |b| {
        b.iter_batched(
            || targets.clone(),
            |mut targets| {
                let report = engine.resolve_captures(&grid, &snipers, &mut targets);
                std::hint::black_box(report);
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_resolve_all_captured, bench_resolve_none_captured);
criterion_main!(benches);
