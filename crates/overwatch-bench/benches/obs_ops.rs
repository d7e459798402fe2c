//! Criterion micro-benchmarks for observation window extraction.

use criterion::{criterion_group, criterion_main, Criterion};
use overwatch_core::Position;
use overwatch_obs::{ObsLayout, WindowExtractor};
use overwatch_test_utils::GridBuilder;

use overwatch_bench::{pillar_map, reference_config};

/// Benchmark: one interior 7x7 window on a 32x32 grid.
fn bench_window_interior(c: &mut Criterion) {
    let grid = GridBuilder::from_map(pillar_map(32).unwrap())
        .sniper((10, 10))
        .target((11, 9))
        .grid();
    let mut extractor = WindowExtractor::new(7, 10.0).unwrap();

    c.bench_function("window_interior_7x7", |b| {
        b.iter(|| {
            let w = extractor
                .extract(&grid, Position::new(15, 15), 0, 0.0)
                .unwrap();
            std::hint::black_box(w.as_slice());
        });
    });
}

/// Benchmark: a corner window, which takes the fill path.
fn bench_window_corner(c: &mut Criterion) {
    let grid = GridBuilder::from_map(pillar_map(32).unwrap()).grid();
    let mut extractor = WindowExtractor::new(7, 10.0).unwrap();

    c.bench_function("window_corner_7x7", |b| {
        b.iter(|| {
            let w = extractor.extract(&grid, Position::new(0, 0), 0, 0.0).unwrap();
            std::hint::black_box(w.as_slice());
        });
    });
}

/// Benchmark: flat observations for all agents of the reference profile.
fn bench_collect_reference(c: &mut Criterion) {
    let config = reference_config(42);
    let mut env = overwatch_bench::build_env(config.clone(), 32).unwrap();
    env.reset().unwrap();
    let mut extractor = WindowExtractor::new(config.obs_range, config.layer_normalization).unwrap();
    let surveillance = env.agents(overwatch_core::AgentGroup::Surveillance);

    c.bench_function("collect_reference_8", |b| {
        b.iter(|| {
            let obs = extractor
                .collect(env.grid(), surveillance, ObsLayout::default())
                .unwrap();
            std::hint::black_box(&obs);
        });
    });
}

criterion_group!(
    benches,
    bench_window_interior,
    bench_window_corner,
    bench_collect_reference
);
criterion_main!(benches);
