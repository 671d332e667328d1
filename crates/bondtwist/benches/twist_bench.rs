//! Criterion benchmarks for graph building and bond-twist evaluation.
//! Sizes: diamond supercells with reps in {2, 4, 6} (64 to 1728 atoms).
//! Results: by default under target/criterion; to store under data/bench, run:
//!   CARGO_TARGET_DIR=data/bench cargo bench -p bondtwist

use bondtwist::api::{
    build_graph, diamond, jittered, BondTwistEngine, BondTwists, Frame, GridPairs,
    NeighborPolicy, PairSource, ICE_IC_LATTICE_NM,
};
use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};

fn bare_frame(reps: usize) -> Frame {
    let ideal = diamond(reps, ICE_IC_LATTICE_NM).unwrap();
    let noisy = jittered(&ideal, 0.02, 42).unwrap();
    Frame::new(noisy.cell, noisy.coords)
}

fn bench_pairs(c: &mut Criterion) {
    let mut group = c.benchmark_group("pairs");
    for &reps in &[2usize, 4, 6] {
        let frame = bare_frame(reps);
        group.throughput(Throughput::Elements(frame.len() as u64));
        group.bench_with_input(BenchmarkId::new("grid", reps), &frame, |b, frame| {
            b.iter(|| GridPairs.pairs(frame, 0.35))
        });
    }
    group.finish();
}

fn bench_twist(c: &mut Criterion) {
    let mut group = c.benchmark_group("twist");
    for &reps in &[2usize, 4, 6] {
        let frame = bare_frame(reps);
        let graph = build_graph(&frame, NeighborPolicy::mutual(0.35), &GridPairs).unwrap();
        group.throughput(Throughput::Elements(graph.edges().len() as u64));
        group.bench_with_input(BenchmarkId::new("serial", reps), &reps, |b, _| {
            let twists = BondTwists::new(BondTwistEngine::new(&frame, &graph));
            b.iter(|| twists.iter().filter(|r| r.is_ok()).count())
        });
        group.bench_with_input(BenchmarkId::new("parallel", reps), &reps, |b, _| {
            let twists = BondTwists::new(BondTwistEngine::new(&frame, &graph));
            b.iter(|| twists.par_collect().unwrap())
        });
        group.bench_with_input(BenchmarkId::new("build_graph", reps), &reps, |b, _| {
            b.iter_batched(
                || frame.clone(),
                |f| build_graph(&f, NeighborPolicy::mutual(0.35), &GridPairs).unwrap(),
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_pairs, bench_twist);
criterion_main!(benches);
