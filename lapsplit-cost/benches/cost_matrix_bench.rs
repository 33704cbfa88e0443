//! Splitting Cost Matrix Benchmark
//!
//! Compares single-worker and multi-worker builds on a synthetic scene with
//! a few thousand candidate pairs per row.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lapsplit_common::{Spot, SpotFeature, SplittingSettings, TrackSegment};
use lapsplit_cost::{SplittingCostFunction, WorkerPool};
use std::collections::BTreeMap;

/// Deterministic scene: a grid of spots per frame, one-spot segments
fn scene(frames: u64, per_side: u64) -> (Vec<TrackSegment>, Vec<Spot>) {
    let mut spots = Vec::new();
    let mut id = 0;
    for t in 0..frames {
        for gx in 0..per_side {
            for gy in 0..per_side {
                spots.push(
                    Spot::at(id, gx as f64 * 2.0 + t as f64 * 0.3, gy as f64 * 2.0, 0.0, t as f64)
                        .with_feature(SpotFeature::MeanIntensity, 100.0 + ((id * 37) % 50) as f64),
                );
                id += 1;
            }
        }
    }
    let segments = spots
        .iter()
        .cloned()
        .map(|s| TrackSegment::new(vec![s]))
        .collect();
    (segments, spots)
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("splitting_cost_matrix");
    let (segments, middles) = scene(5, 20);
    let settings = SplittingSettings {
        max_distance: 6.0,
        time_cutoff: 2.0,
        feature_cutoffs: BTreeMap::from([(SpotFeature::MeanIntensity, 0.4)]),
        ..Default::default()
    };

    let mut worker_counts = vec![1, 2, 4, num_cpus::get()];
    worker_counts.sort_unstable();
    worker_counts.dedup();

    for workers in worker_counts {
        let cost_fn =
            SplittingCostFunction::with_pool(settings.clone(), WorkerPool::new(workers)).unwrap();
        group.bench_with_input(BenchmarkId::new("workers", workers), &workers, |b, _| {
            b.iter(|| {
                let matrix = cost_fn.build(black_box(&segments), black_box(&middles)).unwrap();
                black_box(matrix);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_build);
criterion_main!(benches);
