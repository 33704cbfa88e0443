//! Shared fixtures for lapsplit-cost integration tests

#![allow(dead_code)]

use lapsplit_common::{Spot, SpotFeature, SplittingSettings, TrackSegment};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// 2D spot with a mean intensity
pub fn spot(id: u64, x: f64, y: f64, t: f64, intensity: f64) -> Spot {
    Spot::new(id)
        .with_feature(SpotFeature::PositionX, x)
        .with_feature(SpotFeature::PositionY, y)
        .with_feature(SpotFeature::PositionT, t)
        .with_feature(SpotFeature::MeanIntensity, intensity)
}

/// Settings without feature cutoffs
pub fn plain_settings(max_distance: f64, time_cutoff: f64) -> SplittingSettings {
    SplittingSettings {
        max_distance,
        time_cutoff,
        blocking_value: 1e12,
        feature_cutoffs: Default::default(),
        use_multithreading: false,
        worker_threads: None,
        allow_splitting: true,
    }
}

/// Random scene: spots spread over `frames` frames, chopped into short segments
///
/// Every spot is also offered as a middle spot, so some pairs hit the
/// same-spot gate.
pub struct Scene {
    pub segments: Vec<TrackSegment>,
    pub middles: Vec<Spot>,
}

pub fn random_scene(seed: u64, n_spots: usize, frames: u32) -> Scene {
    let mut rng = StdRng::seed_from_u64(seed);
    let spots: Vec<Spot> = (0..n_spots as u64)
        .map(|id| {
            spot(
                id,
                rng.gen_range(0.0..20.0),
                rng.gen_range(0.0..20.0),
                rng.gen_range(0..frames) as f64,
                rng.gen_range(50.0..150.0),
            )
        })
        .collect();

    let mut segments = Vec::new();
    let mut remaining = spots.as_slice();
    while !remaining.is_empty() {
        let take = rng.gen_range(1..=3).min(remaining.len());
        segments.push(TrackSegment::new(remaining[..take].to_vec()));
        remaining = &remaining[take..];
    }

    Scene {
        segments,
        middles: spots,
    }
}
