//! Splitting cost function
//!
//! Builds the middle-spot x track-segment cost matrix used by the LAP tracker
//! to decide whether a track segment splits off from a spot one frame earlier.
//!
//! Rows are distributed over a [`WorkerPool`]: each worker repeatedly claims
//! the next unprocessed row from a shared atomic counter, computes every
//! column of that row, and stores the row in its write-once slot. Rows differ
//! a lot in cost (most pairs block early), so claiming rows dynamically keeps
//! workers evenly loaded. The matrix is only assembled after all workers are
//! joined, and any failure aborts the whole build.

use crate::error::{Error, Result};
use crate::formula;
use crate::gate::{self, Gate};
use crate::matrix::{BlockReason, CostMatrix, SplitCost};
use crate::pool::WorkerPool;
use lapsplit_common::{Spot, SpotFeature, SplittingSettings, TrackSegment};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::OnceLock;
use tracing::{debug, trace};

const WORKER_NAME: &str = "LAP splitting cost worker";

/// Splitting cost matrix builder
#[derive(Debug, Clone)]
pub struct SplittingCostFunction {
    settings: SplittingSettings,
    pool: WorkerPool,
}

impl SplittingCostFunction {
    /// Create a cost function with a pool sized from the settings
    pub fn new(settings: SplittingSettings) -> Result<Self> {
        let pool = WorkerPool::from_settings(&settings);
        Self::with_pool(settings, pool)
    }

    /// Create a cost function running on an explicit pool
    pub fn with_pool(settings: SplittingSettings, pool: WorkerPool) -> Result<Self> {
        settings.validate()?;
        Ok(Self { settings, pool })
    }

    pub fn settings(&self) -> &SplittingSettings {
        &self.settings
    }

    pub fn pool(&self) -> WorkerPool {
        self.pool
    }

    /// Build the cost matrix for `middle_spots` (rows) against `track_segments` (columns)
    ///
    /// Blocks until every cell is computed. With splitting disabled the
    /// result is fully blocked and no pair is examined.
    pub fn build(&self, track_segments: &[TrackSegment], middle_spots: &[Spot]) -> Result<CostMatrix> {
        let n_rows = middle_spots.len();
        let n_cols = track_segments.len();
        let blocking_value = self.settings.blocking_value;

        if !self.settings.allow_splitting {
            debug!(
                "Splitting disabled, returning fully blocked {}x{} matrix",
                n_rows, n_cols
            );
            return Ok(CostMatrix::filled(
                n_rows,
                n_cols,
                blocking_value,
                BlockReason::SplittingDisabled,
            ));
        }

        let starts = segment_starts(track_segments)?;
        self.check_spots(middle_spots, &starts)?;

        let next_row = AtomicUsize::new(0);
        let abort = AtomicBool::new(false);
        let slots: Vec<OnceLock<Vec<SplitCost>>> = (0..n_rows).map(|_| OnceLock::new()).collect();

        let rows_per_worker = self.pool.run_and_join(WORKER_NAME, |worker_id| {
            let mut claimed = 0usize;
            while !abort.load(Ordering::Relaxed) {
                let i = next_row.fetch_add(1, Ordering::Relaxed);
                if i >= n_rows {
                    break;
                }

                let row = match self.row_costs(&middle_spots[i], track_segments, &starts) {
                    Ok(row) => row,
                    Err(e) => {
                        abort.store(true, Ordering::Relaxed);
                        return Err(Error::Row {
                            row: i,
                            source: Box::new(e),
                        });
                    }
                };
                slots[i]
                    .set(row)
                    .map_err(|_| Error::Internal(format!("row {} claimed twice", i)))?;
                claimed += 1;
            }
            trace!("Worker {} done after {} row(s)", worker_id + 1, claimed);
            Ok(claimed)
        })?;

        let rows = slots
            .into_iter()
            .enumerate()
            .map(|(i, slot)| {
                slot.into_inner()
                    .ok_or_else(|| Error::Internal(format!("row {} was never computed", i)))
            })
            .collect::<Result<Vec<_>>>()?;
        let matrix = CostMatrix::from_rows(n_cols, blocking_value, rows)?;

        debug!(
            "Built {}x{} splitting cost matrix with {} worker(s) (rows per worker {:?}), {} blocked cell(s)",
            n_rows,
            n_cols,
            self.pool.size(),
            rows_per_worker,
            matrix.blocked_count()
        );

        Ok(matrix)
    }

    /// Cost of one (middle spot, track segment) pair
    ///
    /// An empty `segment` is reported as [`Error::EmptySegment`].
    pub fn pair_cost(&self, middle: &Spot, segment: &TrackSegment) -> Result<SplitCost> {
        let start = segment.start().ok_or(Error::EmptySegment)?;
        self.gated_cost(middle, start, segment)
    }

    fn gated_cost(&self, middle: &Spot, start: &Spot, segment: &TrackSegment) -> Result<SplitCost> {
        match gate::evaluate(middle, start, segment, &self.settings)? {
            Gate::Blocked(reason) => Ok(SplitCost::Blocked(reason)),
            Gate::Pass { squared_distance } => formula::evaluate(
                start,
                middle,
                squared_distance,
                &self.settings.feature_cutoffs,
            ),
        }
    }

    fn row_costs(
        &self,
        middle: &Spot,
        track_segments: &[TrackSegment],
        starts: &[&Spot],
    ) -> Result<Vec<SplitCost>> {
        trace!(
            "Middle spot {}: x={:?}, y={:?}, t={:?}",
            middle.id,
            middle.feature(SpotFeature::PositionX),
            middle.feature(SpotFeature::PositionY),
            middle.feature(SpotFeature::PositionT)
        );

        track_segments
            .iter()
            .zip(starts)
            .enumerate()
            .map(|(j, (segment, start))| {
                let cost = self.gated_cost(middle, start, segment)?;
                trace!("  segment {}: {:?}", j, cost);
                Ok(cost)
            })
            .collect()
    }

    /// Reject inputs the gates and the formula cannot handle before any worker starts
    ///
    /// Every middle spot and every segment start needs a valid time, a position
    /// and a value for each feature that has a cutoff.
    fn check_spots(&self, middle_spots: &[Spot], starts: &[&Spot]) -> Result<()> {
        let spots = middle_spots.iter().chain(starts.iter().copied());
        for spot in spots {
            gate::spot_time(spot)?;
            spot.require_feature(SpotFeature::PositionX)?;
            spot.require_feature(SpotFeature::PositionY)?;
            for feature in self.settings.feature_cutoffs.keys() {
                spot.require_feature(*feature)?;
            }
        }
        Ok(())
    }
}

/// First spot of every segment, failing on the first empty one
fn segment_starts(track_segments: &[TrackSegment]) -> Result<Vec<&Spot>> {
    track_segments
        .iter()
        .enumerate()
        .map(|(index, segment)| segment.start().ok_or(Error::EmptyTrackSegment { index }))
        .collect()
}
