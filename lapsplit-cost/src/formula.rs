//! Splitting cost formula
//!
//! For a pair that passed the gates the cost starts at the squared distance
//! and is multiplied by `1 + ratio` for every configured feature, where
//! `ratio` is the normalized difference of that feature between the segment
//! start and the middle spot. A ratio strictly above its cutoff blocks the
//! pair; a ratio equal to the cutoff passes.

use crate::error::{Error, Result};
use crate::matrix::{BlockReason, SplitCost};
use lapsplit_common::{Spot, SpotFeature};
use std::collections::BTreeMap;

/// Cost of a gated pair
///
/// Cutoffs are checked in [`SpotFeature`] order, so when several features
/// exceed their cutoff the reported one is always the first in that order.
pub fn evaluate(
    start: &Spot,
    middle: &Spot,
    squared_distance: f64,
    feature_cutoffs: &BTreeMap<SpotFeature, f64>,
) -> Result<SplitCost> {
    let mut cost = squared_distance;

    for (&feature, &max_ratio) in feature_cutoffs {
        let ratio = start.normalized_diff_to(middle, feature)?;
        if ratio.is_nan() {
            return Err(Error::InvalidValue(format!(
                "{} ratio between spots {} and {} is NaN",
                feature, start.id, middle.id
            )));
        }
        if ratio > max_ratio {
            return Ok(SplitCost::Blocked(BlockReason::Feature(feature)));
        }
        cost *= 1.0 + ratio;
    }

    Ok(SplitCost::Cost(cost))
}
