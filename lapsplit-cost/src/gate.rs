//! Gate evaluation
//!
//! Three threshold tests decide whether a (middle spot, track segment) pair
//! may carry a cost at all. They run in a fixed order and the first one that
//! fails decides the block reason:
//!
//! 1. the middle spot must not belong to the segment,
//! 2. `0 < t_start - t_middle <= time_cutoff`,
//! 3. `d^2 <= max_distance^2` between the segment start and the middle spot.

use crate::error::{Error, Result};
use crate::matrix::BlockReason;
use lapsplit_common::{Spot, SpotFeature, SplittingSettings, TrackSegment};

/// Outcome of the gate tests for one pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gate {
    /// All gates passed; carries the squared distance for the cost formula
    Pass { squared_distance: f64 },
    Blocked(BlockReason),
}

/// Time feature of a spot; must be present, finite and not negative
pub fn spot_time(spot: &Spot) -> Result<f64> {
    let t = spot.require_feature(SpotFeature::PositionT)?;
    if !t.is_finite() || t < 0.0 {
        return Err(Error::InvalidValue(format!(
            "spot {} has invalid time {}",
            spot.id, t
        )));
    }
    Ok(t)
}

/// Run the gates for `middle` against `segment`, whose first spot is `start`
pub fn evaluate(
    middle: &Spot,
    start: &Spot,
    segment: &TrackSegment,
    settings: &SplittingSettings,
) -> Result<Gate> {
    if segment.contains(middle) {
        return Ok(Gate::Blocked(BlockReason::SameSpot));
    }

    // Start must come strictly after the middle spot, within the cutoff.
    // Written as a negated pass condition so a NaN gap is blocked too.
    let gap = spot_time(start)? - spot_time(middle)?;
    if !(gap > 0.0 && gap <= settings.time_cutoff) {
        return Ok(Gate::Blocked(BlockReason::Time));
    }

    let d2 = start.squared_distance_to(middle)?;
    if d2.is_nan() {
        return Err(Error::InvalidValue(format!(
            "distance between spots {} and {} is NaN",
            start.id, middle.id
        )));
    }
    if d2 > settings.max_distance * settings.max_distance {
        return Ok(Gate::Blocked(BlockReason::Distance));
    }

    Ok(Gate::Pass {
        squared_distance: d2,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(max_distance: f64, time_cutoff: f64) -> SplittingSettings {
        SplittingSettings {
            max_distance,
            time_cutoff,
            feature_cutoffs: Default::default(),
            ..Default::default()
        }
    }

    fn gate(middle: &Spot, start: &Spot, s: &SplittingSettings) -> Gate {
        let segment = TrackSegment::new(vec![start.clone()]);
        evaluate(middle, start, &segment, s).unwrap()
    }

    #[test]
    fn test_pass_reports_squared_distance() {
        let start = Spot::at(1, 3.0, 0.0, 0.0, 5.0);
        let middle = Spot::at(2, 0.0, 0.0, 0.0, 4.0);
        assert_eq!(
            gate(&middle, &start, &settings(5.0, 2.0)),
            Gate::Pass {
                squared_distance: 9.0
            }
        );
    }

    #[test]
    fn test_member_of_segment_is_blocked_first() {
        let start = Spot::at(1, 0.0, 0.0, 0.0, 5.0);
        let middle = Spot::at(2, 0.0, 0.0, 0.0, 6.0);
        let segment = TrackSegment::new(vec![start.clone(), middle.clone()]);

        // Time gate would also fail; same-spot must win
        let result = evaluate(&middle, &start, &segment, &settings(5.0, 2.0)).unwrap();
        assert_eq!(result, Gate::Blocked(BlockReason::SameSpot));
    }

    #[test]
    fn test_zero_gap_is_blocked() {
        let start = Spot::at(1, 0.0, 0.0, 0.0, 5.0);
        let middle = Spot::at(2, 0.0, 0.0, 0.0, 5.0);
        assert_eq!(
            gate(&middle, &start, &settings(100.0, 100.0)),
            Gate::Blocked(BlockReason::Time)
        );
    }

    #[test]
    fn test_negative_gap_is_blocked() {
        let start = Spot::at(1, 0.0, 0.0, 0.0, 4.0);
        let middle = Spot::at(2, 0.0, 0.0, 0.0, 5.0);
        assert_eq!(
            gate(&middle, &start, &settings(100.0, 100.0)),
            Gate::Blocked(BlockReason::Time)
        );
    }

    #[test]
    fn test_gap_equal_to_cutoff_passes() {
        let start = Spot::at(1, 0.0, 0.0, 0.0, 6.0);
        let middle = Spot::at(2, 0.0, 0.0, 0.0, 4.0);
        assert!(matches!(
            gate(&middle, &start, &settings(1.0, 2.0)),
            Gate::Pass { .. }
        ));
    }

    #[test]
    fn test_gap_above_cutoff_is_blocked() {
        let start = Spot::at(1, 0.0, 0.0, 0.0, 5.0);
        let middle = Spot::at(2, 0.0, 0.0, 0.0, 4.0);
        assert_eq!(
            gate(&middle, &start, &settings(5.0, 0.5)),
            Gate::Blocked(BlockReason::Time)
        );
    }

    #[test]
    fn test_distance_equal_to_max_passes() {
        let start = Spot::at(1, 3.0, 4.0, 0.0, 5.0);
        let middle = Spot::at(2, 0.0, 0.0, 0.0, 4.0);
        assert_eq!(
            gate(&middle, &start, &settings(5.0, 1.0)),
            Gate::Pass {
                squared_distance: 25.0
            }
        );
    }

    #[test]
    fn test_distance_above_max_is_blocked() {
        let start = Spot::at(1, 3.0, 4.1, 0.0, 5.0);
        let middle = Spot::at(2, 0.0, 0.0, 0.0, 4.0);
        assert_eq!(
            gate(&middle, &start, &settings(5.0, 1.0)),
            Gate::Blocked(BlockReason::Distance)
        );
    }

    #[test]
    fn test_missing_time_is_error() {
        let start = Spot::at(1, 0.0, 0.0, 0.0, 5.0);
        let middle = Spot::new(2)
            .with_feature(SpotFeature::PositionX, 0.0)
            .with_feature(SpotFeature::PositionY, 0.0);
        let segment = TrackSegment::new(vec![start.clone()]);
        assert!(evaluate(&middle, &start, &segment, &settings(5.0, 1.0)).is_err());
    }

    #[test]
    fn test_negative_time_is_error() {
        let start = Spot::at(1, 0.0, 0.0, 0.0, 5.0);
        let middle = Spot::at(2, 0.0, 0.0, 0.0, -1.0);
        let segment = TrackSegment::new(vec![start.clone()]);
        assert!(matches!(
            evaluate(&middle, &start, &segment, &settings(5.0, 10.0)),
            Err(Error::InvalidValue(_))
        ));
    }

    #[test]
    fn test_infinite_time_is_error() {
        // inf - inf would be a NaN gap
        let start = Spot::at(1, 3.0, 0.0, 0.0, f64::INFINITY);
        let middle = Spot::at(2, 0.0, 0.0, 0.0, f64::INFINITY);
        let segment = TrackSegment::new(vec![start.clone()]);
        assert!(matches!(
            evaluate(&middle, &start, &segment, &settings(5.0, 2.0)),
            Err(Error::InvalidValue(_))
        ));
        assert!(matches!(spot_time(&start), Err(Error::InvalidValue(_))));
    }
}
