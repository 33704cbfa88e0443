//! Splitting problem files
//!
//! JSON input for the `lapsplit-cost` binary: a spot table plus track segments
//! and middle spots given as spot ids.
//!
//! ```json
//! {
//!   "spots": [{ "id": 1, "features": { "POSITION_X": 0.0, "POSITION_Y": 0.0, "POSITION_T": 5.0 } }],
//!   "track_segments": [[1]],
//!   "middle_spots": []
//! }
//! ```

use crate::error::{Error, Result};
use lapsplit_common::{Spot, SpotId, TrackSegment};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Splitting problem as stored on disk
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SplitProblem {
    pub spots: Vec<Spot>,

    #[serde(default)]
    pub track_segments: Vec<Vec<SpotId>>,

    #[serde(default)]
    pub middle_spots: Vec<SpotId>,
}

/// Problem with ids replaced by spots, ready for the cost builder
#[derive(Debug, Clone, Default)]
pub struct ResolvedProblem {
    pub track_segments: Vec<TrackSegment>,
    pub middle_spots: Vec<Spot>,
}

impl SplitProblem {
    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Look up every referenced id in the spot table
    ///
    /// Duplicate ids in the spot table and references to unknown ids are
    /// input errors. The same spot may appear both in a segment and in the
    /// middle spot list.
    pub fn resolve(&self) -> Result<ResolvedProblem> {
        let mut by_id: HashMap<SpotId, &Spot> = HashMap::with_capacity(self.spots.len());
        for spot in &self.spots {
            if by_id.insert(spot.id, spot).is_some() {
                return Err(Error::InvalidInput(format!("duplicate spot id {}", spot.id)));
            }
        }

        let lookup = |id: &SpotId| -> Result<Spot> {
            by_id
                .get(id)
                .map(|spot| (*spot).clone())
                .ok_or_else(|| Error::InvalidInput(format!("unknown spot id {}", id)))
        };

        let track_segments = self
            .track_segments
            .iter()
            .map(|ids| ids.iter().map(lookup).collect::<Result<Vec<_>>>().map(TrackSegment::new))
            .collect::<Result<Vec<_>>>()?;
        let middle_spots = self
            .middle_spots
            .iter()
            .map(lookup)
            .collect::<Result<Vec<_>>>()?;

        Ok(ResolvedProblem {
            track_segments,
            middle_spots,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROBLEM: &str = r#"{
        "spots": [
            { "id": 1, "features": { "POSITION_X": 3.0, "POSITION_Y": 0.0, "POSITION_T": 5.0 } },
            { "id": 2, "features": { "POSITION_X": 3.0, "POSITION_Y": 1.0, "POSITION_T": 6.0 } },
            { "id": 3, "features": { "POSITION_X": 0.0, "POSITION_Y": 0.0, "POSITION_T": 4.0 } }
        ],
        "track_segments": [[2, 1]],
        "middle_spots": [3, 2]
    }"#;

    #[test]
    fn test_resolve() {
        let problem = SplitProblem::from_json_str(PROBLEM).unwrap();
        let resolved = problem.resolve().unwrap();

        assert_eq!(resolved.track_segments.len(), 1);
        assert_eq!(resolved.track_segments[0].start().unwrap().id, SpotId(1));
        let middle_ids: Vec<_> = resolved.middle_spots.iter().map(|s| s.id).collect();
        assert_eq!(middle_ids, vec![SpotId(3), SpotId(2)]);
    }

    #[test]
    fn test_unknown_id_is_error() {
        let problem = SplitProblem {
            spots: vec![Spot::at(1, 0.0, 0.0, 0.0, 0.0)],
            track_segments: vec![vec![SpotId(1)]],
            middle_spots: vec![SpotId(9)],
        };
        assert!(matches!(problem.resolve(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_duplicate_id_is_error() {
        let problem = SplitProblem {
            spots: vec![Spot::at(1, 0.0, 0.0, 0.0, 0.0), Spot::at(1, 1.0, 0.0, 0.0, 0.0)],
            ..Default::default()
        };
        assert!(matches!(problem.resolve(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(matches!(
            SplitProblem::from_json_str("{ \"spots\": 3 }"),
            Err(Error::Json(_))
        ));
    }
}
