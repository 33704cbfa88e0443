//! Spot primitive and track segments
//!
//! A [`Spot`] is a point-like detection at one time point, described entirely
//! by its numeric features. Position lives in the `POSITION_X/Y/Z` features and
//! time in `POSITION_T`. A missing `POSITION_Z` means the spot is 2D.
//!
//! A [`TrackSegment`] is an ordered set of spots keyed by [`SpotId`], sorted by
//! `POSITION_T`. Membership is by identity, never by value.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Measurable spot features
///
/// Ordering is the declaration order and is what makes feature iteration
/// (and therefore the reported blocking feature) deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpotFeature {
    Quality,
    Radius,
    MeanIntensity,
    MedianIntensity,
    MinIntensity,
    MaxIntensity,
    TotalIntensity,
    StandardDeviation,
    Contrast,
    Snr,
    PositionX,
    PositionY,
    PositionZ,
    PositionT,
    Frame,
}

impl SpotFeature {
    /// Canonical feature key, as used in configuration files
    pub fn key(&self) -> &'static str {
        match self {
            SpotFeature::Quality => "QUALITY",
            SpotFeature::Radius => "RADIUS",
            SpotFeature::MeanIntensity => "MEAN_INTENSITY",
            SpotFeature::MedianIntensity => "MEDIAN_INTENSITY",
            SpotFeature::MinIntensity => "MIN_INTENSITY",
            SpotFeature::MaxIntensity => "MAX_INTENSITY",
            SpotFeature::TotalIntensity => "TOTAL_INTENSITY",
            SpotFeature::StandardDeviation => "STANDARD_DEVIATION",
            SpotFeature::Contrast => "CONTRAST",
            SpotFeature::Snr => "SNR",
            SpotFeature::PositionX => "POSITION_X",
            SpotFeature::PositionY => "POSITION_Y",
            SpotFeature::PositionZ => "POSITION_Z",
            SpotFeature::PositionT => "POSITION_T",
            SpotFeature::Frame => "FRAME",
        }
    }
}

impl fmt::Display for SpotFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Stable spot identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpotId(pub u64);

impl fmt::Display for SpotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spot {
    pub id: SpotId,

    #[serde(default)]
    pub features: BTreeMap<SpotFeature, f64>,
}

impl Spot {
    pub fn new(id: u64) -> Self {
        Self {
            id: SpotId(id),
            features: BTreeMap::new(),
        }
    }

    /// Convenience constructor for a spot at `(x, y, z)` and time `t`
    pub fn at(id: u64, x: f64, y: f64, z: f64, t: f64) -> Self {
        Self::new(id)
            .with_feature(SpotFeature::PositionX, x)
            .with_feature(SpotFeature::PositionY, y)
            .with_feature(SpotFeature::PositionZ, z)
            .with_feature(SpotFeature::PositionT, t)
    }

    pub fn with_feature(mut self, feature: SpotFeature, value: f64) -> Self {
        self.features.insert(feature, value);
        self
    }

    pub fn feature(&self, feature: SpotFeature) -> Option<f64> {
        self.features.get(&feature).copied()
    }

    /// Feature value, failing when it is absent or NaN
    pub fn require_feature(&self, feature: SpotFeature) -> Result<f64> {
        let value = self.feature(feature).ok_or(Error::MissingFeature {
            spot: self.id,
            feature,
        })?;
        if value.is_nan() {
            return Err(Error::InvalidValue(format!(
                "spot {} has NaN {}",
                self.id, feature
            )));
        }
        Ok(value)
    }

    /// Coordinate along one axis; an absent Z is treated as 0 (2D data)
    fn coordinate(&self, axis: SpotFeature) -> Result<f64> {
        match axis {
            SpotFeature::PositionZ if self.feature(axis).is_none() => Ok(0.0),
            _ => self.require_feature(axis),
        }
    }

    /// Squared Euclidean distance to another spot
    pub fn squared_distance_to(&self, other: &Spot) -> Result<f64> {
        let mut d2 = 0.0;
        for axis in [SpotFeature::PositionX, SpotFeature::PositionY, SpotFeature::PositionZ] {
            let dx = self.coordinate(axis)? - other.coordinate(axis)?;
            d2 += dx * dx;
        }
        Ok(d2)
    }

    /// Normalized absolute difference of one feature: `|a - b| / |(a + b) / 2|`
    ///
    /// Zero when both values are equal, growing with their relative disparity.
    /// Returns 0 when `a == -b`, which includes the `a == b == 0` case.
    pub fn normalized_diff_to(&self, other: &Spot, feature: SpotFeature) -> Result<f64> {
        let a = self.require_feature(feature)?;
        let b = other.require_feature(feature)?;
        if a == -b {
            return Ok(0.0);
        }
        Ok((a - b).abs() / ((a + b) / 2.0).abs())
    }
}

/// Ordered set of spots forming one candidate trajectory
#[derive(Debug, Clone, Default)]
pub struct TrackSegment {
    spots: Vec<Spot>,
    ids: HashSet<SpotId>,
}

impl TrackSegment {
    /// Build a segment, sorting by `POSITION_T` (ties by id) and dropping duplicate ids
    ///
    /// Spots without a time feature sort last; the cost builder rejects them
    /// when they end up as a segment start.
    pub fn new(spots: impl IntoIterator<Item = Spot>) -> Self {
        let mut ids = HashSet::new();
        let mut spots: Vec<Spot> = spots.into_iter().filter(|s| ids.insert(s.id)).collect();
        spots.sort_by(|a, b| {
            let ta = a.feature(SpotFeature::PositionT).unwrap_or(f64::INFINITY);
            let tb = b.feature(SpotFeature::PositionT).unwrap_or(f64::INFINITY);
            ta.total_cmp(&tb).then(a.id.cmp(&b.id))
        });
        Self { spots, ids }
    }

    /// Earliest spot of the segment
    pub fn start(&self) -> Option<&Spot> {
        self.spots.first()
    }

    pub fn contains(&self, spot: &Spot) -> bool {
        self.ids.contains(&spot.id)
    }

    pub fn len(&self) -> usize {
        self.spots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Spot> {
        self.spots.iter()
    }
}

impl FromIterator<Spot> for TrackSegment {
    fn from_iter<I: IntoIterator<Item = Spot>>(iter: I) -> Self {
        Self::new(iter)
    }
}
