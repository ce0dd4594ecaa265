//! Congestion model: live crowding values per path and their aggregate
//! service level over the checkpoint paths.

use std::collections::HashSet;
use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::models::{LocationId, Path, MAX_CONGESTION, MIN_CONGESTION};

/// Source of congestion readings.
///
/// The production source is random; a telemetry feed can replace it
/// without changing callers. Readings are clamped into the valid range by
/// [`set_random_congestion`].
pub trait CongestionSource {
    fn next_reading(&mut self) -> i32;
}

/// Uniform random readings in `[MIN_CONGESTION, MAX_CONGESTION]`.
pub struct RandomCongestion {
    rng: StdRng,
}

impl RandomCongestion {
    /// If seed is 0, uses entropy; otherwise readings are reproducible.
    pub fn new(seed: u64) -> Self {
        let rng = if seed == 0 {
            StdRng::from_entropy()
        } else {
            StdRng::seed_from_u64(seed)
        };
        Self { rng }
    }
}

impl Default for RandomCongestion {
    fn default() -> Self {
        Self::new(0)
    }
}

impl CongestionSource for RandomCongestion {
    fn next_reading(&mut self) -> i32 {
        self.rng.gen_range(MIN_CONGESTION..=MAX_CONGESTION)
    }
}

/// Replays a fixed list of readings, cycling when exhausted.
#[derive(Debug, Clone)]
pub struct FixedSequence {
    readings: Vec<i32>,
    cursor: usize,
}

impl FixedSequence {
    pub fn new(readings: Vec<i32>) -> Self {
        Self {
            readings,
            cursor: 0,
        }
    }
}

impl CongestionSource for FixedSequence {
    fn next_reading(&mut self) -> i32 {
        if self.readings.is_empty() {
            return MIN_CONGESTION;
        }
        let reading = self.readings[self.cursor % self.readings.len()];
        self.cursor += 1;
        reading
    }
}

/// Assign a fresh reading to every path, in order.
pub fn set_random_congestion(
    mut paths: Vec<Path>,
    source: &mut dyn CongestionSource,
) -> Vec<Path> {
    for path in &mut paths {
        path.congestion = source
            .next_reading()
            .clamp(MIN_CONGESTION, MAX_CONGESTION);
    }
    paths
}

/// Discrete service level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CongestionLevel {
    Low,
    Medium,
    High,
}

impl CongestionLevel {
    /// Bands are inclusive on their upper bound: `<= 3`, `<= 6`, above.
    pub fn from_value(value: f64) -> Self {
        if value <= 3.0 {
            Self::Low
        } else if value <= 6.0 {
            Self::Medium
        } else {
            Self::High
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl fmt::Display for CongestionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregate congestion over a subset of paths.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CongestionSnapshot {
    pub level: CongestionLevel,
    pub value: f64,
}

/// Mean congestion of `paths`, `0.0` (Low) when empty.
pub fn aggregate_congestion<'a, I>(paths: I) -> CongestionSnapshot
where
    I: IntoIterator<Item = &'a Path>,
{
    let (sum, count) = paths
        .into_iter()
        .fold((0i64, 0usize), |(sum, count), path| {
            (sum + i64::from(path.congestion), count + 1)
        });

    let value = if count == 0 {
        0.0
    } else {
        sum as f64 / count as f64
    };

    CongestionSnapshot {
        level: CongestionLevel::from_value(value),
        value,
    }
}

/// Locations whose inbound paths define the reported congestion level
/// (security and check-in nodes in a typical layout).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckpointSet {
    ids: HashSet<LocationId>,
}

impl CheckpointSet {
    pub fn new<I>(ids: I) -> Self
    where
        I: IntoIterator<Item = LocationId>,
    {
        Self {
            ids: ids.into_iter().collect(),
        }
    }

    pub fn contains(&self, id: LocationId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Paths terminating at a checkpoint.
    pub fn select<'a>(&'a self, paths: &'a [Path]) -> impl Iterator<Item = &'a Path> + 'a {
        paths
            .iter()
            .filter(move |path| self.contains(path.destination_id))
    }
}

impl FromIterator<i64> for CheckpointSet {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(LocationId::new))
    }
}
