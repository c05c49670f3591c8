//! Car type counts: `car` values bucketed into `low`, `medium` and `high`.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::TransformResult;
use crate::models::Table;

pub const CAR: &str = "car";

/// Car volume category.
///
/// Orders by label text (`high` < `low` < `medium`), which is the order the
/// counts are reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CarType {
    Low,
    Medium,
    High,
}

impl CarType {
    pub const ALL: [CarType; 3] = [CarType::Low, CarType::Medium, CarType::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            CarType::Low => "low",
            CarType::Medium => "medium",
            CarType::High => "high",
        }
    }
}

impl Ord for CarType {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl PartialOrd for CarType {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for CarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Half-open bucket bounds: `[-inf, medium_from)` low,
/// `[medium_from, high_from)` medium, `[high_from, inf)` high.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarBuckets {
    pub medium_from: f64,
    pub high_from: f64,
}

impl Default for CarBuckets {
    fn default() -> Self {
        Self {
            medium_from: 15.0,
            high_from: 25.0,
        }
    }
}

impl CarBuckets {
    /// Bucket for one value.
    pub fn classify(&self, car: f64) -> CarType {
        if car < self.medium_from {
            CarType::Low
        } else if car < self.high_from {
            CarType::Medium
        } else {
            CarType::High
        }
    }

    /// Count rows per bucket. All three buckets are always present.
    pub fn count(&self, table: &Table) -> TransformResult<BTreeMap<CarType, usize>> {
        let cars = table.finite_column(CAR)?;

        let mut counts: BTreeMap<CarType, usize> =
            CarType::ALL.iter().map(|t| (*t, 0)).collect();

        for car in cars {
            *counts.entry(self.classify(car)).or_default() += 1;
        }

        Ok(counts)
    }
}

/// Count `car` values per type with the default bounds (15 and 25).
pub fn get_type_count(table: &Table) -> TransformResult<BTreeMap<CarType, usize>> {
    CarBuckets::default().count(table)
}
