//! Thresholds for every transformation, loadable from JSON.
//!
//! Every field has a default, so a config file only needs the values it
//! changes:
//!
//! ```json
//! { "routes": { "min_mean_truck": 9.5 } }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ConfigError, ConfigResult};
use crate::transform::rescale::MAX_DECIMALS;
use crate::transform::{CarBuckets, CoverageRule, OutlierRule, RescaleRule, RouteFilter};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    pub car_buckets: CarBuckets,
    pub outliers: OutlierRule,
    pub routes: RouteFilter,
    pub rescale: RescaleRule,
    pub coverage: CoverageRule,
}

impl TransformConfig {
    /// Parse and validate a config from a JSON string
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a config file
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the transformations cannot work with.
    pub fn validate(&self) -> ConfigResult<()> {
        let finite = [
            ("car_buckets.medium_from", self.car_buckets.medium_from),
            ("car_buckets.high_from", self.car_buckets.high_from),
            ("outliers.factor", self.outliers.factor),
            ("routes.min_mean_truck", self.routes.min_mean_truck),
            ("rescale.threshold", self.rescale.threshold),
            ("rescale.above_factor", self.rescale.above_factor),
            ("rescale.below_factor", self.rescale.below_factor),
        ];
        if let Some((name, value)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::Invalid(format!("{} must be finite, got {}", name, value)));
        }

        if self.car_buckets.high_from <= self.car_buckets.medium_from {
            return Err(ConfigError::Invalid(format!(
                "car_buckets.high_from ({}) must be greater than medium_from ({})",
                self.car_buckets.high_from, self.car_buckets.medium_from
            )));
        }

        if self.rescale.decimals > MAX_DECIMALS {
            return Err(ConfigError::Invalid(format!(
                "rescale.decimals must be at most {}, got {}",
                MAX_DECIMALS, self.rescale.decimals
            )));
        }

        if !(1..=7).contains(&self.coverage.required_weekdays) {
            return Err(ConfigError::Invalid(format!(
                "coverage.required_weekdays must be between 1 and 7, got {}",
                self.coverage.required_weekdays
            )));
        }

        if self.coverage.min_duration_secs < 0 {
            return Err(ConfigError::Invalid(
                "coverage.min_duration_secs must not be negative".to_string(),
            ));
        }

        Ok(())
    }
}
