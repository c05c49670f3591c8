//! Conditional rescaling of matrix cells.
//!
//! | value                 | result          |
//! |-----------------------|-----------------|
//! | `v > 20`              | `v * 0.75`      |
//! | `0 <= v <= 20`        | `v * 1.25`      |
//! | negative or NaN       | unchanged       |
//!
//! Every cell is then rounded to one decimal.

use serde::{Deserialize, Serialize};

use crate::models::LabeledMatrix;

/// Most decimals an `f64` cell can meaningfully be rounded to.
pub const MAX_DECIMALS: u32 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RescaleRule {
    pub threshold: f64,
    pub above_factor: f64,
    pub below_factor: f64,
    pub decimals: u32,
}

impl Default for RescaleRule {
    fn default() -> Self {
        Self {
            threshold: 20.0,
            above_factor: 0.75,
            below_factor: 1.25,
            decimals: 1,
        }
    }
}

impl RescaleRule {
    /// Rescale and round one value.
    pub fn rescale(&self, value: f64) -> f64 {
        let scaled = if value > self.threshold {
            value * self.above_factor
        } else if (0.0..=self.threshold).contains(&value) {
            value * self.below_factor
        } else {
            value
        };
        round_to(scaled, self.decimals)
    }

    /// New matrix with every cell rescaled; labels and shape are kept.
    pub fn apply(&self, matrix: &LabeledMatrix) -> LabeledMatrix {
        matrix.map(|v| self.rescale(v))
    }
}

/// Round half to even at `decimals` places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals.min(MAX_DECIMALS) as i32);
    (value * scale).round_ties_even() / scale
}

/// Rescale a matrix with the default rule (0.75 above 20, 1.25 in `[0, 20]`).
pub fn multiply_matrix(matrix: &LabeledMatrix) -> LabeledMatrix {
    RescaleRule::default().apply(matrix)
}
