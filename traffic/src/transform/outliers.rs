//! Bus outliers: rows whose `bus` value exceeds a multiple of the column mean.

use serde::{Deserialize, Serialize};

use crate::error::{TransformError, TransformResult};
use crate::models::Table;
use crate::transform::grouper::column_mean;

pub const BUS: &str = "bus";

/// Threshold rule: `bus > factor * mean(bus)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlierRule {
    pub factor: f64,
}

impl Default for OutlierRule {
    fn default() -> Self {
        Self { factor: 2.0 }
    }
}

impl OutlierRule {
    /// Row positions of the outliers, ascending.
    ///
    /// The mean covers every row, outliers included. A table with no rows
    /// has no mean and yields an empty list.
    pub fn find(&self, table: &Table) -> TransformResult<Vec<usize>> {
        let buses = table.numeric_column(BUS)?;

        let mean = match column_mean(&buses, BUS) {
            Ok(mean) => mean,
            Err(TransformError::EmptyInput { .. }) => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };
        let threshold = self.factor * mean;

        Ok(buses
            .iter()
            .enumerate()
            .filter(|&(_, &bus)| bus > threshold)
            .map(|(idx, _)| idx)
            .collect())
    }
}

/// Indexes of rows whose `bus` value is more than twice the mean.
pub fn get_bus_indexes(table: &Table) -> TransformResult<Vec<usize>> {
    OutlierRule::default().find(table)
}
