//! Route filter: routes whose mean `truck` value is above a threshold.

use serde::{Deserialize, Serialize};

use crate::error::TransformResult;
use crate::models::{IdLabel, Table};
use crate::transform::grouper::group_means;

pub const ROUTE: &str = "route";
pub const TRUCK: &str = "truck";

/// Keep routes with `mean(truck) > min_mean_truck`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteFilter {
    pub min_mean_truck: f64,
}

impl Default for RouteFilter {
    fn default() -> Self {
        Self {
            min_mean_truck: 7.0,
        }
    }
}

impl RouteFilter {
    /// Matching routes, ascending and without duplicates.
    /// Rows with an empty `route` cell belong to no group.
    pub fn apply(&self, table: &Table) -> TransformResult<Vec<IdLabel>> {
        table.require(&[ROUTE, TRUCK])?;

        let routes = table.label_column(ROUTE)?;
        let trucks = table.numeric_column(TRUCK)?;

        let means = group_means(
            routes
                .into_iter()
                .zip(trucks)
                .filter(|(route, _)| !matches!(route, IdLabel::Text(s) if s.is_empty())),
        );

        Ok(means
            .into_iter()
            .filter(|(_, mean)| *mean > self.min_mean_truck)
            .map(|(route, _)| route)
            .collect())
    }
}

/// Routes whose average `truck` value is greater than 7.
pub fn filter_routes(table: &Table) -> TransformResult<Vec<IdLabel>> {
    RouteFilter::default().apply(table)
}
