//! Transformation module.
//!
//! One module per transformation, plus shared grouping helpers and the
//! pipeline that runs them all:
//! - car_matrix: `car` pivoted on (`id_1`, `id_2`)
//! - type_count: `car` values bucketed and counted
//! - outliers: rows with `bus` above a multiple of the mean
//! - routes: routes with mean `truck` above a threshold
//! - rescale: conditional elementwise matrix rescaling
//! - coverage: weekly coverage per (`id`, `id_2`)

pub mod car_matrix;
pub mod coverage;
pub mod grouper;
pub mod outliers;
pub mod pipeline;
pub mod rescale;
pub mod routes;
pub mod type_count;

pub use car_matrix::generate_car_matrix;
pub use coverage::{time_check, CoverageFlags, CoverageRule, GroupCoverage};
pub use outliers::{get_bus_indexes, OutlierRule};
pub use pipeline::{run_all, run_all_files, TrafficReport};
pub use rescale::{multiply_matrix, RescaleRule};
pub use routes::{filter_routes, RouteFilter};
pub use type_count::{get_type_count, CarBuckets, CarType};
