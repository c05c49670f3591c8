//! Run every transformation over the two traffic datasets.
//!
//! # Example
//!
//! ```rust,ignore
//! use traffic::{run_all_files, TransformConfig};
//!
//! let report = run_all_files("dataset-1.csv", "dataset-2.csv", &TransformConfig::default())?;
//! println!("{} routes above threshold", report.routes.len());
//! ```

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::config::TransformConfig;
use crate::error::PipelineResult;
use crate::logs::{log_info, log_info_indent, log_success, log_warning};
use crate::models::{IdLabel, LabeledMatrix, Table};
use crate::parser::{load_table, ParseResult};
use crate::transform::car_matrix::generate_car_matrix;
use crate::transform::coverage::CoverageFlags;
use crate::transform::type_count::CarType;

/// Results of every transformation.
#[derive(Debug, Clone, Serialize)]
pub struct TrafficReport {
    pub car_matrix: LabeledMatrix,
    /// The car matrix after conditional rescaling.
    pub rescaled_matrix: LabeledMatrix,
    pub type_count: BTreeMap<CarType, usize>,
    pub bus_indexes: Vec<usize>,
    pub routes: Vec<IdLabel>,
    pub coverage: CoverageFlags,
    /// Number of (`id`, `id_2`) pairs flagged incomplete.
    pub incomplete_pairs: usize,
}

/// Run all six transformations.
///
/// `traffic` carries `id_1`, `id_2`, `car`, `bus`, `truck`, `route`;
/// `intervals` carries `id`, `id_2`, `startDay`, `startTime`, `endDay`,
/// `endTime`.
pub fn run_all(
    traffic: &Table,
    intervals: &Table,
    config: &TransformConfig,
) -> PipelineResult<TrafficReport> {
    config.validate()?;

    log_info("🧮 Building car matrix...");
    let car_matrix = generate_car_matrix(traffic)?;
    let (rows, cols) = car_matrix.shape();
    log_success(format!("{}x{} matrix", rows, cols));

    log_info("📊 Counting car types...");
    let type_count = config.car_buckets.count(traffic)?;
    for (car_type, count) in &type_count {
        log_info_indent(format!("{}: {}", car_type, count), 1);
    }

    log_info("🚌 Finding bus outliers...");
    let bus_indexes = config.outliers.find(traffic)?;
    log_success(format!("{} rows above {}x mean", bus_indexes.len(), config.outliers.factor));

    log_info("🚚 Filtering routes...");
    let routes = config.routes.apply(traffic)?;
    log_success(format!(
        "{} routes with mean truck > {}",
        routes.len(),
        config.routes.min_mean_truck
    ));

    log_info("✖️  Rescaling car matrix...");
    let rescaled_matrix = config.rescale.apply(&car_matrix);

    log_info("🗓️  Checking weekly coverage...");
    let coverage = config.coverage.flags(intervals)?;
    let total_pairs: usize = coverage.values().map(BTreeMap::len).sum();
    let incomplete_pairs = coverage
        .values()
        .flat_map(BTreeMap::values)
        .filter(|incomplete| **incomplete)
        .count();
    if incomplete_pairs > 0 {
        log_warning(format!("{} of {} pairs incomplete", incomplete_pairs, total_pairs));
    } else {
        log_success(format!("All {} pairs cover a full week", total_pairs));
    }

    Ok(TrafficReport {
        car_matrix,
        rescaled_matrix,
        type_count,
        bus_indexes,
        routes,
        coverage,
        incomplete_pairs,
    })
}

/// Load both datasets from disk, then [`run_all`].
pub fn run_all_files(
    traffic_path: impl AsRef<Path>,
    intervals_path: impl AsRef<Path>,
    config: &TransformConfig,
) -> PipelineResult<TrafficReport> {
    let traffic = load_logged(traffic_path.as_ref())?;
    let intervals = load_logged(intervals_path.as_ref())?;
    run_all(&traffic.table, &intervals.table, config)
}

fn load_logged(path: &Path) -> PipelineResult<ParseResult> {
    log_info(format!("📖 Reading {}...", path.display()));
    let parsed = load_table(path)?;
    log_success(format!(
        "{} rows, {} columns (encoding {}, delimiter '{}')",
        parsed.table.len(),
        parsed.table.headers().len(),
        parsed.encoding,
        format_delimiter(parsed.delimiter)
    ));
    Ok(parsed)
}

/// Format delimiter for display
pub fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "\\t".to_string(),
        c => c.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{PipelineError, TransformError};

    fn traffic() -> Table {
        Table::from_records(
            &["id_1", "id_2", "route", "car", "bus", "truck"],
            &[
                &["1", "2", "10", "30", "0", "9"],
                &["2", "3", "10", "16", "1", "8"],
                &["3", "1", "11", "4", "11", "2"],
            ],
        )
    }

    fn intervals() -> Table {
        Table::from_records(
            &["id", "id_2", "startDay", "startTime", "endDay", "endTime"],
            &[&["7", "8", "Monday", "00:00:00", "Sunday", "23:59:59"]],
        )
    }

    #[test]
    fn test_run_all() {
        let report = run_all(&traffic(), &intervals(), &TransformConfig::default()).unwrap();

        assert_eq!(report.car_matrix.shape(), (3, 3));
        assert_eq!(report.rescaled_matrix.values[0][1], 22.5);
        assert_eq!(report.type_count[&CarType::High], 1);
        assert_eq!(report.type_count[&CarType::Medium], 1);
        assert_eq!(report.type_count[&CarType::Low], 1);
        assert_eq!(report.bus_indexes, vec![2]);
        assert_eq!(report.routes, vec![IdLabel::Int(10)]);
        assert_eq!(report.incomplete_pairs, 0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = TransformConfig::default();
        config.coverage.required_weekdays = 0;
        let err = run_all(&traffic(), &intervals(), &config).unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
    }

    #[test]
    fn test_transform_error_propagates() {
        let bad = Table::from_records(&["id_1"], &[&["1"]]);
        let err = run_all(&bad, &intervals(), &TransformConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Transform(TransformError::MissingColumn(_))
        ));
    }

    #[test]
    fn test_format_delimiter() {
        assert_eq!(format_delimiter('\t'), "\\t");
        assert_eq!(format_delimiter(';'), ";");
    }
}
