//! # Traffic - tabular transformations over vehicle-traffic CSV records
//!
//! Six independent transformations over loaded tables:
//!
//! | Function                 | Input                         | Output                        |
//! |--------------------------|-------------------------------|-------------------------------|
//! | [`generate_car_matrix`]  | `id_1`, `id_2`, `car`         | square [`LabeledMatrix`]      |
//! | [`get_type_count`]       | `car`                         | counts per [`CarType`]        |
//! | [`get_bus_indexes`]      | `bus`                         | outlier row indexes           |
//! | [`filter_routes`]        | `route`, `truck`              | routes above threshold        |
//! | [`multiply_matrix`]      | any [`LabeledMatrix`]         | rescaled matrix               |
//! | [`time_check`]           | `id`, `id_2`, day/time pairs  | [`CoverageFlags`]             |
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   CSV File  │────▶│   Parser    │────▶│  Transform  │────▶│ JSON / CSV  │
//! │  (ISO/UTF8) │     │  (auto-enc) │     │ (six ops)   │     │  (report)   │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! Every transformation is a pure function of its argument; loading is the
//! caller's job.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use traffic::{load_table, generate_car_matrix, multiply_matrix};
//!
//! let parsed = load_table("dataset-1.csv")?;
//! let matrix = generate_car_matrix(&parsed.table)?;
//! let rescaled = multiply_matrix(&matrix);
//! print!("{}", rescaled.to_csv_string()?);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Tables, labels and matrices
//! - [`parser`] - CSV loading with auto-detection
//! - [`transform`] - The six transformations and the pipeline
//! - [`config`] - Thresholds loaded from JSON
//! - [`logs`] - Logging helpers

// Core modules
pub mod error;
pub mod models;

// Parsing
pub mod parser;

// Transformation
pub mod transform;

// Configuration
pub mod config;

// Logging
pub mod logs;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    ConfigError, ConfigResult, CsvError, CsvResult, PipelineError, PipelineResult,
    TransformError, TransformResult,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{IdLabel, LabeledMatrix, Table};

// =============================================================================
// Re-exports - CSV Parsing
// =============================================================================

pub use parser::{
    decode_content, detect_delimiter, detect_encoding, load_matrix, load_table,
    parse_bytes_auto, parse_matrix, parse_table, ParseResult,
};

// =============================================================================
// Re-exports - Transformations
// =============================================================================

pub use transform::{
    filter_routes, generate_car_matrix, get_bus_indexes, get_type_count, multiply_matrix,
    time_check, CarBuckets, CarType, CoverageFlags, CoverageRule, GroupCoverage, OutlierRule,
    RescaleRule, RouteFilter,
};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::pipeline::{run_all, run_all_files, TrafficReport};

// =============================================================================
// Re-exports - Config
// =============================================================================

pub use config::TransformConfig;
