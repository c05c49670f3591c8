//! Error types for the traffic transformations.
//!
//! This module defines a hierarchy of error types:
//!
//! - [`CsvError`] - CSV loading errors
//! - [`TransformError`] - errors raised by the six transformations
//! - [`ConfigError`] - configuration file errors
//! - [`PipelineError`] - top-level orchestration errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// CSV Loading Errors
// =============================================================================

/// Errors while loading a CSV file into a [`crate::Table`].
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to decode the file content.
    #[error("Failed to decode content as {encoding}: {message}")]
    EncodingError { encoding: String, message: String },

    /// Invalid CSV format.
    #[error("Line {line}: {message}")]
    ParseError { line: usize, message: String },

    /// Empty file.
    #[error("CSV file is empty")]
    EmptyFile,

    /// No headers found.
    #[error("No headers found in CSV")]
    NoHeaders,

    /// A cell that must be numeric is not.
    #[error("Line {line}, column '{column}' (value '{value}'): not a number")]
    InvalidCell {
        line: usize,
        column: String,
        value: String,
    },
}

impl From<csv::Error> for CsvError {
    fn from(err: csv::Error) -> Self {
        let line = err
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or_default();
        CsvError::ParseError {
            line,
            message: err.to_string(),
        }
    }
}

// =============================================================================
// Transformation Errors
// =============================================================================

/// Errors raised by the transformations in [`crate::transform`].
#[derive(Debug, Error)]
pub enum TransformError {
    /// Missing required column.
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// A numeric column holds a value that does not parse as a number.
    #[error("Row {row}, column '{column}': '{value}' is not a number")]
    InvalidNumber {
        row: usize,
        column: String,
        value: String,
    },

    /// A weekday or time-of-day field could not be turned into an instant.
    #[error("Row {row}, column '{column}': cannot parse '{value}' as {expected}")]
    Timestamp {
        row: usize,
        column: String,
        value: String,
        expected: &'static str,
    },

    /// Aggregate over zero rows.
    #[error("Column '{column}' has no values to aggregate")]
    EmptyInput { column: String },
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors while loading a [`crate::TransformConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error.
    #[error("Config IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON error.
    #[error("Config JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Values that cannot work together.
    #[error("Invalid config: {0}")]
    Invalid(String),
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline errors.
///
/// This is the error type returned by [`crate::run_all`] and
/// [`crate::run_all_files`]. It wraps all lower-level errors.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// CSV loading error.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    /// Transformation error.
    #[error("Transform error: {0}")]
    Transform(#[from] TransformError),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for CSV operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for transformation operations.
pub type TransformResult<T> = Result<T, TransformError>;

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        // CsvError -> PipelineError
        let csv_err = CsvError::EmptyFile;
        let pipeline_err: PipelineError = csv_err.into();
        assert!(pipeline_err.to_string().contains("empty"));

        // TransformError -> PipelineError
        let transform_err = TransformError::MissingColumn("car".into());
        let pipeline_err: PipelineError = transform_err.into();
        assert!(pipeline_err.to_string().contains("car"));
    }

    #[test]
    fn test_timestamp_error_format() {
        let err = TransformError::Timestamp {
            row: 3,
            column: "startDay".into(),
            value: "Moonday".into(),
            expected: "a weekday name",
        };
        let msg = err.to_string();
        assert!(msg.contains("Row 3"));
        assert!(msg.contains("startDay"));
        assert!(msg.contains("Moonday"));
    }

    #[test]
    fn test_invalid_cell_format() {
        let err = CsvError::InvalidCell {
            line: 5,
            column: "1001402".into(),
            value: "abc".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Line 5"));
        assert!(msg.contains("column '1001402'"));
        assert!(msg.contains("value 'abc'"));
    }
}
