//! Domain models shared by the transformations.
//!
//! - [`IdLabel`] - an identifier used as an axis label or group key
//! - [`Table`] - rows of named string cells, as loaded from CSV
//! - [`LabeledMatrix`] - a numeric matrix with labeled rows and columns

use serde::{Serialize, Serializer};
use std::fmt;
use std::io::Write;

use crate::error::{CsvResult, TransformError, TransformResult};

// =============================================================================
// Identifier Label
// =============================================================================

/// Identifier cell value (`id_1`, `id_2`, `id`, `route`, ...).
///
/// Integers sort numerically and come before any text label, so a set of
/// numeric identifiers orders the way a pivot over integer keys would.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IdLabel {
    /// Identifier that parses as an integer.
    Int(i64),
    /// Any other identifier.
    Text(String),
}

impl IdLabel {
    /// Parse a trimmed cell value.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<i64>() {
            Ok(n) => IdLabel::Int(n),
            Err(_) => IdLabel::Text(trimmed.to_string()),
        }
    }
}

impl From<&str> for IdLabel {
    fn from(raw: &str) -> Self {
        IdLabel::parse(raw)
    }
}

impl fmt::Display for IdLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdLabel::Int(n) => write!(f, "{}", n),
            IdLabel::Text(s) => f.write_str(s),
        }
    }
}

// Plain scalar so labels can also be JSON object keys.
impl Serialize for IdLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            IdLabel::Int(n) => serializer.serialize_i64(*n),
            IdLabel::Text(s) => serializer.serialize_str(s),
        }
    }
}

// =============================================================================
// Table
// =============================================================================

/// A loaded CSV table: named columns and string cells.
///
/// Row indexes reported by the transformations are row positions, starting
/// at 0 for the first data row.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Build a table. Short rows are padded with empty cells and long rows
    /// are truncated to the header width.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let rows: Vec<Vec<String>> = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { headers, rows }
    }

    /// Convenience constructor from string slices.
    pub fn from_records(headers: &[&str], rows: &[&[&str]]) -> Self {
        Self::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Rows in load order, each exactly as wide as the header.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column, or `MissingColumn`.
    pub fn column_position(&self, name: &str) -> TransformResult<usize> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| TransformError::MissingColumn(name.to_string()))
    }

    /// Check that every named column exists before any row is touched.
    pub fn require(&self, names: &[&str]) -> TransformResult<()> {
        for name in names {
            self.column_position(name)?;
        }
        Ok(())
    }

    /// Raw cells of one column.
    pub fn column(&self, name: &str) -> TransformResult<Vec<&str>> {
        let pos = self.column_position(name)?;
        Ok(self.rows.iter().map(|r| r[pos].as_str()).collect())
    }

    /// Cells of one column parsed as `f64`.
    pub fn numeric_column(&self, name: &str) -> TransformResult<Vec<f64>> {
        let pos = self.column_position(name)?;
        self.rows
            .iter()
            .enumerate()
            .map(|(idx, row)| {
                let raw = row[pos].trim();
                raw.parse::<f64>().map_err(|_| TransformError::InvalidNumber {
                    row: idx,
                    column: name.to_string(),
                    value: raw.to_string(),
                })
            })
            .collect()
    }

    /// Like [`Table::numeric_column`], but `NaN` and infinities are
    /// rejected too.
    pub fn finite_column(&self, name: &str) -> TransformResult<Vec<f64>> {
        let values = self.numeric_column(name)?;
        if let Some(idx) = values.iter().position(|v| !v.is_finite()) {
            let pos = self.column_position(name)?;
            return Err(TransformError::InvalidNumber {
                row: idx,
                column: name.to_string(),
                value: self.rows[idx][pos].trim().to_string(),
            });
        }
        Ok(values)
    }

    /// Cells of one column parsed as identifier labels.
    pub fn label_column(&self, name: &str) -> TransformResult<Vec<IdLabel>> {
        Ok(self.column(name)?.into_iter().map(IdLabel::parse).collect())
    }
}

// =============================================================================
// Labeled Matrix
// =============================================================================

/// Numeric matrix with labeled axes.
///
/// `values[i][j]` is the cell at row label `rows[i]` and column label
/// `columns[j]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabeledMatrix {
    /// Name of the row axis, written as the first CSV header cell.
    pub index_name: String,
    pub rows: Vec<IdLabel>,
    pub columns: Vec<IdLabel>,
    pub values: Vec<Vec<f64>>,
}

impl LabeledMatrix {
    /// All-zero matrix over the given axes.
    pub fn zeros(index_name: impl Into<String>, rows: Vec<IdLabel>, columns: Vec<IdLabel>) -> Self {
        let values = vec![vec![0.0; columns.len()]; rows.len()];
        Self {
            index_name: index_name.into(),
            rows,
            columns,
            values,
        }
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.columns.len())
    }

    /// Cell by labels.
    pub fn get(&self, row: &IdLabel, column: &IdLabel) -> Option<f64> {
        let i = self.rows.iter().position(|r| r == row)?;
        let j = self.columns.iter().position(|c| c == column)?;
        Some(self.values[i][j])
    }

    /// Apply `f` to every cell, keeping labels and shape.
    pub fn map<F>(&self, f: F) -> Self
    where
        F: Fn(f64) -> f64,
    {
        Self {
            index_name: self.index_name.clone(),
            rows: self.rows.clone(),
            columns: self.columns.clone(),
            values: self
                .values
                .iter()
                .map(|row| row.iter().map(|&v| f(v)).collect())
                .collect(),
        }
    }

    /// Write as CSV: header `index_name,col...`, then `row_label,values...`.
    pub fn write_csv<W: Write>(&self, writer: W) -> CsvResult<()> {
        let mut wtr = csv::Writer::from_writer(writer);

        let mut header = Vec::with_capacity(self.columns.len() + 1);
        header.push(self.index_name.clone());
        header.extend(self.columns.iter().map(|c| c.to_string()));
        wtr.write_record(&header)?;

        for (label, row) in self.rows.iter().zip(&self.values) {
            let mut record = Vec::with_capacity(row.len() + 1);
            record.push(label.to_string());
            record.extend(row.iter().map(|v| v.to_string()));
            wtr.write_record(&record)?;
        }

        wtr.flush()?;
        Ok(())
    }

    /// CSV rendering as a string.
    pub fn to_csv_string(&self) -> CsvResult<String> {
        let mut buf = Vec::new();
        self.write_csv(&mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}
