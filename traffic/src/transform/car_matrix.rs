//! Car count matrix: `car` values pivoted on (`id_1`, `id_2`).
//!
//! ```text
//! id_1  id_2  car           id_1 │ 1     2     3
//! 1     2     9.7     →     ─────┼─────────────────
//! 2     3     20.2          1    │ 0     9.7   0
//! 3     1     5.0           2    │ 0     0     20.2
//!                           3    │ 5.0   0     0
//! ```
//!
//! Both axes are the sorted union of every `id_1` and `id_2` value, so the
//! matrix is square and the diagonal is where the row label equals the
//! column label.

use std::collections::{BTreeSet, HashMap};

use crate::error::TransformResult;
use crate::logs::{log_info, log_warning};
use crate::models::{IdLabel, LabeledMatrix, Table};
use crate::transform::grouper::group_means;

pub const SOURCE_ID: &str = "id_1";
pub const TARGET_ID: &str = "id_2";
pub const CAR: &str = "car";

/// Build the car matrix from rows carrying `id_1`, `id_2` and `car`.
///
/// Rows repeating the same (`id_1`, `id_2`) pair contribute their mean.
/// Pairs never observed stay 0, and every cell whose row and column labels
/// match is forced to 0. A `car` value that is not a finite number is an
/// error, as in [`crate::transform::get_type_count`].
pub fn generate_car_matrix(table: &Table) -> TransformResult<LabeledMatrix> {
    table.require(&[SOURCE_ID, TARGET_ID, CAR])?;

    let sources = table.label_column(SOURCE_ID)?;
    let targets = table.label_column(TARGET_ID)?;
    let cars = table.finite_column(CAR)?;

    let source_set: BTreeSet<&IdLabel> = sources.iter().collect();
    let target_set: BTreeSet<&IdLabel> = targets.iter().collect();
    if source_set != target_set {
        log_warning(format!(
            "{} and {} hold different identifiers ({} vs {}); using their union on both axes",
            SOURCE_ID,
            TARGET_ID,
            source_set.len(),
            target_set.len()
        ));
    }

    let axis: Vec<IdLabel> = source_set
        .union(&target_set)
        .map(|label| (*label).clone())
        .collect();
    let position: HashMap<&IdLabel, usize> =
        axis.iter().enumerate().map(|(i, label)| (label, i)).collect();

    let cells = group_means(sources.iter().zip(&targets).zip(cars));

    let mut matrix = LabeledMatrix::zeros(SOURCE_ID, axis.clone(), axis.clone());
    for ((from, to), car) in cells {
        matrix.values[position[from]][position[to]] = car;
    }

    zero_diagonal(&mut matrix);

    log_info(format!(
        "Car matrix: {} identifiers, {} rows",
        axis.len(),
        table.len()
    ));
    Ok(matrix)
}

/// Zero every cell whose row label equals its column label.
fn zero_diagonal(matrix: &mut LabeledMatrix) {
    for (i, row_label) in matrix.rows.iter().enumerate() {
        if let Some(j) = matrix.columns.iter().position(|c| c == row_label) {
            matrix.values[i][j] = 0.0;
        }
    }
}
