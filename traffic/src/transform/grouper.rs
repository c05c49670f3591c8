//! Ordered group-by helpers shared by the transformations.
//!
//! Groups are keyed in a `BTreeMap`, so iteration is always in ascending key
//! order and results come out sorted without an extra pass.

use std::collections::BTreeMap;

use crate::error::{TransformError, TransformResult};

/// Row positions per key. Positions keep their input order within a group.
pub fn group_positions<K, I>(keys: I) -> BTreeMap<K, Vec<usize>>
where
    K: Ord,
    I: IntoIterator<Item = K>,
{
    let mut groups: BTreeMap<K, Vec<usize>> = BTreeMap::new();
    for (pos, key) in keys.into_iter().enumerate() {
        groups.entry(key).or_default().push(pos);
    }
    groups
}

/// Arithmetic mean, skipping NaN. `None` when nothing is left.
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Mean of a named column, or `EmptyInput` if it has no values.
pub fn column_mean(values: &[f64], column: &str) -> TransformResult<f64> {
    mean(values.iter().copied()).ok_or_else(|| TransformError::EmptyInput {
        column: column.to_string(),
    })
}

/// Mean value per key. NaN values are skipped; a key whose values are all
/// NaN maps to NaN.
pub fn group_means<K, I>(pairs: I) -> BTreeMap<K, f64>
where
    K: Ord,
    I: IntoIterator<Item = (K, f64)>,
{
    let mut acc: BTreeMap<K, (f64, usize)> = BTreeMap::new();
    for (key, value) in pairs {
        let slot = acc.entry(key).or_insert((0.0, 0));
        if !value.is_nan() {
            slot.0 += value;
            slot.1 += 1;
        }
    }

    acc.into_iter()
        .map(|(key, (sum, count))| {
            let m = if count == 0 { f64::NAN } else { sum / count as f64 };
            (key, m)
        })
        .collect()
}
