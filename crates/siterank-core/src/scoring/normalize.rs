//! Min-max normalization of objective vectors across the candidate set.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::scoring::objectives::{Objective, ObjectiveVector};

/// Rescale every objective independently into [0, 1] via
/// `(value − min) / (max − min)`. When every district ties on a key
/// (`max == min`) each gets 0.5: no discriminating information, no division
/// by zero. Raw vectors are left untouched; a new map is returned.
pub fn normalize_objectives(
    raw: &BTreeMap<String, ObjectiveVector>,
) -> BTreeMap<String, ObjectiveVector> {
    if raw.is_empty() {
        return BTreeMap::new();
    }

    let mut normalized: BTreeMap<String, ObjectiveVector> = raw
        .keys()
        .map(|name| (name.clone(), ObjectiveVector::default()))
        .collect();

    for objective in Objective::ALL {
        let mut min = Decimal::MAX;
        let mut max = Decimal::MIN;
        for vector in raw.values() {
            let value = vector.get(objective);
            min = min.min(value);
            max = max.max(value);
        }

        for (name, vector) in raw {
            let value = if max > min {
                (vector.get(objective) - min) / (max - min)
            } else {
                dec!(0.5)
            };
            normalized
                .get_mut(name)
                .expect("normalized map mirrors raw map")
                .set(objective, value);
        }
    }

    normalized
}
