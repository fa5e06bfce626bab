//! Pareto-optimal filtering over normalized objective vectors.

use std::collections::BTreeMap;

use crate::scoring::objectives::{Objective, ObjectiveVector};

/// Whether `a` dominates `b`: at least as good on every dominance objective
/// and strictly better on at least one. `with_flow` controls whether
/// network efficiency participates; objectives outside the dominance set
/// never do.
pub fn dominates(a: &ObjectiveVector, b: &ObjectiveVector, with_flow: bool) -> bool {
    let mut better_in_any = false;
    for objective in Objective::DOMINANCE {
        if objective == Objective::NetworkEfficiency && !with_flow {
            continue;
        }
        if a.get(objective) < b.get(objective) {
            return false;
        }
        if a.get(objective) > b.get(objective) {
            better_in_any = true;
        }
    }
    better_in_any
}

/// Names of all non-dominated candidates. Output order follows the map
/// order; the ranker imposes the final ordering.
pub fn pareto_front(
    vectors: &BTreeMap<String, ObjectiveVector>,
    with_flow: bool,
) -> Vec<String> {
    vectors
        .iter()
        .filter(|(name, vector)| {
            !vectors
                .iter()
                .any(|(other, candidate)| other != *name && dominates(candidate, vector, with_flow))
        })
        .map(|(name, _)| name.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn vector(p: rust_decimal::Decimal, s: rust_decimal::Decimal) -> ObjectiveVector {
        ObjectiveVector {
            profitability: p,
            stability: s,
            accessibility: dec!(0.5),
            network_efficiency: dec!(0.5),
            ..ObjectiveVector::default()
        }
    }

    #[test]
    fn strictly_better_candidate_dominates() {
        let strong = vector(dec!(0.9), dec!(0.9));
        let weak = vector(dec!(0.4), dec!(0.4));
        assert!(dominates(&strong, &weak, true));
        assert!(!dominates(&weak, &strong, true));
    }

    #[test]
    fn equal_vectors_do_not_dominate() {
        let a = vector(dec!(0.5), dec!(0.5));
        assert!(!dominates(&a, &a.clone(), true));
    }

    #[test]
    fn trade_offs_survive_the_front() {
        let mut vectors = BTreeMap::new();
        vectors.insert("profit-heavy".to_string(), vector(dec!(0.9), dec!(0.2)));
        vectors.insert("stable".to_string(), vector(dec!(0.2), dec!(0.9)));
        vectors.insert("dominated".to_string(), vector(dec!(0.1), dec!(0.1)));

        let front = pareto_front(&vectors, true);
        assert_eq!(front, vec!["profit-heavy".to_string(), "stable".to_string()]);
    }

    #[test]
    fn no_pair_in_the_front_dominates_the_other() {
        let mut vectors = BTreeMap::new();
        vectors.insert("a".to_string(), vector(dec!(0.8), dec!(0.3)));
        vectors.insert("b".to_string(), vector(dec!(0.6), dec!(0.6)));
        vectors.insert("c".to_string(), vector(dec!(0.3), dec!(0.8)));
        vectors.insert("d".to_string(), vector(dec!(0.2), dec!(0.2)));

        let front = pareto_front(&vectors, true);
        for x in &front {
            for y in &front {
                if x != y {
                    assert!(!dominates(&vectors[x], &vectors[y], true));
                }
            }
        }
    }

    #[test]
    fn efficiency_is_ignored_without_flow_analysis() {
        let mut better_efficiency = vector(dec!(0.5), dec!(0.5));
        better_efficiency.network_efficiency = dec!(0.9);
        let worse_efficiency = vector(dec!(0.5), dec!(0.5));

        assert!(dominates(&better_efficiency, &worse_efficiency, true));
        assert!(!dominates(&better_efficiency, &worse_efficiency, false));
    }

    #[test]
    fn ranking_only_objectives_never_affect_dominance() {
        let mut high_morning = vector(dec!(0.5), dec!(0.5));
        high_morning.morning_share = dec!(0.9);
        let low_morning = vector(dec!(0.5), dec!(0.5));

        assert!(!dominates(&high_morning, &low_morning, true));
    }
}
