//! Final weighted ranking.
//!
//! The default objective weights are adjusted by specific user preferences,
//! renormalized to sum to 1, then applied as a weighted sum over normalized
//! objectives. Descending by score, ties broken by district name so a rerun
//! over identical inputs always yields the identical order.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::config::RankWeights;
use crate::scoring::objectives::ObjectiveVector;
use crate::types::{Constraints, PeakTimePreference, SubwayPreference, WeekdayPreference};

/// One ranked district.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub name: String,
    pub score: Decimal,
}

/// Preference-adjusted weights, before renormalization.
pub fn adjust_weights(defaults: &RankWeights, constraints: &Constraints) -> RankWeights {
    let mut weights = defaults.clone();

    match constraints.subway {
        SubwayPreference::Required => {
            weights.accessibility = dec!(0.25);
            weights.profitability = dec!(0.25);
        }
        SubwayPreference::Preferred => {
            weights.accessibility = dec!(0.20);
        }
        SubwayPreference::Any => {}
    }

    if constraints.peak_time == PeakTimePreference::Morning {
        weights.morning_share = dec!(0.20);
        weights.network_efficiency = dec!(0.10);
    }

    if constraints.weekday == WeekdayPreference::Weekday {
        weights.weekday_share = dec!(0.20);
        weights.morning_share = dec!(0.05);
    }

    weights
}

/// Score candidates with the adjusted, renormalized weights and sort them.
pub fn rank_candidates(
    candidates: &[String],
    normalized: &BTreeMap<String, ObjectiveVector>,
    defaults: &RankWeights,
    constraints: &Constraints,
) -> Vec<RankedCandidate> {
    let weights = adjust_weights(defaults, constraints).normalized();

    let mut ranked: Vec<RankedCandidate> = candidates
        .iter()
        .filter_map(|name| {
            normalized.get(name).map(|vector| RankedCandidate {
                name: name.clone(),
                score: weighted_score(vector, &weights),
            })
        })
        .collect();

    ranked.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.name.cmp(&b.name)));
    ranked
}

fn weighted_score(vector: &ObjectiveVector, weights: &RankWeights) -> Decimal {
    vector.profitability * weights.profitability
        + vector.stability * weights.stability
        + vector.accessibility * weights.accessibility
        + vector.network_efficiency * weights.network_efficiency
        + vector.morning_share * weights.morning_share
        + vector.weekday_share * weights.weekday_share
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn vector(profitability: Decimal, accessibility: Decimal) -> ObjectiveVector {
        ObjectiveVector {
            profitability,
            stability: dec!(0.5),
            accessibility,
            network_efficiency: dec!(0.5),
            morning_share: dec!(0.5),
            weekday_share: dec!(0.5),
        }
    }

    #[test]
    fn higher_weighted_sum_ranks_first() {
        let mut normalized = BTreeMap::new();
        normalized.insert("low".to_string(), vector(dec!(0.2), dec!(0.2)));
        normalized.insert("high".to_string(), vector(dec!(0.9), dec!(0.9)));
        let candidates = vec!["low".to_string(), "high".to_string()];

        let ranked = rank_candidates(
            &candidates,
            &normalized,
            &RankWeights::default(),
            &Constraints::default(),
        );
        assert_eq!(ranked[0].name, "high");
        assert!(ranked[0].score > ranked[1].score);
    }

    #[test]
    fn ties_break_by_name_ascending() {
        let mut normalized = BTreeMap::new();
        normalized.insert("zeta".to_string(), vector(dec!(0.5), dec!(0.5)));
        normalized.insert("alpha".to_string(), vector(dec!(0.5), dec!(0.5)));
        let candidates = vec!["zeta".to_string(), "alpha".to_string()];

        let ranked = rank_candidates(
            &candidates,
            &normalized,
            &RankWeights::default(),
            &Constraints::default(),
        );
        assert_eq!(ranked[0].name, "alpha");
        assert_eq!(ranked[1].name, "zeta");
    }

    #[test]
    fn subway_requirement_boosts_accessibility_weight() {
        let mut normalized = BTreeMap::new();
        normalized.insert("accessible".to_string(), vector(dec!(0.4), dec!(0.9)));
        normalized.insert("profitable".to_string(), vector(dec!(0.6), dec!(0.1)));
        let candidates = vec!["accessible".to_string(), "profitable".to_string()];

        let plain = rank_candidates(
            &candidates,
            &normalized,
            &RankWeights::default(),
            &Constraints::default(),
        );
        let subway = rank_candidates(
            &candidates,
            &normalized,
            &RankWeights::default(),
            &Constraints {
                subway: SubwayPreference::Required,
                ..Constraints::default()
            },
        );
        // The accessibility gap counts for more under the subway preference.
        let plain_gap = plain
            .iter()
            .find(|c| c.name == "accessible")
            .map(|c| c.score)
            .unwrap()
            - plain
                .iter()
                .find(|c| c.name == "profitable")
                .map(|c| c.score)
                .unwrap();
        let subway_gap = subway
            .iter()
            .find(|c| c.name == "accessible")
            .map(|c| c.score)
            .unwrap()
            - subway
                .iter()
                .find(|c| c.name == "profitable")
                .map(|c| c.score)
                .unwrap();
        assert!(subway_gap > plain_gap);
    }

    #[test]
    fn adjusted_weights_renormalize_to_one() {
        let constraints = Constraints {
            subway: SubwayPreference::Required,
            peak_time: PeakTimePreference::Morning,
            ..Constraints::default()
        };
        let weights = adjust_weights(&RankWeights::default(), &constraints).normalized();
        assert!((weights.total() - Decimal::ONE).abs() < dec!(0.0000001));
    }

    #[test]
    fn unknown_candidate_names_are_dropped() {
        let normalized = BTreeMap::new();
        let candidates = vec!["ghost".to_string()];
        let ranked = rank_candidates(
            &candidates,
            &normalized,
            &RankWeights::default(),
            &Constraints::default(),
        );
        assert!(ranked.is_empty());
    }
}
