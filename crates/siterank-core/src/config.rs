//! Immutable configuration for the scoring pipeline.
//!
//! Covers:
//! 1. **RankWeights** -- default objective weights the ranker adjusts.
//! 2. **FilterCriteria** -- thresholds behind the constraint filter chain.
//! 3. **ScoringConfig** -- ideal reference values and pipeline knobs.
//! 4. **HeuristicProfile** -- versioned capacity heuristics for the flow
//!    network builder; each legacy estimation variant is one named profile.
//!
//! All of it is plain serde data passed by reference into the components.
//! No module-level mutable state.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Fraction, Money, Percent, Score};

// ---------------------------------------------------------------------------
// Ranking weights
// ---------------------------------------------------------------------------

/// Weight per objective in the final weighted sum. Not required to sum to 1;
/// the ranker renormalizes after preference adjustment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankWeights {
    pub profitability: Decimal,
    pub stability: Decimal,
    pub accessibility: Decimal,
    pub network_efficiency: Decimal,
    pub morning_share: Decimal,
    pub weekday_share: Decimal,
}

impl Default for RankWeights {
    fn default() -> Self {
        RankWeights {
            profitability: dec!(0.30),
            stability: dec!(0.20),
            accessibility: dec!(0.15),
            network_efficiency: dec!(0.15),
            morning_share: dec!(0.10),
            weekday_share: dec!(0.10),
        }
    }
}

impl RankWeights {
    pub fn total(&self) -> Decimal {
        self.profitability
            + self.stability
            + self.accessibility
            + self.network_efficiency
            + self.morning_share
            + self.weekday_share
    }

    /// Rescale so the weights sum to 1. A zero total is left untouched.
    pub fn normalized(&self) -> RankWeights {
        let total = self.total();
        if total <= Decimal::ZERO {
            return self.clone();
        }
        RankWeights {
            profitability: self.profitability / total,
            stability: self.stability / total,
            accessibility: self.accessibility / total,
            network_efficiency: self.network_efficiency / total,
            morning_share: self.morning_share / total,
            weekday_share: self.weekday_share / total,
        }
    }
}

// ---------------------------------------------------------------------------
// Filter thresholds
// ---------------------------------------------------------------------------

/// Inclusive competitor-count bucket.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CountBucket {
    pub min: u32,
    pub max: u32,
}

impl CountBucket {
    pub fn contains(&self, count: u32) -> bool {
        self.min <= count && count <= self.max
    }
}

/// Thresholds behind the constraint filter chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub blue_ocean: CountBucket,
    pub moderate: CountBucket,
    pub competitive: CountBucket,
    /// Price-bucket upper bounds, ascending: low, mid-low, mid, mid-high.
    /// Anything above the last bound is the high bucket.
    pub price_low_max: Money,
    pub price_mid_low_max: Money,
    pub price_mid_max: Money,
    pub price_mid_high_max: Money,
    /// Minimum revenue share a preferred time slot must carry.
    pub significant_time_share: Fraction,
    /// Female revenue share at or above which a district counts as
    /// female-centered; at or below `male_centered_max`, male-centered.
    pub female_centered_min: Fraction,
    pub male_centered_max: Fraction,
    /// Weekday revenue share bounds for the weekday/weekend filter.
    pub weekday_min: Fraction,
    pub weekend_max: Fraction,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        FilterCriteria {
            blue_ocean: CountBucket { min: 0, max: 10 },
            moderate: CountBucket { min: 11, max: 30 },
            competitive: CountBucket { min: 31, max: 50 },
            price_low_max: dec!(5000),
            price_mid_low_max: dec!(8000),
            price_mid_max: dec!(12000),
            price_mid_high_max: dec!(15000),
            significant_time_share: dec!(0.2),
            female_centered_min: dec!(0.6),
            male_centered_max: dec!(0.4),
            weekday_min: dec!(0.7),
            weekend_max: dec!(0.5),
        }
    }
}

// ---------------------------------------------------------------------------
// Scoring configuration
// ---------------------------------------------------------------------------

/// Pipeline-wide scoring knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub weights: RankWeights,
    /// Floating population at which the population sub-score saturates.
    pub ideal_population: Decimal,
    /// Monthly category payment count at which payment activity saturates.
    pub ideal_payment_count: Decimal,
    /// Pareto fronts smaller than this fall back to the full candidate set.
    pub min_pareto_size: usize,
    /// Sub-score used when an optional metric is entirely absent.
    pub neutral_score: Score,
    pub criteria: FilterCriteria,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        ScoringConfig {
            weights: RankWeights::default(),
            ideal_population: dec!(30000),
            ideal_payment_count: dec!(10000),
            min_pareto_size: 20,
            neutral_score: dec!(50),
            criteria: FilterCriteria::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Flow-network heuristics
// ---------------------------------------------------------------------------

/// Capacity heuristics for building the flow network when no or partial
/// movement data is available. The floors keep every district structurally
/// reachable; the scales convert monthly/daily observations to peak-hour
/// capacities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeuristicProfile {
    /// Profile identifier recorded in output assumptions.
    pub name: String,
    /// Minimum SOURCE→district capacity.
    pub source_floor: u64,
    /// Fraction of (population × non-resident ratio) entering per hour.
    pub source_scale: Fraction,
    /// Minimum district↔district capacity before multipliers.
    pub link_floor: u64,
    /// Fraction of the smaller district's population moving between a pair.
    pub link_scale: Fraction,
    /// Link multiplier for registered-adjacent pairs.
    pub adjacent_multiplier: u64,
    /// Link multiplier for non-adjacent pairs.
    pub distant_multiplier: u64,
    /// Minimum district→SINK capacity.
    pub sink_floor: u64,
    /// Fraction of monthly payment count converting at the sink.
    pub sink_conversion: Fraction,
    /// Daily counts ÷ this factor ≈ peak-hour counts.
    pub peak_hour_divisor: u64,
    /// Monthly counts ÷ this factor ≈ daily counts.
    pub days_per_month: u64,
}

impl HeuristicProfile {
    /// Estimation-friendly profile: generous floors so no district is
    /// starved, dense inter-district links, adjacency boosted ×5.
    pub fn estimated() -> Self {
        HeuristicProfile {
            name: "estimated".to_string(),
            source_floor: 5000,
            source_scale: dec!(0.5),
            link_floor: 500,
            link_scale: dec!(0.1),
            adjacent_multiplier: 5,
            distant_multiplier: 2,
            sink_floor: 2000,
            sink_conversion: dec!(0.4),
            peak_hour_divisor: 10,
            days_per_month: 30,
        }
    }

    /// Conservative profile: lower floors, no inter-district links, sink
    /// capacity from plain daily payment counts.
    pub fn conservative() -> Self {
        HeuristicProfile {
            name: "conservative".to_string(),
            source_floor: 1000,
            source_scale: dec!(0.2),
            link_floor: 0,
            link_scale: Decimal::ZERO,
            adjacent_multiplier: 1,
            distant_multiplier: 1,
            sink_floor: 100,
            sink_conversion: dec!(0.034),
            peak_hour_divisor: 10,
            days_per_month: 30,
        }
    }

    /// Resolve a profile by name.
    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "estimated" => Some(Self::estimated()),
            "conservative" => Some(Self::conservative()),
            _ => None,
        }
    }
}

impl Default for HeuristicProfile {
    fn default() -> Self {
        Self::estimated()
    }
}

/// Helper bounds check shared by validation paths.
pub(crate) fn is_percent(value: Percent) -> bool {
    value >= Decimal::ZERO && value <= dec!(100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_weights_sum_to_one() {
        assert_eq!(RankWeights::default().total(), Decimal::ONE);
    }

    #[test]
    fn normalized_weights_sum_to_one_after_adjustment() {
        let mut weights = RankWeights::default();
        weights.accessibility = dec!(0.25);
        weights.profitability = dec!(0.25);
        let normalized = weights.normalized();
        assert!((normalized.total() - Decimal::ONE).abs() < dec!(0.0000001));
        assert!(normalized.accessibility > normalized.morning_share);
    }

    #[test]
    fn price_buckets_are_ascending() {
        let criteria = FilterCriteria::default();
        assert!(criteria.price_low_max < criteria.price_mid_low_max);
        assert!(criteria.price_mid_low_max < criteria.price_mid_max);
        assert!(criteria.price_mid_max < criteria.price_mid_high_max);
    }

    #[test]
    fn profiles_resolve_by_name() {
        assert_eq!(
            HeuristicProfile::by_name("estimated").unwrap().source_floor,
            5000
        );
        assert_eq!(
            HeuristicProfile::by_name("conservative").unwrap().link_scale,
            Decimal::ZERO
        );
        assert!(HeuristicProfile::by_name("aggressive").is_none());
    }
}
