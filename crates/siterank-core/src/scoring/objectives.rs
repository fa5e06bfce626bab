//! Multi-objective scoring per district.
//!
//! Covers:
//! 1. **Sub-scores** -- population adequacy, payment activity, target match,
//!    competition adequacy (inverted U), budget fit, gender match, rent
//!    adequacy; all on the 0–100 scale.
//! 2. **ObjectiveVector** -- the fixed-key summary (profitability,
//!    stability, accessibility, network efficiency, plus the ranking-only
//!    morning/weekday shares) used downstream for dominance and ranking.
//!
//! Missing optional metrics resolve to documented neutral values, never
//! errors.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::config::ScoringConfig;
use crate::flow::FlowMetrics;
use crate::scoring::target_match::target_match_score;
use crate::types::{Constraints, GenderTarget, LocationDataset, Score, TimeSlot};

/// Objective keys. `DOMINANCE` lists the keys Pareto comparison uses;
/// the remaining keys only participate in ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Objective {
    Profitability,
    Stability,
    Accessibility,
    NetworkEfficiency,
    MorningShare,
    WeekdayShare,
}

impl Objective {
    pub const ALL: [Objective; 6] = [
        Objective::Profitability,
        Objective::Stability,
        Objective::Accessibility,
        Objective::NetworkEfficiency,
        Objective::MorningShare,
        Objective::WeekdayShare,
    ];

    pub const DOMINANCE: [Objective; 4] = [
        Objective::Profitability,
        Objective::Stability,
        Objective::Accessibility,
        Objective::NetworkEfficiency,
    ];
}

/// Fixed-key objective values for one district.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveVector {
    pub profitability: Score,
    pub stability: Score,
    pub accessibility: Score,
    pub network_efficiency: Score,
    pub morning_share: Score,
    pub weekday_share: Score,
}

impl ObjectiveVector {
    pub fn get(&self, objective: Objective) -> Score {
        match objective {
            Objective::Profitability => self.profitability,
            Objective::Stability => self.stability,
            Objective::Accessibility => self.accessibility,
            Objective::NetworkEfficiency => self.network_efficiency,
            Objective::MorningShare => self.morning_share,
            Objective::WeekdayShare => self.weekday_share,
        }
    }

    pub fn set(&mut self, objective: Objective, value: Score) {
        match objective {
            Objective::Profitability => self.profitability = value,
            Objective::Stability => self.stability = value,
            Objective::Accessibility => self.accessibility = value,
            Objective::NetworkEfficiency => self.network_efficiency = value,
            Objective::MorningShare => self.morning_share = value,
            Objective::WeekdayShare => self.weekday_share = value,
        }
    }
}

/// Component scores retained for display and diagnostics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubScores {
    pub population: Score,
    pub payment_activity: Score,
    pub target_match: Score,
    pub competition: Score,
    pub budget_fit: Score,
    pub gender_match: Score,
    pub rent_adequacy: Score,
    pub commercial_level: Score,
}

/// Raw objectives plus sub-scores for one district.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationObjectives {
    pub name: String,
    pub vector: ObjectiveVector,
    pub subscores: SubScores,
}

/// Pure scoring over immutable inputs.
#[derive(Debug, Clone)]
pub struct ObjectiveCalculator<'a> {
    config: &'a ScoringConfig,
}

impl<'a> ObjectiveCalculator<'a> {
    pub fn new(config: &'a ScoringConfig) -> Self {
        ObjectiveCalculator { config }
    }

    /// Compute the objective vector for one district. `flow` is the solved
    /// flow metrics when flow analysis ran for this district.
    pub fn calculate(
        &self,
        location: &LocationDataset,
        constraints: &Constraints,
        flow: Option<&FlowMetrics>,
    ) -> LocationObjectives {
        let mut sub = SubScores::default();

        sub.population = ratio_score(
            Decimal::from(location.population.population_max),
            self.config.ideal_population,
        );
        sub.payment_activity = ratio_score(
            Decimal::from(location.commercial.category_payment_count(constraints.category)),
            self.config.ideal_payment_count,
        );
        sub.target_match = target_match_score(&location.population, &constraints.target_segments);
        sub.competition = competition_score(
            location.commercial.merchant_count(constraints.category),
            constraints.category.ideal_competitors(),
        );
        sub.budget_fit = budget_fit_score(
            location.commercial.price_point(constraints.category),
            constraints.budget_min,
            constraints.budget_max,
            self.config.neutral_score,
        );
        sub.gender_match = gender_match_score(location, constraints);
        sub.rent_adequacy = rent_adequacy_score(location, self.config.neutral_score);
        sub.commercial_level = location.commercial.activity_level.score();

        let mut profitability = sub.population * dec!(0.35)
            + sub.payment_activity * dec!(0.35)
            + sub.target_match * dec!(0.30);
        if constraints.gender_target != GenderTarget::Any {
            profitability = profitability * dec!(0.9) + sub.gender_match * dec!(0.1);
        }

        let stability = sub.competition * dec!(0.6) + sub.budget_fit * dec!(0.4);

        let accessibility = location.population.non_resident_ratio * dec!(0.6)
            + sub.commercial_level * dec!(0.4);

        let network_efficiency = flow
            .map(|m| (m.efficiency * dec!(100)).min(dec!(100)))
            .unwrap_or(Decimal::ZERO);

        let (morning_share, weekday_share) = match &location.sales {
            Some(sales) => (
                sales.time_share(TimeSlot::Morning) * dec!(100),
                sales.weekday_ratio() * dec!(100),
            ),
            None => (Decimal::ZERO, Decimal::ZERO),
        };

        LocationObjectives {
            name: location.name.clone(),
            vector: ObjectiveVector {
                profitability,
                stability,
                accessibility,
                network_efficiency,
                morning_share,
                weekday_share,
            },
            subscores: sub,
        }
    }
}

/// Linear score against an ideal reference, capped at 100.
fn ratio_score(value: Decimal, ideal: Decimal) -> Score {
    if ideal <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    (value / ideal * dec!(100)).min(dec!(100))
}

/// Inverted-U competition adequacy: districts below the category's ideal
/// competitor count are under-proven, districts above it are saturated.
fn competition_score(count: u32, ideal: u32) -> Score {
    let count = Decimal::from(count);
    let ideal = Decimal::from(ideal.max(1));
    if count <= ideal {
        dec!(60) + count / ideal * dec!(40)
    } else {
        (dec!(100) - (count - ideal) / ideal * dec!(70)).max(dec!(30))
    }
}

/// Distance of the district's price point from the owner's target band,
/// penalized symmetrically on both sides of the band.
fn budget_fit_score(price: Decimal, budget_min: Decimal, budget_max: Decimal, neutral: Score) -> Score {
    if price <= Decimal::ZERO || budget_min <= Decimal::ZERO || budget_max <= budget_min {
        return neutral;
    }
    let center = (budget_min + budget_max) / dec!(2);
    if budget_min <= price && price <= budget_max {
        let deviation = (price - center).abs() / (center * dec!(0.5));
        dec!(100) - deviation * dec!(20)
    } else {
        let deviation = if price < budget_min {
            (budget_min - price) / budget_min
        } else {
            (price - budget_max) / budget_max
        };
        (dec!(50) - deviation * dec!(50)).max(Decimal::ZERO)
    }
}

/// Gender-target fit. No target → 80 (nothing to optimize against, but the
/// district is not penalized either).
fn gender_match_score(location: &LocationDataset, constraints: &Constraints) -> Score {
    let ratio_pct = match constraints.gender_target {
        GenderTarget::Any | GenderTarget::Balanced => return dec!(80),
        GenderTarget::FemaleFocused => location.female_ratio() * dec!(100),
        GenderTarget::MaleFocused => (Decimal::ONE - location.female_ratio()) * dec!(100),
    };
    let min_ratio = constraints.min_gender_ratio;
    if ratio_pct >= min_ratio + dec!(10) {
        dec!(100)
    } else if ratio_pct >= min_ratio {
        (dec!(80) + (ratio_pct - min_ratio) * dec!(2)).min(dec!(100))
    } else {
        dec!(50)
    }
}

/// Rent burden as a share of monthly revenue; 10–15% is considered healthy.
fn rent_adequacy_score(location: &LocationDataset, neutral: Score) -> Score {
    let rent = match &location.rent {
        Some(rent) if rent.avg_monthly_rent > Decimal::ZERO => rent.avg_monthly_rent,
        _ => return neutral,
    };
    let revenue = match &location.sales {
        Some(sales) if sales.monthly_revenue > Decimal::ZERO => sales.monthly_revenue,
        _ => return neutral,
    };
    let ratio = rent / revenue * dec!(100);
    if ratio < dec!(10) {
        dec!(80)
    } else if ratio <= dec!(15) {
        dec!(100)
    } else if ratio <= dec!(20) {
        dec!(100) - (ratio - dec!(15)) * dec!(10)
    } else {
        (dec!(50) - (ratio - dec!(20)) * dec!(2)).max(Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::CustomerSegment;
    use crate::types::{
        AgeDistribution, CommercialMetrics, PopulationMetrics, RentMetrics, SalesMetrics,
    };
    use pretty_assertions::assert_eq;

    fn location(population_max: u64, payment_count: u64) -> LocationDataset {
        LocationDataset {
            name: "Gangnam".to_string(),
            region: "Seoul".to_string(),
            population: PopulationMetrics {
                population_min: population_max / 2,
                population_max,
                age_distribution: AgeDistribution {
                    teens: dec!(5),
                    twenties: dec!(30),
                    thirties: dec!(30),
                    forties: dec!(20),
                    fifties: dec!(10),
                    sixties_plus: dec!(5),
                },
                female_ratio: dec!(52),
                resident_ratio: dec!(30),
                non_resident_ratio: dec!(70),
                designated_tourist_zone: false,
            },
            commercial: CommercialMetrics {
                payment_count,
                ..CommercialMetrics::default()
            },
            rent: None,
            sales: None,
            subway_access: true,
        }
    }

    #[test]
    fn population_score_caps_at_100() {
        let config = ScoringConfig::default();
        let calc = ObjectiveCalculator::new(&config);
        let result = calc.calculate(&location(90000, 5000), &Constraints::default(), None);
        assert_eq!(result.subscores.population, dec!(100));
    }

    #[test]
    fn competition_score_peaks_at_ideal() {
        // Cafe ideal is 40 competitors.
        assert_eq!(competition_score(40, 40), dec!(100));
        assert_eq!(competition_score(20, 40), dec!(80));
        assert!(competition_score(80, 40) < competition_score(40, 40));
        assert_eq!(competition_score(200, 40), dec!(30));
    }

    #[test]
    fn budget_fit_is_highest_at_band_center() {
        let at_center = budget_fit_score(dec!(10000), dec!(5000), dec!(15000), dec!(50));
        let at_edge = budget_fit_score(dec!(15000), dec!(5000), dec!(15000), dec!(50));
        let outside = budget_fit_score(dec!(30000), dec!(5000), dec!(15000), dec!(50));
        assert_eq!(at_center, dec!(100));
        assert!(at_edge < at_center);
        assert!(outside < at_edge);
    }

    #[test]
    fn unknown_price_is_neutral() {
        assert_eq!(
            budget_fit_score(Decimal::ZERO, dec!(5000), dec!(15000), dec!(50)),
            dec!(50)
        );
    }

    #[test]
    fn gender_blend_only_applies_with_a_target() {
        let config = ScoringConfig::default();
        let calc = ObjectiveCalculator::new(&config);
        let loc = location(30000, 10000);

        let neutral = calc.calculate(&loc, &Constraints::default(), None);
        let targeted = calc.calculate(
            &loc,
            &Constraints {
                gender_target: GenderTarget::FemaleFocused,
                ..Constraints::default()
            },
            None,
        );
        // 52% female ≥ 40% threshold but below 50% → 80 + 12×2 is capped path.
        assert_eq!(targeted.subscores.gender_match, dec!(100));
        assert!(neutral.vector.profitability != targeted.vector.profitability);
    }

    #[test]
    fn network_efficiency_scales_flow_ratio() {
        let config = ScoringConfig::default();
        let calc = ObjectiveCalculator::new(&config);
        let metrics = FlowMetrics {
            efficiency: dec!(0.42),
            ..FlowMetrics::default()
        };
        let result = calc.calculate(
            &location(30000, 10000),
            &Constraints::default(),
            Some(&metrics),
        );
        assert_eq!(result.vector.network_efficiency, dec!(42));
    }

    #[test]
    fn missing_flow_means_zero_efficiency() {
        let config = ScoringConfig::default();
        let calc = ObjectiveCalculator::new(&config);
        let result = calc.calculate(&location(30000, 10000), &Constraints::default(), None);
        assert_eq!(result.vector.network_efficiency, Decimal::ZERO);
    }

    #[test]
    fn rent_adequacy_prefers_ten_to_fifteen_percent() {
        let mut loc = location(30000, 10000);
        loc.rent = Some(RentMetrics {
            avg_monthly_rent: dec!(1200000),
        });
        loc.sales = Some(SalesMetrics {
            monthly_revenue: dec!(10000000),
            transaction_count: 2000,
            ..SalesMetrics::default()
        });
        assert_eq!(rent_adequacy_score(&loc, dec!(50)), dec!(100));

        loc.rent = Some(RentMetrics {
            avg_monthly_rent: dec!(3000000),
        });
        // 30% rent burden: 50 − 10×2 = 30
        assert_eq!(rent_adequacy_score(&loc, dec!(50)), dec!(30));
    }

    #[test]
    fn target_match_feeds_profitability() {
        let config = ScoringConfig::default();
        let calc = ObjectiveCalculator::new(&config);
        let loc = location(30000, 10000);
        let with_workers = calc.calculate(
            &loc,
            &Constraints {
                target_segments: vec![CustomerSegment::OfficeWorkers],
                ..Constraints::default()
            },
            None,
        );
        let with_residents = calc.calculate(
            &loc,
            &Constraints {
                target_segments: vec![CustomerSegment::Residents],
                ..Constraints::default()
            },
            None,
        );
        // 70% non-resident commuter district suits office workers better.
        assert!(
            with_workers.vector.profitability > with_residents.vector.profitability,
            "expected office-worker targeting to score higher"
        );
    }
}
