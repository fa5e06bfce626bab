//! Sequential constraint-filter chain.
//!
//! Filters run in a fixed order; each takes the surviving candidate set and
//! strictly narrows it. Two deliberate softenings:
//!
//! - A filter whose strict application would empty a non-empty candidate set
//!   is skipped entirely and its kind recorded in the outcome, so a single
//!   overly strict criterion cannot produce "no candidates". Callers decide
//!   what to tell the user about skipped filters.
//! - Filters whose constraint is `Any`/unset are no-ops and never inspect
//!   district data.
//!
//! Order affects diagnostics only; ignoring the fail-open rule every filter
//! is independently monotone, so the surviving set is order-independent.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::FilterCriteria;
use crate::scoring::target_match::target_match_score;
use crate::types::{
    CompetitionLevel, Constraints, GenderTarget, LocationDataset, PriceRangePreference,
    SubwayPreference, WeekdayPreference,
};

/// Identifies one filter in the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterKind {
    RevenueRange,
    BudgetBand,
    MaxCompetitors,
    TargetMatch,
    GenderTarget,
    CompetitionLevel,
    Subway,
    PeakTime,
    WeekdayShare,
    PriceRange,
    MinMerchants,
    MaxRent,
}

impl FilterKind {
    /// Chain order.
    pub const CHAIN: [FilterKind; 12] = [
        FilterKind::RevenueRange,
        FilterKind::BudgetBand,
        FilterKind::MaxCompetitors,
        FilterKind::TargetMatch,
        FilterKind::GenderTarget,
        FilterKind::CompetitionLevel,
        FilterKind::Subway,
        FilterKind::PeakTime,
        FilterKind::WeekdayShare,
        FilterKind::PriceRange,
        FilterKind::MinMerchants,
        FilterKind::MaxRent,
    ];

    /// Whether the user's constraints activate this filter at all.
    pub fn is_active(self, constraints: &Constraints) -> bool {
        match self {
            FilterKind::RevenueRange => constraints.revenue_range.is_some(),
            FilterKind::BudgetBand => {
                constraints.budget_min > Decimal::ZERO
                    && constraints.budget_max > constraints.budget_min
            }
            FilterKind::MaxCompetitors => constraints.max_competitors > 0,
            FilterKind::TargetMatch => {
                constraints.min_target_match > Decimal::ZERO
                    && !constraints.target_segments.is_empty()
            }
            FilterKind::GenderTarget => constraints.gender_target != GenderTarget::Any,
            FilterKind::CompetitionLevel => constraints.competition != CompetitionLevel::Any,
            FilterKind::Subway => constraints.subway == SubwayPreference::Required,
            FilterKind::PeakTime => constraints.peak_time.slot().is_some(),
            FilterKind::WeekdayShare => constraints.weekday != WeekdayPreference::Balanced,
            FilterKind::PriceRange => constraints.price_range != PriceRangePreference::Any,
            FilterKind::MinMerchants => constraints.min_merchants > 0,
            FilterKind::MaxRent => constraints.max_rent.is_some(),
        }
    }

    /// Strict predicate for one district.
    pub fn passes(
        self,
        location: &LocationDataset,
        constraints: &Constraints,
        criteria: &FilterCriteria,
    ) -> bool {
        match self {
            FilterKind::RevenueRange => match (&constraints.revenue_range, &location.sales) {
                (Some(band), Some(sales)) => {
                    band.min <= sales.monthly_revenue && sales.monthly_revenue <= band.max
                }
                (Some(_), None) => false,
                (None, _) => true,
            },
            FilterKind::BudgetBand => {
                let price = location.commercial.price_point(constraints.category);
                price <= Decimal::ZERO
                    || (constraints.budget_min <= price && price <= constraints.budget_max)
            }
            FilterKind::MaxCompetitors => {
                location.commercial.merchant_count(constraints.category)
                    <= constraints.max_competitors
            }
            FilterKind::TargetMatch => {
                target_match_score(&location.population, &constraints.target_segments)
                    >= constraints.min_target_match
            }
            FilterKind::GenderTarget => {
                let female = location.female_ratio();
                match constraints.gender_target {
                    GenderTarget::FemaleFocused => female >= criteria.female_centered_min,
                    GenderTarget::MaleFocused => female <= criteria.male_centered_max,
                    GenderTarget::Balanced => {
                        criteria.male_centered_max <= female
                            && female <= criteria.female_centered_min
                    }
                    GenderTarget::Any => true,
                }
            }
            FilterKind::CompetitionLevel => {
                let count = location.commercial.merchant_count(constraints.category);
                let bucket = match constraints.competition {
                    CompetitionLevel::BlueOcean => criteria.blue_ocean,
                    CompetitionLevel::Moderate => criteria.moderate,
                    CompetitionLevel::Competitive => criteria.competitive,
                    CompetitionLevel::Any => return true,
                };
                bucket.contains(count)
            }
            FilterKind::Subway => location.subway_access,
            FilterKind::PeakTime => match (constraints.peak_time.slot(), &location.sales) {
                (Some(slot), Some(sales)) => {
                    sales.time_share(slot) >= criteria.significant_time_share
                }
                (Some(_), None) => false,
                (None, _) => true,
            },
            FilterKind::WeekdayShare => match &location.sales {
                Some(sales) => match constraints.weekday {
                    WeekdayPreference::Weekday => sales.weekday_ratio() >= criteria.weekday_min,
                    WeekdayPreference::Weekend => sales.weekday_ratio() <= criteria.weekend_max,
                    WeekdayPreference::Balanced => true,
                },
                None => false,
            },
            FilterKind::PriceRange => {
                let price = location.commercial.price_point(constraints.category);
                match constraints.price_range {
                    PriceRangePreference::Low => price <= criteria.price_low_max,
                    PriceRangePreference::MidLow => {
                        criteria.price_low_max < price && price <= criteria.price_mid_low_max
                    }
                    PriceRangePreference::Mid => {
                        criteria.price_mid_low_max < price && price <= criteria.price_mid_max
                    }
                    PriceRangePreference::MidHigh => {
                        criteria.price_mid_max < price && price <= criteria.price_mid_high_max
                    }
                    PriceRangePreference::High => price > criteria.price_mid_high_max,
                    PriceRangePreference::Any => true,
                }
            }
            FilterKind::MinMerchants => {
                location.commercial.merchant_count(constraints.category)
                    >= constraints.min_merchants
            }
            FilterKind::MaxRent => match (constraints.max_rent, &location.rent) {
                (Some(max_rent), Some(rent)) => rent.avg_monthly_rent <= max_rent,
                // Unknown rent is not held against a district.
                (Some(_), None) => true,
                (None, _) => true,
            },
        }
    }
}

impl std::fmt::Display for FilterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            FilterKind::RevenueRange => "revenue range",
            FilterKind::BudgetBand => "budget band",
            FilterKind::MaxCompetitors => "max competitors",
            FilterKind::TargetMatch => "target match",
            FilterKind::GenderTarget => "gender target",
            FilterKind::CompetitionLevel => "competition level",
            FilterKind::Subway => "subway access",
            FilterKind::PeakTime => "peak time",
            FilterKind::WeekdayShare => "weekday share",
            FilterKind::PriceRange => "price range",
            FilterKind::MinMerchants => "min merchants",
            FilterKind::MaxRent => "max rent",
        };
        write!(f, "{}", label)
    }
}

/// Result of running the chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterOutcome {
    /// Names that survived, in input order.
    pub passed: Vec<String>,
    /// Filters skipped because strict application would have emptied the set.
    pub skipped: Vec<FilterKind>,
}

/// Applies the whole chain over named candidates.
#[derive(Debug, Clone)]
pub struct FilterChain<'a> {
    criteria: &'a FilterCriteria,
}

impl<'a> FilterChain<'a> {
    pub fn new(criteria: &'a FilterCriteria) -> Self {
        FilterChain { criteria }
    }

    pub fn apply(
        &self,
        candidates: Vec<String>,
        locations: &BTreeMap<String, &LocationDataset>,
        constraints: &Constraints,
    ) -> FilterOutcome {
        let mut passed = candidates;
        let mut skipped = Vec::new();

        for kind in FilterKind::CHAIN {
            if !kind.is_active(constraints) {
                continue;
            }
            let strict: Vec<String> = passed
                .iter()
                .filter(|name| {
                    locations
                        .get(name.as_str())
                        .map(|loc| kind.passes(loc, constraints, self.criteria))
                        .unwrap_or(false)
                })
                .cloned()
                .collect();

            if strict.is_empty() && !passed.is_empty() {
                skipped.push(kind);
            } else {
                passed = strict;
            }
        }

        FilterOutcome { passed, skipped }
    }
}
