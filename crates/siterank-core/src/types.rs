//! Shared value objects for the recommendation pipeline.
//!
//! Everything here is an immutable input or output record. The engine never
//! mutates a [`LocationDataset`] after construction, which is what makes the
//! pipeline reentrant across concurrent requests.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::category::{ActivityLevel, BusinessCategory, CustomerSegment};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Scores on the 0–100 scale.
pub type Score = Decimal;

/// Ratios on the 0–100 percent scale.
pub type Percent = Decimal;

/// Ratios on the 0–1 scale.
pub type Fraction = Decimal;

/// Reserved node identifier for the synthetic flow source.
pub const SOURCE: &str = "SOURCE";

/// Reserved node identifier for the synthetic flow sink.
pub const SINK: &str = "SINK";

// ---------------------------------------------------------------------------
// Location facts
// ---------------------------------------------------------------------------

/// Resident age bands used in demographic breakdowns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AgeBand {
    Teens,
    Twenties,
    Thirties,
    Forties,
    Fifties,
    SixtiesPlus,
}

/// Share of the floating population per age band, in percent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgeDistribution {
    pub teens: Percent,
    pub twenties: Percent,
    pub thirties: Percent,
    pub forties: Percent,
    pub fifties: Percent,
    pub sixties_plus: Percent,
}

impl AgeDistribution {
    pub fn share(&self, band: AgeBand) -> Percent {
        match band {
            AgeBand::Teens => self.teens,
            AgeBand::Twenties => self.twenties,
            AgeBand::Thirties => self.thirties,
            AgeBand::Forties => self.forties,
            AgeBand::Fifties => self.fifties,
            AgeBand::SixtiesPlus => self.sixties_plus,
        }
    }
}

/// Floating-population metrics for one district.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulationMetrics {
    /// Low estimate of the daily floating population.
    pub population_min: u64,
    /// High estimate of the daily floating population.
    pub population_max: u64,
    pub age_distribution: AgeDistribution,
    /// Female share of the floating population, percent. Unknown → 50.
    #[serde(default = "default_half_percent")]
    pub female_ratio: Percent,
    /// Share of visitors who live in the district, percent.
    #[serde(default = "default_half_percent")]
    pub resident_ratio: Percent,
    /// Share of visitors who do not live in the district, percent.
    #[serde(default = "default_half_percent")]
    pub non_resident_ratio: Percent,
    /// Whether the district is a designated tourist zone.
    #[serde(default)]
    pub designated_tourist_zone: bool,
}

fn default_half_percent() -> Percent {
    dec!(50)
}

/// Payment statistics for one business category inside a district.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryStats {
    pub merchant_count: u32,
    /// Monthly payment count across the category's merchants.
    pub payment_count: u64,
    pub payment_amount_min: Money,
    pub payment_amount_max: Money,
}

/// Commercial metrics for one district.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommercialMetrics {
    /// Area-wide monthly payment count.
    pub payment_count: u64,
    pub payment_amount_min: Money,
    pub payment_amount_max: Money,
    #[serde(default)]
    pub activity_level: ActivityLevel,
    /// Per-category breakdown. Districts without a breakdown fall back to
    /// area-wide figures scaled by the category's typical share.
    #[serde(default)]
    pub categories: BTreeMap<BusinessCategory, CategoryStats>,
}

impl CommercialMetrics {
    fn total_merchants(&self) -> u32 {
        self.categories.values().map(|s| s.merchant_count).sum()
    }

    /// Competitor count for a category. Missing category stats are estimated
    /// from the total merchant count and the category's typical share.
    pub fn merchant_count(&self, category: BusinessCategory) -> u32 {
        let direct = self
            .categories
            .get(&category)
            .map(|s| s.merchant_count)
            .unwrap_or(0);
        if direct > 0 {
            return direct;
        }
        let estimated = Decimal::from(self.total_merchants()) * category.merchant_share();
        decimal_to_u64(estimated) as u32
    }

    /// Monthly payment count attributable to a category, falling back to the
    /// area-wide count when no breakdown exists.
    pub fn category_payment_count(&self, category: BusinessCategory) -> u64 {
        let direct = self
            .categories
            .get(&category)
            .map(|s| s.payment_count)
            .unwrap_or(0);
        if direct > 0 {
            direct
        } else {
            self.payment_count
        }
    }

    /// Estimated per-person price point for a category.
    ///
    /// Prefers the category's own payment stats; falls back to area-wide
    /// payments scaled by the category's revenue share; finally falls back to
    /// the category's fixed price. Data-derived estimates are clamped to the
    /// category's plausible price band.
    pub fn price_point(&self, category: BusinessCategory) -> Money {
        if let Some(stats) = self.categories.get(&category) {
            let avg_amount = (stats.payment_amount_min + stats.payment_amount_max) / dec!(2);
            if stats.payment_count > 0 && avg_amount > Decimal::ZERO {
                let per_transaction = avg_amount / Decimal::from(stats.payment_count);
                let per_person = per_transaction / category.party_size();
                return clamp(per_person, category.price_floor(), category.price_ceiling());
            }
        }

        let area_avg = (self.payment_amount_min + self.payment_amount_max) / dec!(2);
        if self.payment_count > 0 && area_avg > Decimal::ZERO {
            let per_transaction = area_avg / Decimal::from(self.payment_count);
            // The category takes only a slice of area-wide spend; the ×10
            // factor corrects the per-transaction dilution of the slice.
            let estimated = per_transaction * category.revenue_share() * dec!(10);
            let per_person = estimated / category.party_size();
            return clamp(per_person, category.price_floor(), category.price_ceiling());
        }

        category.fallback_price()
    }
}

fn clamp(value: Decimal, lo: Decimal, hi: Decimal) -> Decimal {
    value.max(lo).min(hi)
}

pub(crate) fn decimal_to_u64(value: Decimal) -> u64 {
    use rust_decimal::prelude::ToPrimitive;
    value.floor().to_u64().unwrap_or(0)
}

/// Rent metrics for one district.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RentMetrics {
    pub avg_monthly_rent: Money,
}

/// Revenue time slots used in sales breakdowns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TimeSlot {
    /// 06–11
    Morning,
    /// 11–14
    Lunch,
    /// 14–17
    Afternoon,
    /// 17–21
    Evening,
    /// 21–24
    Night,
}

/// Sales and business-dynamics metrics for one district.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SalesMetrics {
    pub monthly_revenue: Money,
    pub transaction_count: u64,
    #[serde(default)]
    pub female_revenue: Money,
    #[serde(default)]
    pub male_revenue: Money,
    #[serde(default)]
    pub weekday_revenue: Money,
    #[serde(default)]
    pub weekend_revenue: Money,
    #[serde(default)]
    pub morning_revenue: Money,
    #[serde(default)]
    pub lunch_revenue: Money,
    #[serde(default)]
    pub afternoon_revenue: Money,
    #[serde(default)]
    pub evening_revenue: Money,
    #[serde(default)]
    pub night_revenue: Money,
    #[serde(default)]
    pub open_rate: Fraction,
    #[serde(default)]
    pub close_rate: Fraction,
    #[serde(default)]
    pub franchise_count: u32,
}

impl SalesMetrics {
    /// Female revenue share. Unknown gendered revenue → 0.5.
    pub fn female_ratio(&self) -> Fraction {
        let total = self.female_revenue + self.male_revenue;
        if total > Decimal::ZERO {
            self.female_revenue / total
        } else {
            dec!(0.5)
        }
    }

    /// Weekday revenue share. Unknown day-split revenue → 0.7.
    pub fn weekday_ratio(&self) -> Fraction {
        let total = self.weekday_revenue + self.weekend_revenue;
        if total > Decimal::ZERO {
            self.weekday_revenue / total
        } else {
            dec!(0.7)
        }
    }

    /// Revenue share of one time slot. Zero revenue → 0.
    pub fn time_share(&self, slot: TimeSlot) -> Fraction {
        if self.monthly_revenue <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        let slot_revenue = match slot {
            TimeSlot::Morning => self.morning_revenue,
            TimeSlot::Lunch => self.lunch_revenue,
            TimeSlot::Afternoon => self.afternoon_revenue,
            TimeSlot::Evening => self.evening_revenue,
            TimeSlot::Night => self.night_revenue,
        };
        slot_revenue / self.monthly_revenue
    }

    /// Average ticket size. Zero transactions → 0.
    pub fn avg_ticket(&self) -> Money {
        if self.transaction_count == 0 {
            return Decimal::ZERO;
        }
        self.monthly_revenue / Decimal::from(self.transaction_count)
    }
}

/// Immutable per-district facts assembled by the data-collection layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationDataset {
    /// District identifier, unique within one request.
    pub name: String,
    /// Parent region (borough / city).
    pub region: String,
    pub population: PopulationMetrics,
    pub commercial: CommercialMetrics,
    #[serde(default)]
    pub rent: Option<RentMetrics>,
    #[serde(default)]
    pub sales: Option<SalesMetrics>,
    #[serde(default)]
    pub subway_access: bool,
}

impl LocationDataset {
    /// Female customer ratio as a 0–1 fraction: gendered revenue when
    /// available, floating-population split otherwise.
    pub fn female_ratio(&self) -> Fraction {
        if let Some(sales) = &self.sales {
            if sales.female_revenue + sales.male_revenue > Decimal::ZERO {
                return sales.female_ratio();
            }
        }
        self.population.female_ratio / dec!(100)
    }
}

// ---------------------------------------------------------------------------
// Movement and adjacency inputs
// ---------------------------------------------------------------------------

/// Pairwise daily movement counts observed between districts, plus each
/// district's total daily inflow from everywhere (including outside the
/// candidate set).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MovementTable {
    /// from → to → persons per day.
    pub daily_counts: BTreeMap<String, BTreeMap<String, u64>>,
    /// district → total persons per day arriving from anywhere.
    pub daily_inflow: BTreeMap<String, u64>,
    #[serde(default)]
    pub observed_from: Option<NaiveDate>,
    #[serde(default)]
    pub observed_to: Option<NaiveDate>,
}

impl MovementTable {
    /// Daily count moving from `from` to `to`, zero when unobserved.
    pub fn count(&self, from: &str, to: &str) -> u64 {
        self.daily_counts
            .get(from)
            .and_then(|dests| dests.get(to))
            .copied()
            .unwrap_or(0)
    }

    /// Total daily movement into `to` from the given origins.
    pub fn inbound_from<'a>(&self, origins: impl Iterator<Item = &'a str>, to: &str) -> u64 {
        origins.map(|from| self.count(from, to)).sum()
    }
}

/// Static lookup of geographically adjacent district pairs. Adjacency is
/// registered data, never computed from coordinates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdjacencyMap {
    neighbors: BTreeMap<String, BTreeSet<String>>,
}

impl AdjacencyMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, a: impl Into<String>, b: impl Into<String>) {
        let (a, b) = (a.into(), b.into());
        self.neighbors.entry(a.clone()).or_default().insert(b.clone());
        self.neighbors.entry(b).or_default().insert(a);
    }

    /// Symmetric adjacency check.
    pub fn are_adjacent(&self, a: &str, b: &str) -> bool {
        self.neighbors
            .get(a)
            .map(|set| set.contains(b))
            .unwrap_or(false)
    }
}

// ---------------------------------------------------------------------------
// User constraints
// ---------------------------------------------------------------------------

/// Target gender mix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenderTarget {
    FemaleFocused,
    MaleFocused,
    Balanced,
    #[default]
    Any,
}

/// Preferred competition bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompetitionLevel {
    BlueOcean,
    Moderate,
    Competitive,
    #[default]
    Any,
}

/// Subway accessibility requirement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubwayPreference {
    Required,
    Preferred,
    #[default]
    Any,
}

/// Main trading-hours preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeakTimePreference {
    Morning,
    Lunch,
    Afternoon,
    Evening,
    #[default]
    Balanced,
}

impl PeakTimePreference {
    /// Sales time slot this preference checks, if any.
    pub fn slot(self) -> Option<TimeSlot> {
        match self {
            PeakTimePreference::Morning => Some(TimeSlot::Morning),
            PeakTimePreference::Lunch => Some(TimeSlot::Lunch),
            PeakTimePreference::Afternoon => Some(TimeSlot::Afternoon),
            PeakTimePreference::Evening => Some(TimeSlot::Evening),
            PeakTimePreference::Balanced => None,
        }
    }
}

/// Weekday/weekend revenue preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeekdayPreference {
    Weekday,
    Weekend,
    #[default]
    Balanced,
}

/// Preferred price-point bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceRangePreference {
    Low,
    MidLow,
    Mid,
    MidHigh,
    High,
    #[default]
    Any,
}

/// Monthly revenue band in raw currency units.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RevenueBand {
    pub min: Money,
    pub max: Money,
}

/// The owner's hard requirements, supplied once per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Constraints {
    pub category: BusinessCategory,
    #[serde(default)]
    pub target_segments: Vec<CustomerSegment>,
    /// Target per-person price band.
    pub budget_min: Money,
    pub budget_max: Money,
    pub max_competitors: u32,
    /// Minimum target-segment match, 0–100.
    pub min_target_match: Score,
    #[serde(default)]
    pub gender_target: GenderTarget,
    /// Minimum gender share (percent) when a gender target is set.
    #[serde(default = "default_min_gender_ratio")]
    pub min_gender_ratio: Percent,
    #[serde(default)]
    pub revenue_range: Option<RevenueBand>,
    #[serde(default)]
    pub competition: CompetitionLevel,
    #[serde(default)]
    pub subway: SubwayPreference,
    #[serde(default)]
    pub peak_time: PeakTimePreference,
    #[serde(default)]
    pub weekday: WeekdayPreference,
    #[serde(default)]
    pub price_range: PriceRangePreference,
    /// Minimum merchant count for data reliability.
    #[serde(default = "default_min_merchants")]
    pub min_merchants: u32,
    #[serde(default)]
    pub max_rent: Option<Money>,
    /// Requested number of recommendations.
    #[serde(default = "default_result_count")]
    pub result_count: usize,
}

fn default_min_gender_ratio() -> Percent {
    dec!(40)
}

fn default_min_merchants() -> u32 {
    3
}

fn default_result_count() -> usize {
    5
}

impl Default for Constraints {
    fn default() -> Self {
        Constraints {
            category: BusinessCategory::Cafe,
            target_segments: Vec::new(),
            budget_min: dec!(3000),
            budget_max: dec!(20000),
            max_competitors: 50,
            min_target_match: Decimal::ZERO,
            gender_target: GenderTarget::Any,
            min_gender_ratio: default_min_gender_ratio(),
            revenue_range: None,
            competition: CompetitionLevel::Any,
            subway: SubwayPreference::Any,
            peak_time: PeakTimePreference::Balanced,
            weekday: WeekdayPreference::Balanced,
            price_range: PriceRangePreference::Any,
            min_merchants: default_min_merchants(),
            max_rent: None,
            result_count: default_result_count(),
        }
    }
}

// ---------------------------------------------------------------------------
// Output records
// ---------------------------------------------------------------------------

/// Denormalized raw metrics carried on each recommendation for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayMetrics {
    pub monthly_revenue: Money,
    pub revenue_per_store: Money,
    pub transaction_count: u64,
    pub price_point: Money,
    pub merchant_count: u32,
    pub close_rate: Fraction,
    pub female_ratio: Fraction,
    pub subway_access: bool,
    pub morning_share: Fraction,
    pub weekday_share: Fraction,
    /// Peak-hour inflow routed to the district in the solved flow.
    pub hourly_inflow: u64,
}

/// Standard computation output envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn commercial_with_category(stats: CategoryStats) -> CommercialMetrics {
        let mut categories = BTreeMap::new();
        categories.insert(BusinessCategory::Cafe, stats);
        CommercialMetrics {
            payment_count: 40000,
            payment_amount_min: dec!(200000000),
            payment_amount_max: dec!(400000000),
            activity_level: ActivityLevel::High,
            categories,
        }
    }

    #[test]
    fn price_point_prefers_category_stats() {
        let commercial = commercial_with_category(CategoryStats {
            merchant_count: 25,
            payment_count: 10000,
            payment_amount_min: dec!(50000000),
            payment_amount_max: dec!(70000000),
        });
        // avg amount 60M / 10k payments = 6000 per transaction, / 1.2 = 5000
        assert_eq!(commercial.price_point(BusinessCategory::Cafe), dec!(5000));
    }

    #[test]
    fn price_point_clamps_to_category_band() {
        let commercial = commercial_with_category(CategoryStats {
            merchant_count: 2,
            payment_count: 10,
            payment_amount_min: dec!(10000000),
            payment_amount_max: dec!(10000000),
        });
        // Raw estimate is far above the cafe ceiling.
        assert_eq!(commercial.price_point(BusinessCategory::Cafe), dec!(20000));
    }

    #[test]
    fn price_point_falls_back_to_fixed_price() {
        let commercial = CommercialMetrics::default();
        assert_eq!(
            commercial.price_point(BusinessCategory::Cafe),
            BusinessCategory::Cafe.fallback_price()
        );
    }

    #[test]
    fn merchant_count_estimates_from_total_when_category_missing() {
        let mut categories = BTreeMap::new();
        categories.insert(
            BusinessCategory::Restaurant,
            CategoryStats {
                merchant_count: 200,
                ..CategoryStats::default()
            },
        );
        let commercial = CommercialMetrics {
            categories,
            ..CommercialMetrics::default()
        };
        // 200 merchants total × 0.15 cafe share = 30
        assert_eq!(commercial.merchant_count(BusinessCategory::Cafe), 30);
    }

    #[test]
    fn sales_ratios_use_neutral_defaults() {
        let sales = SalesMetrics::default();
        assert_eq!(sales.female_ratio(), dec!(0.5));
        assert_eq!(sales.weekday_ratio(), dec!(0.7));
        assert_eq!(sales.time_share(TimeSlot::Morning), Decimal::ZERO);
        assert_eq!(sales.avg_ticket(), Decimal::ZERO);
    }

    #[test]
    fn adjacency_is_symmetric() {
        let mut adjacency = AdjacencyMap::new();
        adjacency.insert("Gangnam", "Yeoksam");
        assert!(adjacency.are_adjacent("Gangnam", "Yeoksam"));
        assert!(adjacency.are_adjacent("Yeoksam", "Gangnam"));
        assert!(!adjacency.are_adjacent("Gangnam", "Hongdae"));
    }

    #[test]
    fn movement_table_sums_inbound_counts() {
        let mut table = MovementTable::default();
        table
            .daily_counts
            .entry("A".to_string())
            .or_default()
            .insert("C".to_string(), 300);
        table
            .daily_counts
            .entry("B".to_string())
            .or_default()
            .insert("C".to_string(), 200);
        let names = ["A", "B"];
        assert_eq!(table.inbound_from(names.iter().copied(), "C"), 500);
    }
}
