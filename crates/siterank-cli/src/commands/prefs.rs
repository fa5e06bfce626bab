//! Shared preference flags and their mapping onto engine constraints.

use clap::{Args, ValueEnum};
use rust_decimal::Decimal;

use siterank_core::category::{BusinessCategory, CustomerSegment};
use siterank_core::types::{
    CompetitionLevel, Constraints, GenderTarget, PeakTimePreference, PriceRangePreference,
    RevenueBand, SubwayPreference, WeekdayPreference,
};

use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CategoryOpt {
    Cafe,
    Restaurant,
    Bar,
    ConvenienceStore,
    Academy,
    HairSalon,
    Pharmacy,
    Gym,
}

impl From<CategoryOpt> for BusinessCategory {
    fn from(opt: CategoryOpt) -> Self {
        match opt {
            CategoryOpt::Cafe => BusinessCategory::Cafe,
            CategoryOpt::Restaurant => BusinessCategory::Restaurant,
            CategoryOpt::Bar => BusinessCategory::Bar,
            CategoryOpt::ConvenienceStore => BusinessCategory::ConvenienceStore,
            CategoryOpt::Academy => BusinessCategory::Academy,
            CategoryOpt::HairSalon => BusinessCategory::HairSalon,
            CategoryOpt::Pharmacy => BusinessCategory::Pharmacy,
            CategoryOpt::Gym => BusinessCategory::Gym,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SegmentOpt {
    OfficeWorkers,
    Students,
    Residents,
    Tourists,
}

impl From<SegmentOpt> for CustomerSegment {
    fn from(opt: SegmentOpt) -> Self {
        match opt {
            SegmentOpt::OfficeWorkers => CustomerSegment::OfficeWorkers,
            SegmentOpt::Students => CustomerSegment::Students,
            SegmentOpt::Residents => CustomerSegment::Residents,
            SegmentOpt::Tourists => CustomerSegment::Tourists,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum GenderOpt {
    Female,
    Male,
    Balanced,
    Any,
}

impl From<GenderOpt> for GenderTarget {
    fn from(opt: GenderOpt) -> Self {
        match opt {
            GenderOpt::Female => GenderTarget::FemaleFocused,
            GenderOpt::Male => GenderTarget::MaleFocused,
            GenderOpt::Balanced => GenderTarget::Balanced,
            GenderOpt::Any => GenderTarget::Any,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CompetitionOpt {
    BlueOcean,
    Moderate,
    Competitive,
    Any,
}

impl From<CompetitionOpt> for CompetitionLevel {
    fn from(opt: CompetitionOpt) -> Self {
        match opt {
            CompetitionOpt::BlueOcean => CompetitionLevel::BlueOcean,
            CompetitionOpt::Moderate => CompetitionLevel::Moderate,
            CompetitionOpt::Competitive => CompetitionLevel::Competitive,
            CompetitionOpt::Any => CompetitionLevel::Any,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SubwayOpt {
    Required,
    Preferred,
    Any,
}

impl From<SubwayOpt> for SubwayPreference {
    fn from(opt: SubwayOpt) -> Self {
        match opt {
            SubwayOpt::Required => SubwayPreference::Required,
            SubwayOpt::Preferred => SubwayPreference::Preferred,
            SubwayOpt::Any => SubwayPreference::Any,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PeakOpt {
    Morning,
    Lunch,
    Afternoon,
    Evening,
    Balanced,
}

impl From<PeakOpt> for PeakTimePreference {
    fn from(opt: PeakOpt) -> Self {
        match opt {
            PeakOpt::Morning => PeakTimePreference::Morning,
            PeakOpt::Lunch => PeakTimePreference::Lunch,
            PeakOpt::Afternoon => PeakTimePreference::Afternoon,
            PeakOpt::Evening => PeakTimePreference::Evening,
            PeakOpt::Balanced => PeakTimePreference::Balanced,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum WeekdayOpt {
    Weekday,
    Weekend,
    Balanced,
}

impl From<WeekdayOpt> for WeekdayPreference {
    fn from(opt: WeekdayOpt) -> Self {
        match opt {
            WeekdayOpt::Weekday => WeekdayPreference::Weekday,
            WeekdayOpt::Weekend => WeekdayPreference::Weekend,
            WeekdayOpt::Balanced => WeekdayPreference::Balanced,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PriceOpt {
    Low,
    MidLow,
    Mid,
    MidHigh,
    High,
    Any,
}

impl From<PriceOpt> for PriceRangePreference {
    fn from(opt: PriceOpt) -> Self {
        match opt {
            PriceOpt::Low => PriceRangePreference::Low,
            PriceOpt::MidLow => PriceRangePreference::MidLow,
            PriceOpt::Mid => PriceRangePreference::Mid,
            PriceOpt::MidHigh => PriceRangePreference::MidHigh,
            PriceOpt::High => PriceRangePreference::High,
            PriceOpt::Any => PriceRangePreference::Any,
        }
    }
}

/// Preference flags shared by `recommend` and `score`. Individual flags
/// override values loaded from `--preferences`.
#[derive(Args)]
pub struct PreferenceArgs {
    /// Path to a JSON or YAML preferences file
    #[arg(long)]
    pub preferences: Option<String>,

    /// Business category to open
    #[arg(long, value_enum)]
    pub category: Option<CategoryOpt>,

    /// Target customer segments (comma-separated)
    #[arg(long, value_enum, value_delimiter = ',')]
    pub segments: Option<Vec<SegmentOpt>>,

    /// Lower bound of the target per-person price band
    #[arg(long)]
    pub budget_min: Option<Decimal>,

    /// Upper bound of the target per-person price band
    #[arg(long)]
    pub budget_max: Option<Decimal>,

    /// Maximum acceptable competitor count
    #[arg(long)]
    pub max_competitors: Option<u32>,

    /// Minimum target-segment match percentage
    #[arg(long)]
    pub min_target_match: Option<Decimal>,

    /// Target customer gender
    #[arg(long, value_enum)]
    pub gender: Option<GenderOpt>,

    /// Minimum monthly revenue of a district
    #[arg(long)]
    pub revenue_min: Option<Decimal>,

    /// Maximum monthly revenue of a district
    #[arg(long)]
    pub revenue_max: Option<Decimal>,

    /// Preferred competition bucket
    #[arg(long, value_enum)]
    pub competition: Option<CompetitionOpt>,

    /// Subway accessibility requirement
    #[arg(long, value_enum)]
    pub subway: Option<SubwayOpt>,

    /// Main trading-hours preference
    #[arg(long, value_enum)]
    pub peak: Option<PeakOpt>,

    /// Weekday/weekend revenue preference
    #[arg(long, value_enum)]
    pub weekday: Option<WeekdayOpt>,

    /// Preferred price-point bucket
    #[arg(long, value_enum)]
    pub price_range: Option<PriceOpt>,

    /// Minimum merchant count for data reliability
    #[arg(long)]
    pub min_merchants: Option<u32>,

    /// Maximum acceptable monthly rent
    #[arg(long)]
    pub max_rent: Option<Decimal>,

    /// Number of recommendations to return
    #[arg(long)]
    pub top: Option<usize>,
}

impl PreferenceArgs {
    /// File values first, then per-flag overrides.
    pub fn resolve(&self) -> Result<Constraints, Box<dyn std::error::Error>> {
        let mut constraints: Constraints = match &self.preferences {
            Some(path) => input::read_preferences(path)?,
            None => Constraints::default(),
        };

        if let Some(category) = self.category {
            constraints.category = category.into();
        }
        if let Some(segments) = &self.segments {
            constraints.target_segments = segments.iter().map(|s| (*s).into()).collect();
        }
        if let Some(budget_min) = self.budget_min {
            constraints.budget_min = budget_min;
        }
        if let Some(budget_max) = self.budget_max {
            constraints.budget_max = budget_max;
        }
        if let Some(max_competitors) = self.max_competitors {
            constraints.max_competitors = max_competitors;
        }
        if let Some(min_target_match) = self.min_target_match {
            constraints.min_target_match = min_target_match;
        }
        if let Some(gender) = self.gender {
            constraints.gender_target = gender.into();
        }
        match (self.revenue_min, self.revenue_max) {
            (None, None) => {}
            (min, max) => {
                constraints.revenue_range = Some(RevenueBand {
                    min: min.unwrap_or(Decimal::ZERO),
                    max: max.unwrap_or(Decimal::MAX),
                });
            }
        }
        if let Some(competition) = self.competition {
            constraints.competition = competition.into();
        }
        if let Some(subway) = self.subway {
            constraints.subway = subway.into();
        }
        if let Some(peak) = self.peak {
            constraints.peak_time = peak.into();
        }
        if let Some(weekday) = self.weekday {
            constraints.weekday = weekday.into();
        }
        if let Some(price_range) = self.price_range {
            constraints.price_range = price_range.into();
        }
        if let Some(min_merchants) = self.min_merchants {
            constraints.min_merchants = min_merchants;
        }
        if let Some(max_rent) = self.max_rent {
            constraints.max_rent = Some(max_rent);
        }
        if let Some(top) = self.top {
            constraints.result_count = top;
        }

        Ok(constraints)
    }
}
