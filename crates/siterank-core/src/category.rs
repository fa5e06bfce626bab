//! Business and customer taxonomy.
//!
//! Every per-category heuristic the engine needs (ideal competitor count,
//! typical party size, market share, plausible price band) is a total
//! function over [`BusinessCategory`], so a missing table entry is a
//! compile error rather than a silent default.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::Money;

/// Business category a prospective owner wants to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BusinessCategory {
    Cafe,
    Restaurant,
    Bar,
    ConvenienceStore,
    Academy,
    HairSalon,
    Pharmacy,
    Gym,
}

impl BusinessCategory {
    pub const ALL: [BusinessCategory; 8] = [
        BusinessCategory::Cafe,
        BusinessCategory::Restaurant,
        BusinessCategory::Bar,
        BusinessCategory::ConvenienceStore,
        BusinessCategory::Academy,
        BusinessCategory::HairSalon,
        BusinessCategory::Pharmacy,
        BusinessCategory::Gym,
    ];

    /// Competitor count at which the inverted-U competition score peaks.
    /// Below this a district is under-proven, above it saturated.
    pub fn ideal_competitors(self) -> u32 {
        match self {
            BusinessCategory::Cafe => 40,
            BusinessCategory::Restaurant => 50,
            BusinessCategory::Bar => 30,
            BusinessCategory::ConvenienceStore => 20,
            BusinessCategory::Academy => 15,
            BusinessCategory::HairSalon => 25,
            BusinessCategory::Pharmacy => 10,
            BusinessCategory::Gym => 8,
        }
    }

    /// Average persons covered by a single payment.
    pub fn party_size(self) -> Decimal {
        match self {
            BusinessCategory::Cafe => dec!(1.2),
            BusinessCategory::Restaurant => dec!(2.5),
            BusinessCategory::Bar => dec!(3.0),
            BusinessCategory::ConvenienceStore => dec!(1.1),
            BusinessCategory::Academy => dec!(1.0),
            BusinessCategory::HairSalon => dec!(1.0),
            BusinessCategory::Pharmacy => dec!(1.2),
            BusinessCategory::Gym => dec!(1.0),
        }
    }

    /// Share of total district revenue the category typically captures.
    /// Used to back out a category price point from area-wide payments.
    pub fn revenue_share(self) -> Decimal {
        match self {
            BusinessCategory::Cafe => dec!(0.05),
            BusinessCategory::Restaurant => dec!(0.25),
            BusinessCategory::Bar => dec!(0.10),
            BusinessCategory::ConvenienceStore => dec!(0.03),
            BusinessCategory::Academy => dec!(0.05),
            BusinessCategory::HairSalon => dec!(0.02),
            BusinessCategory::Pharmacy => dec!(0.02),
            BusinessCategory::Gym => dec!(0.01),
        }
    }

    /// Share of total district merchants the category typically holds.
    /// Used to estimate competitor count when category stats are missing.
    pub fn merchant_share(self) -> Decimal {
        match self {
            BusinessCategory::Cafe => dec!(0.15),
            BusinessCategory::Restaurant => dec!(0.25),
            BusinessCategory::Bar => dec!(0.10),
            BusinessCategory::ConvenienceStore => dec!(0.05),
            BusinessCategory::Academy => dec!(0.05),
            BusinessCategory::HairSalon => dec!(0.08),
            BusinessCategory::Pharmacy => dec!(0.02),
            BusinessCategory::Gym => dec!(0.02),
        }
    }

    /// Lowest per-person price point considered plausible.
    pub fn price_floor(self) -> Money {
        match self {
            BusinessCategory::Cafe => dec!(3000),
            BusinessCategory::Restaurant => dec!(8000),
            BusinessCategory::ConvenienceStore => dec!(2000),
            _ => dec!(5000),
        }
    }

    /// Highest per-person price point considered plausible.
    pub fn price_ceiling(self) -> Money {
        match self {
            BusinessCategory::Cafe => dec!(20000),
            BusinessCategory::Restaurant => dec!(50000),
            BusinessCategory::ConvenienceStore => dec!(15000),
            _ => dec!(100000),
        }
    }

    /// Price point assumed when no payment data exists at all.
    pub fn fallback_price(self) -> Money {
        match self {
            BusinessCategory::Cafe => dec!(6000),
            BusinessCategory::Restaurant => dec!(12000),
            BusinessCategory::Bar => dec!(25000),
            BusinessCategory::ConvenienceStore => dec!(4000),
            BusinessCategory::Academy => dec!(150000),
            BusinessCategory::HairSalon => dec!(30000),
            BusinessCategory::Pharmacy => dec!(8000),
            BusinessCategory::Gym => dec!(50000),
        }
    }
}

impl std::fmt::Display for BusinessCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            BusinessCategory::Cafe => "cafe",
            BusinessCategory::Restaurant => "restaurant",
            BusinessCategory::Bar => "bar",
            BusinessCategory::ConvenienceStore => "convenience store",
            BusinessCategory::Academy => "academy",
            BusinessCategory::HairSalon => "hair salon",
            BusinessCategory::Pharmacy => "pharmacy",
            BusinessCategory::Gym => "gym",
        };
        write!(f, "{}", label)
    }
}

/// Customer segment the owner wants to attract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CustomerSegment {
    OfficeWorkers,
    Students,
    Residents,
    Tourists,
}

/// Categorical commercial-activity level reported for a district.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ActivityLevel {
    VeryLow,
    Low,
    #[default]
    Moderate,
    High,
    VeryHigh,
}

impl ActivityLevel {
    /// Fixed label → score table.
    pub fn score(self) -> Decimal {
        match self {
            ActivityLevel::VeryLow => dec!(20),
            ActivityLevel::Low => dec!(40),
            ActivityLevel::Moderate => dec!(60),
            ActivityLevel::High => dec!(80),
            ActivityLevel::VeryHigh => dec!(100),
        }
    }
}
