//! Target-customer match scoring.
//!
//! Each requested segment maps the district's demographic breakdown to a
//! 0–100 score; the overall match is the plain average over requested
//! segments. No segments requested → neutral 50: without a stated target
//! there is nothing to discriminate on.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::category::CustomerSegment;
use crate::types::{PopulationMetrics, Score};

/// Average match over the requested segments.
pub fn target_match_score(population: &PopulationMetrics, segments: &[CustomerSegment]) -> Score {
    if segments.is_empty() {
        return dec!(50);
    }
    let total: Decimal = segments
        .iter()
        .map(|segment| segment_score(population, *segment))
        .sum();
    total / Decimal::from(segments.len() as u64)
}

fn segment_score(population: &PopulationMetrics, segment: CustomerSegment) -> Score {
    let ages = &population.age_distribution;
    match segment {
        // Working-age bands dominate, with a non-resident kicker for
        // commuter districts.
        CustomerSegment::OfficeWorkers => {
            let working_age = ages.twenties * dec!(0.3)
                + ages.thirties * dec!(0.3)
                + ages.forties * dec!(0.2)
                + ages.fifties * dec!(0.2);
            working_age * dec!(0.8) + population.non_resident_ratio * dec!(0.2)
        }
        CustomerSegment::Students => ages.teens * dec!(0.2) + ages.twenties * dec!(0.8),
        CustomerSegment::Residents => population.resident_ratio,
        CustomerSegment::Tourists => {
            let mut score = population.non_resident_ratio;
            if population.designated_tourist_zone {
                score += dec!(30);
            }
            score.min(dec!(100))
        }
    }
}
