//! End-to-end recommendation pipeline.
//!
//! Wires the stages together: flow network → max flow → flow metrics →
//! objectives → normalization → Pareto front → constraint filters → ranking.
//! Single-threaded and purely functional over the immutable inputs; a
//! `Recommender` can serve concurrent requests because every invocation
//! builds its own network, flow, and objective maps.

use std::collections::BTreeMap;
use std::time::Instant;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::{HeuristicProfile, ScoringConfig};
use crate::flow::{analyze_flow, solve_max_flow, FlowMetrics, NetworkBuilder, NetworkInfo};
use crate::scoring::{
    normalize_objectives, LocationObjectives, ObjectiveCalculator, ObjectiveVector, SubScores,
};
use crate::selection::{pareto_front, rank_candidates, FilterChain, FilterKind};
use crate::types::{
    with_metadata, AdjacencyMap, ComputationOutput, Constraints, DisplayMetrics, LocationDataset,
    MovementTable, TimeSlot,
};
use crate::SiteRankError;
use crate::SiteRankResult;

/// Raw and normalized objective values carried on a recommendation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectiveVectorPair {
    pub raw: ObjectiveVector,
    pub normalized: ObjectiveVector,
}

/// Final per-district record returned to the caller. Immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResult {
    pub name: String,
    pub region: String,
    /// Preference-weighted scalar score over normalized objectives.
    pub score: Decimal,
    pub objectives: ObjectiveVectorPair,
    pub subscores: SubScores,
    pub metrics: DisplayMetrics,
}

/// Full pipeline output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationReport {
    /// Ordered recommendations, at most the requested count. Empty is a
    /// normal outcome the caller should answer with constraint relaxation.
    pub recommendations: Vec<RecommendationResult>,
    pub max_flow: u64,
    pub network: NetworkInfo,
    /// Filters skipped because strict application would have emptied the
    /// candidate set.
    pub skipped_filters: Vec<FilterKind>,
    /// True when the Pareto front was too small and the full candidate set
    /// was ranked instead.
    pub used_full_candidate_fallback: bool,
    /// True when the filtered set fell short of the requested count and the
    /// chain output was replaced by the minimally-viable candidate set.
    pub constraints_relaxed: bool,
}

/// The engine facade. Construct once, call per request.
#[derive(Debug, Clone)]
pub struct Recommender {
    config: ScoringConfig,
    profile: HeuristicProfile,
}

impl Recommender {
    pub fn new(config: ScoringConfig, profile: HeuristicProfile) -> Self {
        Recommender { config, profile }
    }

    pub fn with_defaults() -> Self {
        Recommender::new(ScoringConfig::default(), HeuristicProfile::default())
    }

    /// Run the full pipeline for one request.
    pub fn recommend(
        &self,
        locations: &[LocationDataset],
        movement: Option<&MovementTable>,
        adjacency: &AdjacencyMap,
        constraints: &Constraints,
    ) -> SiteRankResult<ComputationOutput<RecommendationReport>> {
        let start = Instant::now();
        let mut warnings = Vec::new();

        validate_unique_names(locations)?;

        // 1. Flow network + max flow + per-district flow metrics.
        let network = NetworkBuilder::new(&self.profile, adjacency).build(locations, movement)?;
        let network_info = network.info();
        let solution = solve_max_flow(network);
        let flow_metrics = analyze_flow(&solution, locations.iter().map(|l| l.name.as_str()));

        // 2. Objectives, raw and normalized.
        let calculator = ObjectiveCalculator::new(&self.config);
        let objectives: BTreeMap<String, LocationObjectives> = locations
            .iter()
            .map(|loc| {
                let scored = calculator.calculate(loc, constraints, flow_metrics.get(&loc.name));
                (loc.name.clone(), scored)
            })
            .collect();
        let raw_vectors = objectives
            .iter()
            .map(|(name, scored)| (name.clone(), scored.vector.clone()))
            .collect::<BTreeMap<_, _>>();
        let normalized = normalize_objectives(&raw_vectors);

        // 3. Pareto front, with the documented too-small fallback.
        let front = pareto_front(&normalized, true);
        let (eligible, used_full_candidate_fallback) =
            if front.len() < self.config.min_pareto_size && front.len() < locations.len() {
                warnings.push(format!(
                    "Pareto front has {} candidates (minimum {}); ranking the full candidate set",
                    front.len(),
                    self.config.min_pareto_size
                ));
                (raw_vectors.keys().cloned().collect::<Vec<_>>(), true)
            } else {
                (front, false)
            };

        // 4. Constraint filter chain.
        let by_name: BTreeMap<String, &LocationDataset> = locations
            .iter()
            .map(|loc| (loc.name.clone(), loc))
            .collect();
        let chain = FilterChain::new(&self.config.criteria);
        let outcome = chain.apply(eligible.clone(), &by_name, constraints);
        for kind in &outcome.skipped {
            warnings.push(format!(
                "'{}' filter would have eliminated every candidate and was skipped",
                kind
            ));
        }

        // 5. Relax when the chain leaves fewer candidates than requested.
        let mut candidates = outcome.passed;
        let mut constraints_relaxed = false;
        if candidates.len() < constraints.result_count {
            let relaxed: Vec<String> = eligible
                .iter()
                .filter(|name| {
                    by_name
                        .get(name.as_str())
                        .map(|loc| loc.commercial.merchant_count(constraints.category) >= 1)
                        .unwrap_or(false)
                })
                .cloned()
                .collect();
            if relaxed.len() > candidates.len() {
                warnings.push(format!(
                    "filters left {} of {} requested candidates; relaxing to every \
                     district with an active market",
                    candidates.len(),
                    constraints.result_count
                ));
                candidates = relaxed;
                constraints_relaxed = true;
            }
        }

        // 6. Rank and materialize results.
        let ranked = rank_candidates(&candidates, &normalized, &self.config.weights, constraints);
        let recommendations = ranked
            .into_iter()
            .take(constraints.result_count)
            .map(|candidate| {
                let location = by_name[&candidate.name];
                let scored = &objectives[&candidate.name];
                build_result(
                    location,
                    constraints,
                    candidate.score,
                    scored,
                    normalized.get(&candidate.name),
                    flow_metrics.get(&candidate.name),
                )
            })
            .collect::<Vec<_>>();

        if recommendations.is_empty() {
            warnings.push("no districts satisfied the request; consider relaxing constraints".into());
        }

        let report = RecommendationReport {
            recommendations,
            max_flow: solution.max_flow,
            network: network_info,
            skipped_filters: outcome.skipped,
            used_full_candidate_fallback,
            constraints_relaxed,
        };

        let elapsed_us = start.elapsed().as_micros() as u64;
        Ok(with_metadata(
            "capacitated max-flow (Edmonds-Karp) + min-max normalization + \
             Pareto filtering + preference-weighted ranking",
            &PipelineAssumptions {
                profile: self.profile.clone(),
                config: self.config.clone(),
            },
            warnings,
            elapsed_us,
            report,
        ))
    }
}

#[derive(Debug, Clone, Serialize)]
struct PipelineAssumptions {
    profile: HeuristicProfile,
    config: ScoringConfig,
}

fn validate_unique_names(locations: &[LocationDataset]) -> SiteRankResult<()> {
    let mut seen = std::collections::BTreeSet::new();
    for loc in locations {
        if !seen.insert(loc.name.as_str()) {
            return Err(SiteRankError::InvalidInput {
                field: "locations".into(),
                reason: format!("duplicate district name '{}'", loc.name),
            });
        }
    }
    Ok(())
}

fn build_result(
    location: &LocationDataset,
    constraints: &Constraints,
    score: Decimal,
    scored: &LocationObjectives,
    normalized: Option<&ObjectiveVector>,
    flow: Option<&FlowMetrics>,
) -> RecommendationResult {
    let merchant_count = location.commercial.merchant_count(constraints.category);
    let store_divisor = Decimal::from(merchant_count.max(1));

    let (monthly_revenue, transaction_count, close_rate, morning_share, weekday_share) =
        match &location.sales {
            Some(sales) => (
                sales.monthly_revenue,
                sales.transaction_count,
                sales.close_rate,
                sales.time_share(TimeSlot::Morning),
                sales.weekday_ratio(),
            ),
            None => (
                Decimal::ZERO,
                0,
                Decimal::ZERO,
                Decimal::ZERO,
                Decimal::ZERO,
            ),
        };

    RecommendationResult {
        name: location.name.clone(),
        region: location.region.clone(),
        score,
        objectives: ObjectiveVectorPair {
            raw: scored.vector.clone(),
            normalized: normalized.cloned().unwrap_or_default(),
        },
        subscores: scored.subscores.clone(),
        metrics: DisplayMetrics {
            monthly_revenue,
            revenue_per_store: monthly_revenue / store_divisor,
            transaction_count,
            price_point: location.commercial.price_point(constraints.category),
            merchant_count,
            close_rate,
            female_ratio: location.female_ratio(),
            subway_access: location.subway_access,
            morning_share,
            weekday_share,
            hourly_inflow: flow.map(|m| m.total_inflow).unwrap_or(0),
        },
    }
}
