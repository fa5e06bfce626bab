use napi::Result as NapiResult;
use napi_derive::napi;

use siterank_core::config::{HeuristicProfile, ScoringConfig};
use siterank_core::flow::{analyze_flow, solve_max_flow, NetworkBuilder};
use siterank_core::types::{AdjacencyMap, Constraints, LocationDataset, MovementTable};
use siterank_core::Recommender;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Recommendation pipeline
// ---------------------------------------------------------------------------

#[napi]
pub fn recommend_sites(
    locations_json: String,
    constraints_json: String,
    movement_json: Option<String>,
    adjacency_json: Option<String>,
) -> NapiResult<String> {
    let locations: Vec<LocationDataset> =
        serde_json::from_str(&locations_json).map_err(to_napi_error)?;
    let constraints: Constraints =
        serde_json::from_str(&constraints_json).map_err(to_napi_error)?;
    let movement: Option<MovementTable> = movement_json
        .map(|json| serde_json::from_str(&json))
        .transpose()
        .map_err(to_napi_error)?;
    let adjacency: AdjacencyMap = adjacency_json
        .map(|json| serde_json::from_str(&json))
        .transpose()
        .map_err(to_napi_error)?
        .unwrap_or_default();

    let recommender = Recommender::new(ScoringConfig::default(), HeuristicProfile::default());
    let output = recommender
        .recommend(&locations, movement.as_ref(), &adjacency, &constraints)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Flow analysis
// ---------------------------------------------------------------------------

#[napi]
pub fn analyze_customer_flow(
    locations_json: String,
    movement_json: Option<String>,
    profile_name: Option<String>,
) -> NapiResult<String> {
    let locations: Vec<LocationDataset> =
        serde_json::from_str(&locations_json).map_err(to_napi_error)?;
    let movement: Option<MovementTable> = movement_json
        .map(|json| serde_json::from_str(&json))
        .transpose()
        .map_err(to_napi_error)?;
    let profile = match profile_name {
        Some(name) => HeuristicProfile::by_name(&name)
            .ok_or_else(|| to_napi_error(format!("unknown profile '{}'", name)))?,
        None => HeuristicProfile::default(),
    };

    let adjacency = AdjacencyMap::new();
    let network = NetworkBuilder::new(&profile, &adjacency)
        .build(&locations, movement.as_ref())
        .map_err(to_napi_error)?;
    let info = network.info();
    let solution = solve_max_flow(network);
    let metrics = analyze_flow(&solution, locations.iter().map(|l| l.name.as_str()));

    serde_json::to_string(&serde_json::json!({
        "network": info,
        "max_flow": solution.max_flow,
        "districts": metrics,
    }))
    .map_err(to_napi_error)
}
