use clap::Args;
use serde_json::Value;

use siterank_core::config::HeuristicProfile;
use siterank_core::flow::{analyze_flow, solve_max_flow, NetworkBuilder};
use siterank_core::types::{AdjacencyMap, MovementTable};

use crate::input;

/// Arguments for standalone flow-network analysis
#[derive(Args)]
pub struct FlowArgs {
    /// Path to a JSON array of district datasets (or pipe via stdin)
    #[arg(long)]
    pub locations: Option<String>,

    /// Path to a JSON pairwise movement table
    #[arg(long)]
    pub movement: Option<String>,

    /// Path to a JSON adjacency map of neighboring districts
    #[arg(long)]
    pub adjacency: Option<String>,

    /// Capacity heuristic profile
    #[arg(long, default_value = "estimated")]
    pub profile: String,
}

pub fn run_flow(args: FlowArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let locations = input::read_locations(args.locations.as_deref())?;
    let movement: Option<MovementTable> = match &args.movement {
        Some(path) => Some(input::read_json(path)?),
        None => None,
    };
    let adjacency: AdjacencyMap = match &args.adjacency {
        Some(path) => input::read_json(path)?,
        None => AdjacencyMap::new(),
    };
    let profile = HeuristicProfile::by_name(&args.profile)
        .ok_or_else(|| format!("unknown profile '{}'", args.profile))?;

    let network = NetworkBuilder::new(&profile, &adjacency).build(&locations, movement.as_ref())?;
    let info = network.info();
    let solution = solve_max_flow(network);
    let metrics = analyze_flow(&solution, locations.iter().map(|l| l.name.as_str()));

    Ok(serde_json::json!({
        "network": info,
        "max_flow": solution.max_flow,
        "districts": metrics,
    }))
}
