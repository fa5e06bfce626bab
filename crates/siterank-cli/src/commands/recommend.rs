use clap::Args;
use serde_json::Value;

use siterank_core::config::{HeuristicProfile, ScoringConfig};
use siterank_core::types::{AdjacencyMap, MovementTable};
use siterank_core::Recommender;

use crate::commands::prefs::PreferenceArgs;
use crate::input;

/// Arguments for the full recommendation pipeline
#[derive(Args)]
pub struct RecommendArgs {
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

    #[command(flatten)]
    pub prefs: PreferenceArgs,
}

pub fn run_recommend(args: RecommendArgs) -> Result<Value, Box<dyn std::error::Error>> {
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
    let constraints = args.prefs.resolve()?;

    let recommender = Recommender::new(ScoringConfig::default(), profile);
    let output = recommender.recommend(&locations, movement.as_ref(), &adjacency, &constraints)?;
    Ok(serde_json::to_value(output)?)
}
