use std::collections::BTreeMap;

use clap::Args;
use serde_json::Value;

use siterank_core::config::ScoringConfig;
use siterank_core::scoring::{normalize_objectives, ObjectiveCalculator};

use crate::commands::prefs::PreferenceArgs;
use crate::input;

/// Arguments for objective scoring without filtering or ranking
#[derive(Args)]
pub struct ScoreArgs {
    /// Path to a JSON array of district datasets (or pipe via stdin)
    #[arg(long)]
    pub locations: Option<String>,

    #[command(flatten)]
    pub prefs: PreferenceArgs,
}

pub fn run_score(args: ScoreArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let locations = input::read_locations(args.locations.as_deref())?;
    let constraints = args.prefs.resolve()?;

    let config = ScoringConfig::default();
    let calculator = ObjectiveCalculator::new(&config);

    let scored: BTreeMap<String, _> = locations
        .iter()
        .map(|loc| (loc.name.clone(), calculator.calculate(loc, &constraints, None)))
        .collect();
    let raw = scored
        .iter()
        .map(|(name, s)| (name.clone(), s.vector.clone()))
        .collect::<BTreeMap<_, _>>();
    let normalized = normalize_objectives(&raw);

    let districts: Vec<Value> = scored
        .values()
        .map(|s| {
            serde_json::json!({
                "name": s.name,
                "objectives": s.vector,
                "normalized": normalized.get(&s.name),
                "subscores": s.subscores,
            })
        })
        .collect();

    Ok(serde_json::json!({ "districts": districts }))
}
