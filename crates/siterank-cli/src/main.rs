mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::flow::FlowArgs;
use commands::recommend::RecommendArgs;
use commands::score::ScoreArgs;

/// Business-site location recommendations
#[derive(Parser)]
#[command(
    name = "siterank",
    version,
    about = "Rank candidate business-site districts for a prospective owner",
    long_about = "Ranks candidate districts for a new business using a capacitated \
                  customer-flow network (Edmonds-Karp max flow), multi-objective \
                  scoring with Pareto filtering, and a preference-weighted final \
                  ranking. All arithmetic is decimal-precise and deterministic."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full recommendation pipeline over a district dataset
    Recommend(RecommendArgs),
    /// Build and solve the customer-flow network only
    Flow(FlowArgs),
    /// Compute raw and normalized objective vectors without ranking
    Score(ScoreArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Recommend(args) => commands::recommend::run_recommend(args),
        Commands::Flow(args) => commands::flow::run_flow(args),
        Commands::Score(args) => commands::score::run_score(args),
        Commands::Version => {
            println!("siterank {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
