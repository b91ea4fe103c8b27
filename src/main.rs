use std::path::PathBuf;

use clap::Parser;
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use trip_line::collab::Services;
use trip_line::config::Config;
use trip_line::tools::{read_file, write_file};
use trip_line::travel::{DEFAULT_MAX_REVISIONS, TripPlanner, Variant};
use trip_line::{Ctx, TripState};

const DEFAULT_DESTINATION: &str = "Kyoto, Japan";
const DEFAULT_INTERESTS: &str = "History, Matcha tea, and calm nature";

/// Plan a 3-day trip from web search results and a chat model.
///
/// Credentials come from the environment (or a `.env` file): TAVILY_API_KEY
/// enables search, GROQ_API_KEY plus GROQ_MODEL enable the planner model.
/// Anything missing is skipped and the plan falls back to a template.
#[derive(Parser, Debug)]
#[command(name = "trip-line", version)]
struct Cli {
    /// Where to go
    #[arg(short, long)]
    destination: Option<String>,

    /// What the traveller enjoys
    #[arg(short, long)]
    interests: Option<String>,

    /// Total budget in whole currency units
    #[arg(short, long)]
    budget: Option<u32>,

    /// How many times an over-budget plan may be reworked
    #[arg(long, default_value_t = DEFAULT_MAX_REVISIONS)]
    max_revisions: u32,

    /// Run the straight pipeline without the budget loop
    #[arg(long)]
    simple: bool,

    /// JSON file with seed fields; flags override it
    #[arg(long)]
    seed: Option<PathBuf>,

    /// Also write the itinerary to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the whole final state as JSON instead of the itinerary
    #[arg(long)]
    json: bool,
}

/// What a `--seed` file may set. Everything else in the state belongs to
/// the steps, so other keys are rejected.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SeedFile {
    destination: Option<String>,
    interests: Option<String>,
    budget: Option<u32>,
}

impl Cli {
    fn seed_state(&self) -> Result<TripState, Box<dyn std::error::Error>> {
        let file: SeedFile = match &self.seed {
            Some(path) => serde_json::from_str(&read_file(path)?)?,
            None => SeedFile::default(),
        };

        let destination = self
            .destination
            .clone()
            .or(file.destination)
            .unwrap_or_else(|| DEFAULT_DESTINATION.to_string());
        let interests = self
            .interests
            .clone()
            .or(file.interests)
            .unwrap_or_else(|| DEFAULT_INTERESTS.to_string());

        let mut state = TripState::seed(destination, interests);
        state.budget = self.budget.or(file.budget);
        Ok(state)
    }

    fn variant(&self) -> Variant {
        if self.simple {
            Variant::Simple
        } else {
            Variant::BudgetAware {
                max_revisions: self.max_revisions,
            }
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout carries only the plan.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trip_line=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let seed = cli.seed_state()?;

    let config = Config::from_env();
    tracing::debug!(?config, "configuration loaded");
    let services = Services::from_config(&config);

    let destination = seed.destination.clone().unwrap_or_default();
    tracing::info!(
        %destination,
        budget = ?seed.budget,
        variant = ?cli.variant(),
        "starting trip planner"
    );

    let mut planner = TripPlanner::new(&services, cli.variant())?.with_tracing();
    let mut ctx = Ctx::new();
    let result = planner.plan(seed, &mut ctx)?;

    tracing::info!(
        steps = ctx.path().len(),
        revisions = result.revision_count,
        over_budget = result.itinerary.as_ref().is_some_and(|i| i.needs_revision()),
        "planning finished"
    );

    let itinerary = result
        .itinerary_text()
        .unwrap_or("[no itinerary returned]")
        .to_string();

    if let Some(path) = &cli.output {
        write_file(path, &itinerary)?;
        tracing::info!(path = %path.display(), "itinerary written");
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", "=".repeat(50));
        println!("FINAL ITINERARY: {destination}");
        println!("{}", "=".repeat(50));
        println!("{itinerary}");
    }

    Ok(())
}
