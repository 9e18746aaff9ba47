use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use travelbot_agents::TravelPlanner;
use travelbot_core::{PlanRequest, PoiCatalog};
use travelbot_enrichment::{EnrichmentConfig, EnrichmentStack, GoogleMapsClient, OpenAiNarrator};
use travelbot_observability::{init_tracing, AppMetrics};

#[derive(Debug, Parser)]
#[command(name = "travelbot")]
#[command(about = "TravelBot itinerary planner CLI")]
struct Cli {
    /// JSON POI catalog to use instead of the built-in sample.
    #[arg(long, global = true, env = "TRAVELBOT_CATALOG_PATH")]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    Plan {
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        days: Option<i64>,
        #[arg(long = "interest")]
        interests: Vec<String>,
        #[arg(long)]
        with_kids: bool,
        #[arg(long)]
        budget: Option<String>,
        #[arg(long)]
        max_walk_min: Option<i64>,
        #[arg(long)]
        style: Option<String>,
        #[arg(long)]
        num_plans: Option<i64>,
    },
    Cities,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing("travelbot_cli");
    let cli = Cli::parse();

    let planner = build_planner(cli.catalog.as_deref())?;

    match cli.command {
        Command::Plan {
            city,
            days,
            interests,
            with_kids,
            budget,
            max_walk_min,
            style,
            num_plans,
        } => {
            let request = PlanRequest {
                city,
                days,
                interests: (!interests.is_empty()).then_some(interests),
                with_kids: Some(with_kids),
                budget,
                max_walk_min,
                travel_style: style,
                num_plans,
                with_summary: None,
            }
            .resolve()
            .context("invalid plan preferences")?;

            let response = planner.plan(request).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Command::Cities => {
            println!("{}", serde_json::to_string_pretty(&planner.cities())?);
        }
    }

    Ok(())
}

fn build_planner(
    catalog_path: Option<&Path>,
) -> Result<TravelPlanner<GoogleMapsClient, OpenAiNarrator>> {
    let catalog = match catalog_path {
        Some(path) => Arc::new(
            PoiCatalog::from_path(path)
                .with_context(|| format!("failed loading POI catalog from {}", path.display()))?,
        ),
        None => PoiCatalog::builtin(),
    };

    let stack = EnrichmentStack::from_config(EnrichmentConfig::from_env())?;

    Ok(TravelPlanner::new(
        catalog,
        Arc::new(stack.maps),
        Arc::new(stack.narrator),
        AppMetrics::shared(),
    ))
}
