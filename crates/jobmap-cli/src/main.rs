mod commands;
mod session;

use clap::{Parser, Subcommand};
use jobmap_core::{BoundingBox, Coordinates, ExperienceLevel, JobType, DISTANCE_OPTIONS_MILES};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "jobmap")]
#[command(about = "Browse a job file as map clusters and employer groups")]
struct Cli {
    /// Job file path or http(s) URL; overrides JOBMAP_DATA_SOURCE
    #[arg(long, global = true)]
    source: Option<String>,
    /// Seed for coordinate synthesis, so cluster ids repeat across runs
    #[arg(long, global = true)]
    seed: Option<u64>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Filtered employer groups, nearest first
    Groups {
        /// Case-insensitive text matched against title, company and description
        #[arg(long)]
        search: Option<String>,
        /// Full Time, Part Time, Contract (or "all")
        #[arg(long, default_value = "all")]
        job_type: JobType,
        /// Internship, Apprenticeship, Entry Level, Senior Level (or "all")
        #[arg(long, default_value = "all")]
        experience: ExperienceLevel,
        /// Drop employers farther than this many miles (5, 10, 25, 50, 100, 200, 300, 400 or 500)
        #[arg(long, value_parser = parse_max_distance)]
        max_distance: Option<f64>,
        /// User location as "lat,lng"
        #[arg(long, value_parser = parse_coordinates, allow_hyphen_values = true)]
        near: Option<Coordinates>,
    },
    /// Map markers visible in a viewport
    Clusters {
        /// Viewport as "west,south,east,north"; defaults to the fitted view
        #[arg(long, allow_hyphen_values = true)]
        bbox: Option<BoundingBox>,
        /// Map zoom; defaults to the fitted zoom
        #[arg(long)]
        zoom: Option<f64>,
    },
    /// Zoom target and postings of one cluster
    Expand {
        /// Cluster id from `clusters` output (same --seed)
        cluster_id: u32,
    },
    /// List the known city centroids
    Cities,
}

fn parse_coordinates(s: &str) -> Result<Coordinates, String> {
    let (lat, lng) = s
        .split_once(',')
        .ok_or_else(|| format!("expected \"lat,lng\", got {s:?}"))?;
    let lat: f64 = lat.trim().parse().map_err(|e| format!("bad latitude: {e}"))?;
    let lng: f64 = lng.trim().parse().map_err(|e| format!("bad longitude: {e}"))?;
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return Err(format!("coordinates out of range: {lat},{lng}"));
    }
    Ok(Coordinates::new(lat, lng))
}

fn parse_max_distance(s: &str) -> Result<f64, String> {
    let miles: f64 = s.trim().parse().map_err(|e| format!("bad distance: {e}"))?;
    if DISTANCE_OPTIONS_MILES.contains(&miles) {
        Ok(miles)
    } else {
        let options: Vec<String> = DISTANCE_OPTIONS_MILES.iter().map(f64::to_string).collect();
        Err(format!("distance must be one of {} miles", options.join(", ")))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = jobmap_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::debug!(env = %config.env, "configuration loaded");
    let cities = session::city_table(&config)?;

    let Some(command) = cli.command else {
        println!("jobmap ready; run `jobmap --help` for commands");
        return Ok(());
    };

    let source = cli.source.as_deref();
    match command {
        Commands::Cities => commands::run_cities(&cities),
        Commands::Groups {
            search,
            job_type,
            experience,
            max_distance,
            near,
        } => {
            let mut session = session::open(&config, cities, source, cli.seed).await?;
            let args = commands::GroupArgs {
                search,
                job_type,
                experience,
                max_distance,
                near,
            };
            commands::run_groups(&mut session, &args)
        }
        Commands::Clusters { bbox, zoom } => {
            let mut session = session::open(&config, cities, source, cli.seed).await?;
            commands::run_clusters(&mut session, &config, bbox, zoom)
        }
        Commands::Expand { cluster_id } => {
            let session = session::open(&config, cities, source, cli.seed).await?;
            commands::run_expand(&session, cluster_id)
        }
    }
}
