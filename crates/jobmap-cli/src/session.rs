//! Builds a loaded [`Session`] from configuration for one CLI invocation.

use anyhow::{bail, Context};
use jobmap_core::{load_cities, AppConfig, CityTable};
use jobmap_loader::{DataClient, DataSource};
use jobmap_search::{LoadStatus, Session};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// The configured centroid table, or the built-in one.
pub(crate) fn city_table(config: &AppConfig) -> anyhow::Result<CityTable> {
    match &config.cities_path {
        Some(path) => load_cities(path)
            .with_context(|| format!("failed to load cities from {}", path.display())),
        None => Ok(CityTable::builtin()),
    }
}

/// Fetch and load the job file once.
///
/// A failed load is an error; there is no retry beyond running the command
/// again.
pub(crate) async fn open(
    config: &AppConfig,
    cities: CityTable,
    source: Option<&str>,
    seed: Option<u64>,
) -> anyhow::Result<Session> {
    let source = DataSource::parse(source.unwrap_or(&config.data_source));
    let client = DataClient::new(&config.user_agent).context("failed to build HTTP client")?;

    let mut session = Session::from_config(config, cities);
    let ticket = session.begin_load();
    let fetched = client.fetch_text(&source).await;

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    session.complete_load(ticket, fetched, &mut rng);

    if let LoadStatus::Failed(message) = session.status() {
        bail!("failed to load job data from {source}: {message}");
    }
    tracing::info!(
        %source,
        records = session.records().len(),
        diagnostics = session.diagnostics().len(),
        "job data ready"
    );
    Ok(session)
}
