//! Universe engine binary for Outpost.
//!
//! Loads the universe document from `PostgreSQL`, replays offline time,
//! and ticks until Ctrl-C, then saves once more and exits.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `outpost-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Validate the catalog and configuration (fatal on failure)
//! 4. Connect to `PostgreSQL` and run migrations
//! 5. Load the universe and seed starter bodies
//! 6. Catch up and start the tick loop
//! 7. Wait for Ctrl-C, stop the loop, save

mod error;

use std::path::Path;
use std::sync::Arc;

use outpost_catalog::Catalog;
use outpost_core::{SimulationConfig, SystemClock, Universe};
use outpost_db::{PostgresConfig, PostgresPool};
use outpost_types::UniverseState;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

/// Path of the optional configuration file.
const CONFIG_PATH: &str = "outpost-config.yaml";

/// Application entry point for the engine.
///
/// # Errors
///
/// Returns an error if any startup step fails, or if the final save on
/// shutdown fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration (before logging so its level can apply).
    let (config, from_file) = load_config()?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("outpost-engine starting");
    if !from_file {
        info!("Config file not found, using defaults");
    }

    run(config).await?;
    Ok(())
}

async fn run(config: SimulationConfig) -> Result<(), EngineError> {
    // 3. Validate catalog and configuration.
    let catalog = Arc::new(Catalog::standard()?);
    config.validate(&catalog)?;
    info!(
        tick_dt = config.universe.tick_dt,
        autosave_dt = config.universe.autosave_dt,
        catchup_max = config.universe.catchup_max,
        materials = catalog.materials().count(),
        modules = catalog.modules().count(),
        "Configuration loaded"
    );

    // 4. Connect to PostgreSQL.
    let pg_config = PostgresConfig::from_infrastructure(&config.infrastructure);
    let pool = PostgresPool::connect(&pg_config).await?;
    pool.run_migrations().await?;

    let store = pool.universe_store();
    store.ensure_row(&UniverseState::default()).await?;

    // 5. Load the universe.
    let universe = Universe::load(
        Arc::new(store),
        Arc::new(SystemClock),
        Arc::clone(&catalog),
        &config,
    )
    .await?;
    if universe.ensure_bootstrap_world().await? {
        info!("Starter world created");
    }

    // 6. Catch up and start ticking.
    let report = universe.start().await?;
    info!(
        offline_secs = report.offline,
        replayed_secs = report.replayed,
        "Universe running"
    );

    // 7. Run until Ctrl-C.
    let signal = tokio::signal::ctrl_c().await;
    info!("Shutdown requested");
    let stopped = universe.stop().await;
    let metrics = universe.metrics().await;
    info!(
        sim_time = universe.sim_time().await,
        ticks = metrics.ticks,
        saves = metrics.saves,
        events_processed = metrics.events_processed,
        events_dropped = metrics.events_dropped,
        "Universe stopped"
    );
    pool.close().await;

    signal?;
    stopped?;
    Ok(())
}

/// Load configuration from `outpost-config.yaml`.
///
/// Falls back to defaults if the file does not exist. `DATABASE_URL`
/// overrides the configured database either way. Returns whether the
/// file was found.
fn load_config() -> Result<(SimulationConfig, bool), EngineError> {
    let config_path = Path::new(CONFIG_PATH);
    if config_path.exists() {
        Ok((SimulationConfig::from_file(config_path)?, true))
    } else {
        let mut config = SimulationConfig::default();
        config.infrastructure.apply_env_overrides();
        Ok((config, false))
    }
}
