//! Village engine binary for the Hamlet simulation.
//!
//! Wires the configuration, the starting village, and the operator
//! controls together and runs the hour loop until a bound is hit, the
//! operator types `stop`, or the process receives Ctrl-C.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `$HAMLET_CONFIG` or `hamlet-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Build the starting village and register the villagers
//! 4. Create operator state from simulation bounds
//! 5. Install the Ctrl-C handler and the stdin operator console
//! 6. Run the hour loop
//! 7. Log the result

mod console;
mod error;
mod state_file;

use std::path::PathBuf;
use std::sync::Arc;

use hamlet_core::config::LoggingConfig;
use hamlet_core::runner;
use hamlet_core::{OperatorState, SimulationConfig, Village};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::state_file::StateFileCallback;

/// Environment variable naming an alternative config file.
const CONFIG_ENV: &str = "HAMLET_CONFIG";

/// Config file looked up in the working directory.
const DEFAULT_CONFIG_PATH: &str = "hamlet-config.yaml";

/// Application entry point for the village engine.
///
/// # Errors
///
/// Returns an error if any initialization step or the hour loop fails.
#[tokio::main]
async fn main() -> Result<(), EngineError> {
    // 1. Load configuration. Logging is not up yet, so the source is
    //    reported once the subscriber exists.
    let (config, source) = load_config()?;

    // 2. Initialize structured logging.
    init_logging(&config.logging)?;
    info!("hamlet-engine starting");
    match &source {
        Some(path) => info!(path = %path.display(), "Configuration loaded"),
        None => info!("Config file not found, using defaults"),
    }
    info!(
        village = config.world.name,
        seed = config.world.seed,
        villagers = config.villagers.len(),
        hour_interval_ms = config.world.hour_interval_ms,
        "Configuration summary"
    );

    // 3. Build the village.
    let mut village = Village::from_config(&config)?;
    info!(
        time = village.clock().label(),
        villagers = village.scheduler().agent_count(),
        storages = village.economy().all().count(),
        "Village ready"
    );

    // 4. Create operator state.
    let operator = Arc::new(OperatorState::new(
        config.world.hour_interval_ms,
        &config.simulation,
    ));

    // 5. Ctrl-C and the console's `stop` both end the run between hours.
    {
        let operator = Arc::clone(&operator);
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Interrupt received, stopping after the current hour");
                    operator.request_stop();
                }
                Err(e) => warn!(error = %e, "Failed to listen for Ctrl-C"),
            }
        });
    }

    let _console = console::spawn_console(
        Arc::clone(&operator),
        village.needs_config().restore_safety_amount,
    );
    info!("Operator console ready (pause, resume, speed <ms>, threat <tier>, restore [n], status, stop)");

    // 6. Run the hour loop.
    let mut callback = StateFileCallback::new(config.logging.state_file.clone());
    let result = runner::run_village(&mut village, &operator, &mut callback).await?;

    // 7. Log results.
    runner::log_run_end(&result);
    info!(
        end_reason = ?result.end_reason,
        total_hours = result.total_hours,
        snapshots_written = callback.writes(),
        "hamlet-engine shutdown complete"
    );

    Ok(())
}

/// Load the simulation configuration.
///
/// `$HAMLET_CONFIG` names the file when set; otherwise
/// `hamlet-config.yaml` in the working directory is used if present.
/// Returns the path that was read, or `None` when defaults apply.
fn load_config() -> Result<(SimulationConfig, Option<PathBuf>), EngineError> {
    let path = std::env::var(CONFIG_ENV)
        .ok()
        .filter(|v| !v.is_empty())
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);

    if path.exists() {
        let config = SimulationConfig::from_file(&path)?;
        Ok((config, Some(path)))
    } else {
        let mut config = SimulationConfig::default();
        config.logging.apply_env_overrides();
        Ok((config, None))
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_logging(logging: &LoggingConfig) -> Result<(), EngineError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&logging.level).map_err(|e| EngineError::Logging {
            message: format!("{e}"),
        })?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}
