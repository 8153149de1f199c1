//! Homestead engine binary.
//!
//! Headless host for a single-player farm. Startup order:
//!
//! 1. Load configuration from `homestead-config.yaml` (or the path in
//!    `HOMESTEAD_CONFIG`). A missing file means the stock game.
//! 2. Initialize tracing.
//! 3. Validate the configuration into the immutable game rules.
//! 4. Load the save, settling the time the player was away, or start a
//!    new game.
//! 5. Run growth refreshes and autosaves until Ctrl-C, then save once more.

mod error;
mod log_observer;

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use homestead_core::{
    GameConfig, LoggingConfig, OfflineSummary, SystemClock, WelcomeBack, load_or_new, run_session,
};
use homestead_save::{JsonFileStore, SaveStore};

use crate::error::EngineError;
use crate::log_observer::LogObserver;

/// Environment variable naming the configuration file.
const CONFIG_PATH_ENV: &str = "HOMESTEAD_CONFIG";

/// Configuration file used when `HOMESTEAD_CONFIG` is unset.
const DEFAULT_CONFIG_PATH: &str = "homestead-config.yaml";

#[tokio::main]
async fn main() -> Result<(), EngineError> {
    // 1. Load configuration.
    let config_path = std::env::var_os(CONFIG_PATH_ENV)
        .filter(|v| !v.is_empty())
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    let config_found = config_path.is_file();
    let config = if config_found {
        GameConfig::from_file(&config_path)?
    } else {
        GameConfig::parse("")?
    };

    // 2. Initialize tracing.
    init_tracing(&config.logging)?;
    info!("Homestead engine starting");
    if config_found {
        info!(path = %config_path.display(), "Configuration loaded");
    } else {
        info!(path = %config_path.display(), "No configuration file, using stock rules");
    }

    // 3. Build the game rules.
    let save_path = config.save.resolved_path();
    let rules = Arc::new(config.into_rules()?);
    info!(
        crops = rules.catalog.len(),
        width = rules.farm.starting_width,
        height = rules.farm.starting_height,
        "Game rules ready"
    );

    // 4. Load or create the game.
    let store = Arc::new(JsonFileStore::new(save_path));
    let clock = SystemClock;
    let loaded = load_or_new(store.as_ref(), &rules, &clock)?;
    info!(
        path = %store.path().display(),
        new_game = loaded.is_new,
        "Save file ready"
    );
    announce_return(&loaded.summary);

    // 5. Run until Ctrl-C.
    let session = Mutex::new(loaded.session);
    let mut observer = LogObserver::default();
    let save_store: Arc<dyn SaveStore> = store;
    let summary =
        run_session(&session, &save_store, &clock, &mut observer, shutdown_signal()).await;

    info!(
        autosaves = summary.autosaves,
        saved_on_exit = summary.final_save_ok,
        "Homestead engine stopped"
    );
    Ok(())
}

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
fn init_tracing(logging: &LoggingConfig) -> Result<(), EngineError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    let installed = if logging.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| EngineError::Logging {
        message: e.to_string(),
    })
}

/// Greet the player the way a front end would, through the log.
fn announce_return(summary: &OfflineSummary) {
    match summary.notice() {
        WelcomeBack::Modal => info!(
            away = %summary.away_label(),
            harvested = summary.auto_harvested.len(),
            coins = summary.total_coins,
            "Welcome back"
        ),
        WelcomeBack::Toast { minutes } => info!(minutes, "Welcome back"),
        WelcomeBack::Silent => {}
    }
}

/// Resolve on Ctrl-C. If the handler cannot be installed, never resolve.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C, stop the process to exit");
        std::future::pending::<()>().await;
    }
}
