// PartyWave admin console entry point.
//
// Startup sequence:
// 1. Load config (copies defaults on first run)
// 2. Initialize tracing (log to file, not terminal)
// 3. Build the REST client
// 4. Create mpsc channels and the application state
// 5. Spawn app logic task
// 6. Run the TUI until the user quits
// 7. Cleanup on exit

use std::path::PathBuf;

use anyhow::Context;
use partywave_app::app;
use partywave_core::config::{self, Config};
use partywave_core::ApiClient;
use partywave_tui::tui;
use tokio::sync::mpsc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load config
    let config = config::load_config().context("failed to load configuration")?;

    // 2. Initialize tracing
    init_tracing(&config)?;
    info!("PartyWave admin starting up");
    info!(
        "Config loaded: api={}, {} items per page",
        config.api.base_url, config.ui.items_per_page
    );

    // 3. Build the REST client
    let client = ApiClient::new(&config).context("failed to build API client")?;
    if config.credentials.bearer_token.is_some() {
        info!("Bearer token configured");
    }

    // 4. Channels and state
    let (api_tx, api_rx) = mpsc::channel(256);
    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (ui_tx, ui_rx) = mpsc::channel(256);

    let app_state = app::AppState::new(config, client, api_tx);

    // 5. Spawn app logic task
    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(cmd_rx, api_rx, ui_tx, app_state).await {
            error!("Application loop error: {}", e);
        }
    });

    // 6. Run the TUI event loop (blocking until user quits)
    if let Err(e) = tui::run(ui_rx, cmd_tx).await {
        error!("TUI error: {}", e);
    }

    // 7. Cleanup: wait for app task to finish (with timeout)
    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), async {
        let _ = app_handle.await;
    })
    .await;

    info!("PartyWave admin shut down cleanly");
    Ok(())
}

/// Initialize tracing to log to a file (not the terminal, which is used by the TUI).
fn init_tracing(config: &Config) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = log_directory(&config.logging.directory)?;
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("partywave-admin.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter)),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}

/// Relative log directories live next to the config files.
fn log_directory(directory: &str) -> anyhow::Result<PathBuf> {
    let path = PathBuf::from(directory);
    if path.is_absolute() {
        return Ok(path);
    }
    Ok(config::resolve_base_dir()?.join(path))
}
