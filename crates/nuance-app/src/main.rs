use std::env;
use std::sync::Arc;
use std::time::Duration;

use nuance_ai::GeminiClient;
use nuance_config::Config;
use nuance_core::storage::{JsonFileStore, KeyValueStore};
use tokio::signal;
use tracing_subscriber::EnvFilter;

pub mod controller;
pub mod events;
pub mod state;
pub mod ui;


use self::controller::AppController;
use self::state::{AppState, Services};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = dotenvy::dotenv()
        && !e.not_found()
    {
        eprintln!("ignoring unreadable .env: {e}");
    }
    init_tracing();

    let config = Config::new();
    tracing::info!(
        "model {} at {}, data in {}",
        config.gemini.model,
        config.gemini.api_url,
        config.storage.data_dir.display()
    );

    let gemini = Arc::new(GeminiClient::new(config.gemini.clone()));
    let services = Services {
        catalog: gemini.clone(),
        chat: gemini,
    };
    let storage: Box<dyn KeyValueStore> =
        Box::new(JsonFileStore::new(config.storage.data_dir.clone()));

    let state = Arc::new(AppState::new(config));
    let controller = AppController::new(state);
    let mut tasks = controller.spawn_tasks(services, storage);

    tokio::select! {
        result = signal::ctrl_c() => {
            match result {
                Ok(()) => tracing::info!("Shutdown requested"),
                Err(e) => tracing::error!("failed to listen for ctrl+c: {e}"),
            }
        }
        Some(result) = tasks.join_next() => {
            match result {
                Ok(Ok(())) => tracing::info!("task exited"),
                Ok(Err(e)) => tracing::error!("task failed: {e}"),
                Err(e) => tracing::error!("task panicked: {e}"),
            }
        }
    }

    controller.shutdown();
    while let Ok(Some(_)) = tokio::time::timeout(Duration::from_millis(500), tasks.join_next()).await {}

    Ok(())
}

/// Logs go to stderr so they never mix with the shell on stdout.
/// `RUST_LOG` filters (default `info`), `LOG_FORMAT=json` for machine output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json")) {
        builder.json().init();
    } else {
        builder.with_ansi(atty::is(atty::Stream::Stderr)).init();
    }
}
