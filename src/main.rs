mod actions;
mod api;
mod chart;
mod config;
mod error;
mod nav;
mod poll;
mod push;
mod state;
mod types;
mod ui;

#[cfg(test)]
mod tests;

use std::fs::{self, OpenOptions};
use std::sync::Arc;

use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{prelude::*, EnvFilter};

use crate::state::ClientPhase;

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::Config::from_env()?;
    init_logging(&config.log_level)?;

    tracing::info!(
        server = %config.server_http,
        ws = %config.server_ws,
        poll_secs = config.poll_interval_secs,
        "bazaar-client starting"
    );

    let store = state::Store::new();
    let api = Arc::new(api::ApiClient::new(&config)?);
    let cancel = CancellationToken::new();

    // A player with a nickname on record skips onboarding.
    match api.player_state().await {
        Ok(player) => {
            let known = player.nickname.is_some();
            store.apply_update(types::SnapshotUpdate::player(player));
            if known {
                store.set_phase(ClientPhase::Ready);
            }
        }
        Err(e) => tracing::warn!(error = %e, "initial player state fetch failed"),
    }

    let push_task = tokio::spawn(push::run(config.clone(), store.clone(), cancel.clone()));
    let poll_task = tokio::spawn(poll::run(
        config.poll_interval_secs,
        api.clone(),
        store.clone(),
        cancel.clone(),
    ));

    let mut app = ui::App::new(api, store, cancel.clone());
    let result = app.run().await;

    cancel.cancel();
    let _ = push_task.await;
    let _ = poll_task.await;

    tracing::info!("bazaar-client stopped");
    result
}

/// The TUI owns the terminal, so logs go to a file only.
fn init_logging(default_level: &str) -> Result<()> {
    let log_dir = std::env::current_dir()?.join("logs");
    fs::create_dir_all(&log_dir)?;
    let log_path = log_dir.join("bazaar-client.log");

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.to_string()));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .compact()
        .with_writer(move || {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&log_path)
                .expect("failed to open log file")
        });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    Ok(())
}
