use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use futures_util::StreamExt;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::state::Store;
use crate::types::{PushFrame, SnapshotUpdate};

/// One dropped connection surfaces as two teardown events: a close frame
/// followed by the end of the stream (or by a read error). The gate collapses
/// the pair so only one reconnect gets announced and scheduled.
#[derive(Debug, Default)]
pub struct ReconnectGate {
    armed: bool,
}

impl ReconnectGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms the reconnect. Returns `false` if one is already pending.
    pub fn arm(&mut self) -> bool {
        if self.armed {
            return false;
        }
        self.armed = true;
        true
    }

    pub fn disarm(&mut self) {
        self.armed = false;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }
}

/// Push channel: keeps one connection to the server's `/ws` endpoint and
/// forwards every inbound frame to the store as a partial snapshot update.
/// Drops are retried forever on a fixed interval; connectivity problems stay
/// in the logs and never reach the UI.
pub async fn run(config: Config, store: Arc<Store>, cancel: CancellationToken) -> Result<()> {
    let reconnect_delay = Duration::from_secs(config.ws_reconnect_secs);
    let mut gate = ReconnectGate::new();

    loop {
        tracing::info!(url = %config.server_ws, "connecting to game websocket");

        match connect_async(&config.server_ws).await {
            Ok((ws_stream, _)) => {
                tracing::info!("game websocket connected");
                let (_write, mut read) = ws_stream.split();

                loop {
                    tokio::select! {
                        _ = cancel.cancelled() => return Ok(()),
                        msg = read.next() => {
                            match msg {
                                Some(Ok(Message::Text(text))) => {
                                    if let Err(e) = handle_frame(&text, &store) {
                                        tracing::warn!(error = %e, "push frame parse error");
                                    }
                                }
                                Some(Ok(Message::Close(_))) => {
                                    // The stream ends (or errors) right after
                                    // this; the gate keeps the pair to one
                                    // scheduled reconnect.
                                    if gate.arm() {
                                        tracing::warn!("game websocket closed, reconnecting...");
                                    }
                                }
                                None => {
                                    if gate.arm() {
                                        tracing::warn!("game websocket stream ended, reconnecting...");
                                    }
                                    break;
                                }
                                Some(Err(e)) => {
                                    if gate.arm() {
                                        tracing::error!(error = %e, "game websocket error");
                                    }
                                    break;
                                }
                                _ => {}
                            }
                        }
                    }
                }
            }
            Err(e) => {
                gate.arm();
                tracing::error!(error = %e, "failed to connect to game websocket");
            }
        }

        if gate.is_armed() {
            tracing::info!("reconnecting in {}s...", config.ws_reconnect_secs);
            tokio::select! {
                _ = cancel.cancelled() => return Ok(()),
                _ = tokio::time::sleep(reconnect_delay) => {}
            }
            gate.disarm();
        }
    }
}

/// Every present top-level field of the frame becomes part of one partial
/// update; absent fields leave the cache untouched.
fn handle_frame(text: &str, store: &Store) -> Result<()> {
    let frame: PushFrame = serde_json::from_str(text)?;
    let update = SnapshotUpdate::from(frame);
    store.apply_update(update);
    Ok(())
}
