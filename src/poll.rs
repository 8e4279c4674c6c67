use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::api::ApiClient;
use crate::state::Store;
use crate::types::SnapshotUpdate;

/// Pull channel: every poll interval, fetch player state, prices and round
/// info concurrently. The three requests are independent — one failing does
/// not cancel the others, and failures are logged, never surfaced (the UI
/// keeps showing last-known state until the next tick succeeds).
///
/// An out-of-band refresh request (sent after a successful action) triggers
/// an immediate player-state fetch without waiting for the next tick.
pub async fn run(config_interval_secs: u64, api: Arc<ApiClient>, store: Arc<Store>, cancel: CancellationToken) {
    let mut ticker = tokio::time::interval(Duration::from_secs(config_interval_secs));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = ticker.tick() => {
                if store.is_ready() {
                    refresh_all(&api, &store).await;
                }
            }
            _ = store.refresh_requested() => {
                refresh_player(&api, &store).await;
            }
        }
    }
}

async fn refresh_all(api: &ApiClient, store: &Store) {
    let (player, prices, round) = tokio::join!(api.player_state(), api.prices(), api.round_info());

    match player {
        Ok(player) => store.apply_update(SnapshotUpdate::player(player)),
        Err(e) => tracing::warn!(error = %e, "player state poll failed"),
    }
    match prices {
        Ok(prices) => store.apply_update(SnapshotUpdate::prices(prices)),
        Err(e) => tracing::warn!(error = %e, "prices poll failed"),
    }
    match round {
        Ok(round) => store.apply_update(SnapshotUpdate::round(round)),
        Err(e) => tracing::warn!(error = %e, "round info poll failed"),
    }
}

async fn refresh_player(api: &ApiClient, store: &Store) {
    match api.player_state().await {
        Ok(player) => store.apply_update(SnapshotUpdate::player(player)),
        Err(e) => tracing::warn!(error = %e, "player state refresh failed"),
    }
}
