use std::collections::VecDeque;
use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant};

use tokio::sync::Notify;

use crate::types::{GameSnapshot, PlayerState, PriceQuote, SnapshotUpdate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientPhase {
    /// No nickname on record; the onboarding modal is up and polling is idle.
    Onboarding,
    /// Authenticated: poll loop runs at full cadence.
    Ready,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    pub ts: String,
    shown_at: Instant,
}

const MAX_TOASTS: usize = 16;
const TOAST_TTL: Duration = Duration::from_secs(3);

/// Process-wide cache of the last-known server state. Written by the
/// transport tasks (push + poll) and the action dispatcher, read by the
/// renderers. Constructed once per session and passed around as `Arc`.
pub struct Store {
    snapshot: RwLock<GameSnapshot>,
    player: RwLock<PlayerState>,
    phase: RwLock<ClientPhase>,
    toasts: Mutex<VecDeque<Toast>>,
    refresh: Notify,
}

impl Store {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            snapshot: RwLock::new(GameSnapshot::default()),
            player: RwLock::new(PlayerState::default()),
            phase: RwLock::new(ClientPhase::Onboarding),
            toasts: Mutex::new(VecDeque::with_capacity(MAX_TOASTS)),
            refresh: Notify::new(),
        })
    }

    /// Single mutation entry point: merge by field presence, last writer
    /// wins per field. Fields absent from the update keep their cached value.
    pub fn apply_update(&self, update: SnapshotUpdate) {
        {
            let mut snapshot = self.snapshot.write().unwrap();
            if let Some(round) = update.round {
                snapshot.round = round;
            }
            if let Some(num_players) = update.num_players {
                snapshot.num_players = num_players;
            }
            if let Some(leaderboard) = update.leaderboard {
                snapshot.leaderboard = leaderboard;
            }
            if let Some(prices) = update.prices {
                snapshot.prices = prices;
            }
            if let Some(buildings) = update.buildings {
                snapshot.buildings = buildings;
            }
        }
        if let Some(player) = update.player {
            *self.player.write().unwrap() = player;
        }
    }

    pub fn snapshot(&self) -> GameSnapshot {
        self.snapshot.read().unwrap().clone()
    }

    pub fn player(&self) -> PlayerState {
        self.player.read().unwrap().clone()
    }

    pub fn phase(&self) -> ClientPhase {
        *self.phase.read().unwrap()
    }

    pub fn set_phase(&self, phase: ClientPhase) {
        *self.phase.write().unwrap() = phase;
    }

    pub fn is_ready(&self) -> bool {
        self.phase() == ClientPhase::Ready
    }

    /// Grid-cached summary for a building card: (count, players-percentage).
    /// Catalog entries the server never reported read as zero.
    pub fn building_summary(&self, name: &str) -> (u32, f64) {
        let snapshot = self.snapshot.read().unwrap();
        snapshot
            .buildings
            .iter()
            .find(|b| b.name == name)
            .map(|b| (b.count, b.players_percentage))
            .unwrap_or((0, 0.0))
    }

    pub fn price_quote(&self, resource: &str) -> Option<PriceQuote> {
        let snapshot = self.snapshot.read().unwrap();
        snapshot.prices.iter().find(|p| p.resource == resource).cloned()
    }

    pub fn push_toast(&self, kind: ToastKind, message: impl Into<String>) {
        let toast = Toast {
            kind,
            message: message.into(),
            ts: chrono::Local::now().format("%H:%M:%S").to_string(),
            shown_at: Instant::now(),
        };
        let mut toasts = self.toasts.lock().unwrap();
        if toasts.len() >= MAX_TOASTS {
            toasts.pop_front();
        }
        toasts.push_back(toast);
    }

    /// Latest toast still within its display window.
    pub fn active_toast(&self) -> Option<Toast> {
        let toasts = self.toasts.lock().unwrap();
        toasts
            .back()
            .filter(|t| t.shown_at.elapsed() < TOAST_TTL)
            .cloned()
    }

    #[cfg(test)]
    pub fn toast_count(&self) -> usize {
        self.toasts.lock().unwrap().len()
    }

    /// Asks the poll task for an immediate player-state fetch, out of band of
    /// its regular tick (used after a successful action).
    pub fn request_refresh(&self) {
        self.refresh.notify_one();
    }

    pub async fn refresh_requested(&self) {
        self.refresh.notified().await;
    }
}
