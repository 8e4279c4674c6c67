/// Tests for the state store: partial-merge semantics, grid summaries, and
/// the toast ring.
use crate::state::{ClientPhase, Store, ToastKind};
use crate::types::{
    BuildingAggregate, LeaderboardEntry, PlayerState, PriceQuote, SnapshotUpdate,
};

fn quote(resource: &str, price: f64) -> PriceQuote {
    PriceQuote {
        resource: resource.to_string(),
        current_price: price,
        change_from_prev_percent: 0.0,
        change_from_start_percent: 0.0,
    }
}

fn entry(name: &str, total: f64) -> LeaderboardEntry {
    LeaderboardEntry {
        name: name.to_string(),
        total_value: total,
        growth_percent: 0.0,
    }
}

// ── apply_update merge semantics ──────────────────────────────────────────────

#[test]
fn absent_fields_keep_their_cached_values() {
    let store = Store::new();
    store.apply_update(SnapshotUpdate {
        round: Some(4),
        leaderboard: Some(vec![entry("Кузьма", 900.0)]),
        ..Default::default()
    });

    // A later update carrying only prices must not clobber the rest.
    store.apply_update(SnapshotUpdate::prices(vec![quote("зерно", 12.0)]));

    let snapshot = store.snapshot();
    assert_eq!(snapshot.round, 4);
    assert_eq!(snapshot.leaderboard.len(), 1);
    assert_eq!(snapshot.prices.len(), 1);
    assert_eq!(snapshot.prices[0].resource, "зерно");
}

#[test]
fn present_fields_overwrite_wholesale() {
    let store = Store::new();
    store.apply_update(SnapshotUpdate::prices(vec![
        quote("зерно", 12.0),
        quote("рыба", 7.0),
    ]));
    store.apply_update(SnapshotUpdate::prices(vec![quote("золото", 100.0)]));

    let snapshot = store.snapshot();
    assert_eq!(snapshot.prices.len(), 1);
    assert_eq!(snapshot.prices[0].resource, "золото");
}

#[test]
fn player_update_replaces_the_player_slot_only() {
    let store = Store::new();
    store.apply_update(SnapshotUpdate::round(7));

    let mut player = PlayerState::default();
    player.nickname = Some("Кузьма".to_string());
    player.money = 350.0;
    store.apply_update(SnapshotUpdate::player(player));

    assert_eq!(store.snapshot().round, 7);
    let cached = store.player();
    assert_eq!(cached.nickname.as_deref(), Some("Кузьма"));
    assert_eq!(cached.money, 350.0);
}

// ── grid summaries ────────────────────────────────────────────────────────────

#[test]
fn building_summary_reads_zero_for_unreported_entries() {
    let store = Store::new();
    store.apply_update(SnapshotUpdate {
        buildings: Some(vec![BuildingAggregate {
            name: "Ферма".to_string(),
            count: 3,
            players_percentage: 25.0,
        }]),
        ..Default::default()
    });

    assert_eq!(store.building_summary("Ферма"), (3, 25.0));
    assert_eq!(store.building_summary("Трактир"), (0, 0.0));
}

#[test]
fn price_quote_lookup_by_resource_name() {
    let store = Store::new();
    store.apply_update(SnapshotUpdate::prices(vec![quote("камень", 9.0)]));
    assert_eq!(store.price_quote("камень").map(|q| q.current_price), Some(9.0));
    assert!(store.price_quote("рыба").is_none());
}

// ── phase ─────────────────────────────────────────────────────────────────────

#[test]
fn store_starts_in_onboarding_phase() {
    let store = Store::new();
    assert_eq!(store.phase(), ClientPhase::Onboarding);
    assert!(!store.is_ready());
    store.set_phase(ClientPhase::Ready);
    assert!(store.is_ready());
}

// ── toasts ────────────────────────────────────────────────────────────────────

#[test]
fn toast_ring_is_bounded() {
    let store = Store::new();
    for i in 0..40 {
        store.push_toast(ToastKind::Success, format!("сообщение {i}"));
    }
    assert_eq!(store.toast_count(), 16);
    // The newest toast survives eviction.
    assert_eq!(
        store.active_toast().map(|t| t.message),
        Some("сообщение 39".to_string())
    );
}

#[test]
fn fresh_toast_is_active() {
    let store = Store::new();
    assert!(store.active_toast().is_none());
    store.push_toast(ToastKind::Error, "Ошибка покупки");
    let toast = store.active_toast().unwrap();
    assert_eq!(toast.kind, ToastKind::Error);
    assert_eq!(toast.message, "Ошибка покупки");
}

// ── refresh handshake ─────────────────────────────────────────────────────────

#[tokio::test]
async fn refresh_request_wakes_a_waiter() {
    let store = Store::new();
    store.request_refresh();
    // The permit is stored, so the wait completes immediately.
    tokio::time::timeout(std::time::Duration::from_secs(1), store.refresh_requested())
        .await
        .unwrap();
}
