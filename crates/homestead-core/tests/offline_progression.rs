//! End-to-end offline progression: save, close, reopen later.
//!
//! Every test drives a [`FixedClock`] so the offline gap is exact.

#![allow(clippy::unwrap_used, clippy::float_cmp, clippy::indexing_slicing)]

use std::sync::Arc;

use homestead_core::{
    Clock, FixedClock, GameRules, GameSession, PlantOutcome, WelcomeBack, load_game, load_or_new,
    new_game, save_game,
};
use homestead_save::MemoryStore;
use homestead_types::{Coord, CropKind, GameEvent, Timestamp};

const NOW: f64 = 1_700_000_000.0;

fn rules() -> Arc<GameRules> {
    Arc::new(GameRules::stock())
}

fn plant(session: &mut GameSession, x: u32, y: u32, kind: &str, clock: &FixedClock) {
    let outcome = session
        .plant(Coord::new(x, y), &CropKind::from(kind), clock.now())
        .unwrap();
    assert!(matches!(outcome, PlantOutcome::Planted { .. }), "{outcome:?}");
}

#[test]
fn radish_ready_before_save_is_auto_harvested_on_load() {
    let rules = rules();
    let store = MemoryStore::new();
    let clock = FixedClock::new(Timestamp::from_secs(NOW - 100.0));

    let mut session = new_game(&rules).unwrap();
    plant(&mut session, 0, 0, "RADISH", &clock);
    assert_eq!(session.player().coins(), 90);

    clock.set(Timestamp::from_secs(NOW - 20.0));
    assert!(save_game(&mut session, &store, &clock));

    clock.set(Timestamp::from_secs(NOW));
    let loaded = load_game(&store, &rules, &clock).unwrap();

    assert!(!loaded.is_new);
    assert_eq!(loaded.summary.offline_secs, 20.0);
    let harvested: Vec<(&str, u64)> = loaded
        .summary
        .auto_harvested
        .iter()
        .map(|h| (h.name.as_str(), h.coins))
        .collect();
    assert_eq!(harvested, vec![("Radish", 10)]);
    assert_eq!(loaded.summary.total_coins, 10);
    assert_eq!(loaded.summary.notice(), WelcomeBack::Modal);

    let mut session = loaded.session;
    assert!(session.farm().get(Coord::new(0, 0)).is_none());
    assert_eq!(session.player().coins(), 100);
    assert_eq!(session.player().total_crops_harvested(), 1);
    assert_eq!(
        session.drain_events(),
        vec![GameEvent::CropAutoHarvested {
            coord: Coord::new(0, 0),
            kind: CropKind::from("RADISH"),
            coins: 10,
        }]
    );
}

#[test]
fn quick_reload_changes_nothing() {
    let rules = rules();
    let store = MemoryStore::new();
    let clock = FixedClock::new(Timestamp::from_secs(NOW - 100.0));

    let mut session = new_game(&rules).unwrap();
    plant(&mut session, 1, 2, "RADISH", &clock);
    clock.set(Timestamp::from_secs(NOW - 5.0));
    assert!(save_game(&mut session, &store, &clock));

    clock.set(Timestamp::from_secs(NOW));
    let loaded = load_game(&store, &rules, &clock).unwrap();

    assert_eq!(loaded.summary.offline_secs, 0.0);
    assert!(loaded.summary.auto_harvested.is_empty());
    assert_eq!(loaded.summary.notice(), WelcomeBack::Silent);
    assert_eq!(loaded.session.farm(), session.farm());
    assert_eq!(loaded.session.player(), session.player());
}

#[test]
fn long_absence_is_capped_and_harvests_once() {
    let rules = rules();
    let store = MemoryStore::new();
    let clock = FixedClock::new(Timestamp::from_secs(NOW - 3.0 * 86_400.0));

    let mut session = new_game(&rules).unwrap();
    plant(&mut session, 0, 0, "RADISH", &clock);
    plant(&mut session, 3, 3, "CARROT", &clock);
    assert!(save_game(&mut session, &store, &clock));

    clock.set(Timestamp::from_secs(NOW));
    let loaded = load_game(&store, &rules, &clock).unwrap();

    assert_eq!(loaded.summary.offline_secs, 86_400.0);
    assert_eq!(loaded.summary.auto_harvested.len(), 2);
    // floor(15 * 0.7) + floor(35 * 0.7)
    assert_eq!(loaded.summary.total_coins, 10 + 24);
    assert_eq!(loaded.summary.away_label(), "24h 0m");
    assert_eq!(loaded.session.farm().occupied_count(), 0);
    assert_eq!(loaded.session.player().coins(), 70 + 34);
}

#[test]
fn only_ready_crops_are_harvested() {
    let rules = rules();
    let store = MemoryStore::new();
    let clock = FixedClock::new(Timestamp::from_secs(NOW - 90.0));

    let mut session = new_game(&rules).unwrap();
    plant(&mut session, 0, 0, "RADISH", &clock);
    plant(&mut session, 0, 1, "CARROT", &clock);

    // A radish planted 40 s before load is ready too.
    clock.set(Timestamp::from_secs(NOW - 40.0));
    plant(&mut session, 2, 2, "RADISH", &clock);
    assert!(save_game(&mut session, &store, &clock));

    clock.set(Timestamp::from_secs(NOW));
    let loaded = load_game(&store, &rules, &clock).unwrap();

    assert_eq!(loaded.summary.auto_harvested.len(), 3);

    // A short absence with a crop still growing.
    let clock = FixedClock::new(Timestamp::from_secs(NOW));
    let mut session = loaded.session;
    plant(&mut session, 1, 1, "CARROT", &clock);
    assert!(save_game(&mut session, &store, &clock));
    clock.set(Timestamp::from_secs(NOW + 45.0));
    let again = load_game(&store, &rules, &clock).unwrap();
    assert!(again.summary.auto_harvested.is_empty());
    assert_eq!(again.summary.offline_secs, 45.0);
    assert_eq!(again.summary.notice(), WelcomeBack::Silent);
    assert!(again.session.farm().get(Coord::new(1, 1)).is_some());
}

#[test]
fn empty_store_starts_a_new_game() {
    let rules = rules();
    let clock = FixedClock::new(Timestamp::from_secs(NOW));
    let loaded = load_or_new(&MemoryStore::new(), &rules, &clock).unwrap();
    assert!(loaded.is_new);
    assert_eq!(loaded.session.player().coins(), 100);
    assert_eq!(loaded.summary.notice(), WelcomeBack::Silent);
}

#[test]
fn invalid_document_starts_a_new_game() {
    let rules = rules();
    let clock = FixedClock::new(Timestamp::from_secs(NOW));
    let store = MemoryStore::with_document(r#"{"version": 1, "farm": {}}"#);
    assert!(load_game(&store, &rules, &clock).is_none());
    assert!(load_or_new(&store, &rules, &clock).unwrap().is_new);
}

#[test]
fn save_naming_an_unknown_crop_is_ignored() {
    let store = MemoryStore::new();
    let clock = FixedClock::new(Timestamp::from_secs(NOW));
    let mut session = new_game(&rules()).unwrap();
    plant(&mut session, 0, 0, "CARROT", &clock);
    assert!(save_game(&mut session, &store, &clock));

    let mut without_carrot = GameRules::stock();
    without_carrot.catalog = homestead_farm::CropCatalog::new(
        homestead_farm::catalog::stock_specs()
            .into_iter()
            .filter(|s| s.kind.as_str() != "CARROT"),
    )
    .unwrap();
    let rules = Arc::new(without_carrot);
    assert!(load_game(&store, &rules, &clock).is_none());
}
