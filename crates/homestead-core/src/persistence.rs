//! Load, save, and new-game orchestration.
//!
//! Loading is the only place offline reconciliation runs: a snapshot is
//! restored against the current rules, settled against the clock once,
//! and handed back as a playable [`GameSession`] together with the
//! [`OfflineSummary`] the host uses to greet the player.

use std::sync::Arc;

use homestead_farm::FarmError;
use homestead_save::SaveStore;
use homestead_types::{GameEvent, Timestamp};

use crate::clock::Clock;
use crate::config::GameRules;
use crate::offline::{self, OfflineSummary};
use crate::session::GameSession;

/// A session ready to play.
#[derive(Debug, Clone)]
pub struct LoadedGame {
    /// The session.
    pub session: GameSession,
    /// What happened while the player was away. Empty for a new game.
    pub summary: OfflineSummary,
    /// Whether no usable save existed and a new game was started.
    pub is_new: bool,
}

/// Start a new game with the starting farm and player.
///
/// # Errors
///
/// Returns [`FarmError::InvalidDimensions`] if the configured starting
/// size is unusable.
pub fn new_game(rules: &Arc<GameRules>) -> Result<GameSession, FarmError> {
    let session = GameSession::new(Arc::clone(rules))?;
    tracing::info!(
        width = session.farm().width(),
        height = session.farm().height(),
        coins = session.player().coins(),
        "New game created"
    );
    Ok(session)
}

/// Load the stored game and reconcile the time since it was saved.
///
/// Returns `None` if the store has no usable save, including a save that
/// names crops the current catalog does not know.
pub fn load_game(
    store: &dyn SaveStore,
    rules: &Arc<GameRules>,
    clock: &dyn Clock,
) -> Option<LoadedGame> {
    let snapshot = store.load_raw()?;
    let restored = match snapshot.restore(&rules.catalog, &rules.progression) {
        Ok(restored) => restored,
        Err(e) => {
            tracing::warn!(error = %e, "Save does not match the current rules, ignoring it");
            return None;
        }
    };

    let mut farm = restored.farm;
    let mut player = restored.player;
    let summary = offline::reconcile(
        &mut farm,
        &mut player,
        restored.last_save,
        clock.now(),
        &rules.timing,
    );

    tracing::info!(
        last_save = %restored.last_save,
        coins = player.coins(),
        level = player.level(),
        crops = farm.occupied_count(),
        "Game loaded"
    );

    let mut session = GameSession::from_parts(Arc::clone(rules), farm, player);
    session.record_offline(&summary);
    let unlocked = session.catch_up_unlocks();
    if !unlocked.is_empty() {
        tracing::info!(
            level = session.player().level(),
            unlocked = unlocked.len(),
            "Unlocked crops the restored level allows"
        );
    }
    Some(LoadedGame {
        session,
        summary,
        is_new: false,
    })
}

/// Store the session stamped with the current time.
///
/// Queues [`GameEvent::Saved`] or [`GameEvent::SaveFailed`] on the session
/// and returns whether the store succeeded. The store runs on the calling
/// thread; the session runner uses its own off-thread path.
pub fn save_game(session: &mut GameSession, store: &dyn SaveStore, clock: &dyn Clock) -> bool {
    let now = clock.now();
    let saved = store.store_raw(&session.snapshot(now));
    record_save(session, now, saved);
    saved
}

/// Log a finished save attempt stamped `at` and queue its event.
pub(crate) fn record_save(session: &mut GameSession, at: Timestamp, saved: bool) {
    if saved {
        tracing::debug!(at = %at, "Game saved");
        session.push_event(GameEvent::Saved { at });
    } else {
        tracing::warn!("Game could not be saved");
        session.push_event(GameEvent::SaveFailed);
    }
}

/// Load the stored game, or start a new one if there is none.
///
/// # Errors
///
/// Returns [`FarmError::InvalidDimensions`] if a new game is needed and
/// the configured starting size is unusable.
pub fn load_or_new(
    store: &dyn SaveStore,
    rules: &Arc<GameRules>,
    clock: &dyn Clock,
) -> Result<LoadedGame, FarmError> {
    if let Some(loaded) = load_game(store, rules, clock) {
        return Ok(loaded);
    }
    Ok(LoadedGame {
        session: new_game(rules)?,
        summary: OfflineSummary::nothing(),
        is_new: true,
    })
}
