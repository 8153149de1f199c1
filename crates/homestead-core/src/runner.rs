//! Session loop runner.
//!
//! This module provides [`run_session`], the top-level async function that
//! keeps a loaded game ticking:
//!
//! - **Growth refresh**: every `growth_update_interval_secs`, rebuild the
//!   [`FarmView`] and hand it to the observer. Growth is derived from
//!   timestamps, so this never mutates the session.
//! - **Autosave**: every `auto_save_interval_secs`, store a snapshot.
//! - **Clean shutdown**: when the shutdown future resolves, perform one
//!   final save and return.
//!
//! The session sits behind a [`tokio::sync::Mutex`] so a host issuing
//! plant/harvest calls concurrently is serialised with the ticks. A save
//! snapshots the session under the lock, then writes it on the blocking
//! pool with the lock released, so a slow disk never stalls play.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, watch};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{info, warn};

use homestead_save::SaveStore;
use homestead_types::GameEvent;

use crate::clock::Clock;
use crate::persistence;
use crate::session::GameSession;
use crate::view::FarmView;

/// Floor for either tick period.
const MIN_TICK: Duration = Duration::from_millis(100);

/// Counters describing a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    /// Growth refreshes delivered, including the initial one.
    pub refreshes: u64,
    /// Periodic autosaves that succeeded.
    pub autosaves: u64,
    /// Periodic autosaves that failed.
    pub failed_saves: u64,
    /// Whether the save on shutdown succeeded.
    pub final_save_ok: bool,
}

/// Receives what the runner produces.
///
/// Implementations can redraw a UI, forward views over a channel, or log
/// events.
pub trait SessionObserver: Send {
    /// Called with a fresh view on every growth refresh.
    fn on_refresh(&mut self, view: &FarmView);

    /// Called with events drained from the session after each tick.
    fn on_events(&mut self, _events: &[GameEvent]) {}
}

/// An observer that ignores everything.
pub struct NoOpObserver;

impl SessionObserver for NoOpObserver {
    fn on_refresh(&mut self, _view: &FarmView) {}
}

/// Publishes every view on a [`watch`] channel.
#[derive(Debug)]
pub struct ViewPublisher {
    sender: watch::Sender<Option<FarmView>>,
}

impl ViewPublisher {
    /// A publisher and the receiver that sees its latest view.
    pub fn channel() -> (Self, watch::Receiver<Option<FarmView>>) {
        let (sender, receiver) = watch::channel(None);
        (Self { sender }, receiver)
    }
}

impl SessionObserver for ViewPublisher {
    fn on_refresh(&mut self, view: &FarmView) {
        self.sender.send_replace(Some(view.clone()));
    }
}

/// Run refresh and autosave ticks until `shutdown` resolves, then save
/// one last time.
pub async fn run_session<F>(
    session: &Mutex<GameSession>,
    store: &Arc<dyn SaveStore>,
    clock: &dyn Clock,
    observer: &mut dyn SessionObserver,
    shutdown: F,
) -> RunSummary
where
    F: Future<Output = ()>,
{
    let (refresh_period, autosave_period) = {
        let guard = session.lock().await;
        let timing = &guard.rules().timing;
        (
            timing.growth_update_interval().max(MIN_TICK),
            timing.auto_save_interval().max(MIN_TICK),
        )
    };
    info!(
        refresh_secs = refresh_period.as_secs_f64(),
        autosave_secs = autosave_period.as_secs_f64(),
        "Session runner starting"
    );

    let start = Instant::now();
    let mut refresh = tokio::time::interval_at(start + refresh_period, refresh_period);
    refresh.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut autosave = tokio::time::interval_at(start + autosave_period, autosave_period);
    autosave.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut summary = RunSummary::default();
    refresh_once(session, clock, observer).await;
    summary.refreshes = 1;

    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            biased;

            () = &mut shutdown => {
                info!("Shutdown requested");
                break;
            }

            _ = autosave.tick() => {
                if save_once(session, store, clock, observer).await {
                    summary.autosaves = summary.autosaves.saturating_add(1);
                } else {
                    summary.failed_saves = summary.failed_saves.saturating_add(1);
                }
            }

            _ = refresh.tick() => {
                refresh_once(session, clock, observer).await;
                summary.refreshes = summary.refreshes.saturating_add(1);
            }
        }
    }

    summary.final_save_ok = save_once(session, store, clock, observer).await;

    log_session_end(&summary);
    summary
}

/// Snapshot under the lock, store on the blocking pool, then queue the
/// result and forward the drained events.
///
/// Changes made while the write is in flight land in the next save.
async fn save_once(
    session: &Mutex<GameSession>,
    store: &Arc<dyn SaveStore>,
    clock: &dyn Clock,
    observer: &mut dyn SessionObserver,
) -> bool {
    let now = clock.now();
    let snapshot = session.lock().await.snapshot(now);

    let store = Arc::clone(store);
    let saved = tokio::task::spawn_blocking(move || store.store_raw(&snapshot))
        .await
        .unwrap_or_else(|e| {
            warn!(error = %e, "Save task did not complete");
            false
        });

    let mut guard = session.lock().await;
    persistence::record_save(&mut guard, now, saved);
    let events = guard.drain_events();
    drop(guard);
    if !events.is_empty() {
        observer.on_events(&events);
    }
    saved
}

/// Build a view, forward it, and forward any events queued since the
/// last tick.
async fn refresh_once(
    session: &Mutex<GameSession>,
    clock: &dyn Clock,
    observer: &mut dyn SessionObserver,
) {
    let mut guard = session.lock().await;
    let view = guard.view(clock.now());
    let events = guard.drain_events();
    drop(guard);
    if !events.is_empty() {
        observer.on_events(&events);
    }
    observer.on_refresh(&view);
}

fn log_session_end(summary: &RunSummary) {
    info!(
        refreshes = summary.refreshes,
        autosaves = summary.autosaves,
        failed_saves = summary.failed_saves,
        final_save_ok = summary.final_save_ok,
        "Session ended"
    );
    if !summary.final_save_ok {
        warn!("Final save failed, progress since the last autosave is lost");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use homestead_save::{MemoryStore, SaveSnapshot};
    use homestead_types::{Coord, CropKind, Timestamp};

    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::clock::FixedClock;
    use crate::config::GameRules;

    struct Recorder {
        views: usize,
        events: Vec<GameEvent>,
    }

    impl SessionObserver for Recorder {
        fn on_refresh(&mut self, _view: &FarmView) {
            self.views += 1;
        }

        fn on_events(&mut self, events: &[GameEvent]) {
            self.events.extend_from_slice(events);
        }
    }

    /// A store whose writes always fail.
    struct BrokenStore;

    impl SaveStore for BrokenStore {
        fn load_raw(&self) -> Option<SaveSnapshot> {
            None
        }

        fn store_raw(&self, _snapshot: &SaveSnapshot) -> bool {
            false
        }
    }

    /// A store that checks, mid-write, whether the session is free.
    struct LockCheckingStore {
        session: Arc<Mutex<GameSession>>,
        writes: AtomicUsize,
        writes_with_session_free: AtomicUsize,
    }

    impl SaveStore for LockCheckingStore {
        fn load_raw(&self) -> Option<SaveSnapshot> {
            None
        }

        fn store_raw(&self, _snapshot: &SaveSnapshot) -> bool {
            self.writes.fetch_add(1, Ordering::SeqCst);
            if self.session.try_lock().is_ok() {
                self.writes_with_session_free.fetch_add(1, Ordering::SeqCst);
            }
            true
        }
    }

    fn session() -> Mutex<GameSession> {
        Mutex::new(GameSession::new(Arc::new(GameRules::stock())).unwrap())
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_until_shutdown_then_saves() {
        let session = session();
        let store = Arc::new(MemoryStore::new());
        let dyn_store: Arc<dyn SaveStore> = store.clone();
        let clock = FixedClock::new(Timestamp::from_secs(5_000.0));
        let mut recorder = Recorder {
            views: 0,
            events: Vec::new(),
        };

        let summary = run_session(
            &session,
            &dyn_store,
            &clock,
            &mut recorder,
            tokio::time::sleep(Duration::from_millis(65_500)),
        )
        .await;

        // Autosaves at 30 s and 60 s, then one on shutdown.
        assert_eq!(summary.autosaves, 2);
        assert_eq!(summary.failed_saves, 0);
        assert!(summary.final_save_ok);
        // Initial view plus one per second.
        assert_eq!(summary.refreshes, 66);
        assert_eq!(recorder.views, 66);
        let saves = recorder
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::Saved { .. }))
            .count();
        assert_eq!(saves, 3);
        assert!(store.document().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn failed_saves_are_counted_not_fatal() {
        let session = session();
        let clock = FixedClock::new(Timestamp::from_secs(5_000.0));
        let broken: Arc<dyn SaveStore> = Arc::new(BrokenStore);
        let summary = run_session(
            &session,
            &broken,
            &clock,
            &mut NoOpObserver,
            tokio::time::sleep(Duration::from_millis(31_500)),
        )
        .await;
        assert_eq!(summary.autosaves, 0);
        assert_eq!(summary.failed_saves, 1);
        assert!(!summary.final_save_ok);
    }

    #[tokio::test(start_paused = true)]
    async fn publisher_sees_latest_view() {
        let session = session();
        session
            .lock()
            .await
            .plant(Coord::new(0, 0), &CropKind::from("RADISH"), Timestamp::from_secs(5_000.0))
            .unwrap();
        let store: Arc<dyn SaveStore> = Arc::new(MemoryStore::new());
        let clock = FixedClock::new(Timestamp::from_secs(5_040.0));
        let (mut publisher, receiver) = ViewPublisher::channel();

        run_session(
            &session,
            &store,
            &clock,
            &mut publisher,
            tokio::time::sleep(Duration::from_millis(1_500)),
        )
        .await;

        let view = receiver.borrow().clone().unwrap();
        assert_eq!(view.ready_count, 1);
        assert_eq!(view.player.coins, 90);
    }

    #[tokio::test(start_paused = true)]
    async fn store_writes_without_holding_the_session() {
        let session = Arc::new(session());
        let store = Arc::new(LockCheckingStore {
            session: Arc::clone(&session),
            writes: AtomicUsize::new(0),
            writes_with_session_free: AtomicUsize::new(0),
        });
        let dyn_store: Arc<dyn SaveStore> = store.clone();
        let clock = FixedClock::new(Timestamp::from_secs(5_000.0));

        let summary = run_session(
            &session,
            &dyn_store,
            &clock,
            &mut NoOpObserver,
            tokio::time::sleep(Duration::from_millis(30_500)),
        )
        .await;

        assert_eq!(summary.autosaves, 1);
        assert!(summary.final_save_ok);
        assert_eq!(store.writes.load(Ordering::SeqCst), 2);
        assert_eq!(store.writes_with_session_free.load(Ordering::SeqCst), 2);
    }
}
