//! Session observer that reports game events through `tracing`.
//!
//! Without a front end attached, the log is the only place a player (or
//! operator) sees harvests, level-ups, and saves.

use homestead_core::{FarmView, SessionObserver};
use homestead_types::GameEvent;
use tracing::{debug, info, warn};

/// Logs every event and a short line per growth refresh.
#[derive(Debug, Default)]
pub struct LogObserver {
    /// Ready count at the previous refresh, to log only changes.
    last_ready: usize,
}

impl SessionObserver for LogObserver {
    fn on_refresh(&mut self, view: &FarmView) {
        if view.ready_count != self.last_ready {
            info!(
                ready = view.ready_count,
                coins = view.player.coins,
                level = view.player.level,
                "Crops ready to harvest"
            );
            self.last_ready = view.ready_count;
        }
    }

    fn on_events(&mut self, events: &[GameEvent]) {
        for event in events {
            match event {
                GameEvent::CropPlanted {
                    coord,
                    kind,
                    seed_cost,
                } => debug!(coord = %coord, kind = %kind, seed_cost, "Planted"),
                GameEvent::CropHarvested {
                    coord,
                    kind,
                    coins,
                    experience,
                } => info!(coord = %coord, kind = %kind, coins, experience, "Harvested"),
                GameEvent::CropAutoHarvested { coord, kind, coins } => {
                    info!(coord = %coord, kind = %kind, coins, "Harvested while away");
                }
                GameEvent::LevelUp { level } => info!(level, "Level up"),
                GameEvent::CropUnlocked { kind, level } => {
                    info!(kind = %kind, level, "Crop unlocked");
                }
                GameEvent::Saved { at } => debug!(at = %at, "Auto-saved"),
                GameEvent::SaveFailed => warn!("Auto-save failed"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use homestead_types::{Coord, CropKind, Timestamp};

    use super::*;

    #[test]
    fn handles_every_event_kind() {
        let mut observer = LogObserver::default();
        observer.on_events(&[
            GameEvent::CropPlanted {
                coord: Coord::new(0, 0),
                kind: CropKind::from("RADISH"),
                seed_cost: 10,
            },
            GameEvent::LevelUp { level: 2 },
            GameEvent::Saved {
                at: Timestamp::from_secs(1.0),
            },
            GameEvent::SaveFailed,
        ]);
        assert_eq!(observer.last_ready, 0);
    }
}
