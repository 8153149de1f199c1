//! Live play: planting, harvesting, and level-up unlocks.
//!
//! A [`GameSession`] owns the farm and the player and is the single
//! writer of both. Hosts call its methods and get back an outcome
//! describing what happened; the same facts are queued as
//! [`GameEvent`]s for hosts that prefer to drain a stream.

use std::sync::Arc;

use homestead_farm::{CropInstance, FarmError, FarmGrid};
use homestead_player::PlayerState;
use homestead_save::SaveSnapshot;
use homestead_types::{Coord, CropKind, GameEvent, Timestamp};

use crate::config::GameRules;
use crate::offline::OfflineSummary;
use crate::view::FarmView;

/// Result of a planting attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlantOutcome {
    /// The crop was planted and its seed paid for.
    Planted {
        /// Coins spent on the seed.
        seed_cost: u64,
    },
    /// The player has not unlocked this crop.
    Locked {
        /// Level at which the crop unlocks.
        unlock_level: u32,
    },
    /// The player cannot afford the seed.
    NotEnoughCoins {
        /// The seed cost.
        needed: u64,
    },
    /// The plot is off the grid or already occupied. The seed cost was
    /// refunded.
    PlotUnavailable,
}

/// Result of a harvest attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HarvestOutcome {
    /// The crop was harvested at full price.
    Harvested {
        /// What was harvested.
        kind: CropKind,
        /// Coins credited.
        coins: u64,
        /// Experience credited.
        experience: u64,
        /// Levels gained from that experience.
        levels_gained: u32,
        /// Crops unlocked by those levels.
        unlocked: Vec<CropKind>,
    },
    /// The crop is still growing and stays on the plot.
    NotReady {
        /// Whole seconds until it is ready.
        seconds_remaining: u64,
    },
    /// There is no crop at that position.
    Empty,
}

/// A running game.
#[derive(Debug, Clone)]
pub struct GameSession {
    rules: Arc<GameRules>,
    farm: FarmGrid,
    player: PlayerState,
    /// Events not yet drained by the host.
    events: Vec<GameEvent>,
}

impl GameSession {
    /// A brand-new game: an empty farm of the starting size and a fresh
    /// player.
    ///
    /// # Errors
    ///
    /// Returns [`FarmError::InvalidDimensions`] if the configured starting
    /// size is unusable.
    pub fn new(rules: Arc<GameRules>) -> Result<Self, FarmError> {
        let farm = FarmGrid::new(rules.farm.starting_width, rules.farm.starting_height)?;
        let player = PlayerState::new(&rules.progression);
        Ok(Self::from_parts(rules, farm, player))
    }

    /// Resume a game from restored state.
    pub const fn from_parts(rules: Arc<GameRules>, farm: FarmGrid, player: PlayerState) -> Self {
        Self {
            rules,
            farm,
            player,
            events: Vec::new(),
        }
    }

    /// The rules this session plays by.
    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    /// The farm grid.
    pub const fn farm(&self) -> &FarmGrid {
        &self.farm
    }

    /// The player.
    pub const fn player(&self) -> &PlayerState {
        &self.player
    }

    // -----------------------------------------------------------------------
    // Play
    // -----------------------------------------------------------------------

    /// Plant `kind` at `coord`.
    ///
    /// The crop must be unlocked and affordable. The seed cost is spent
    /// before planting and refunded if the plot turns out to be
    /// unavailable, so a failed attempt never costs anything.
    ///
    /// # Errors
    ///
    /// Returns [`FarmError::UnknownCrop`] if `kind` is not in the catalog,
    /// or [`FarmError::InvalidTimestamp`] for an invalid `now`.
    pub fn plant(
        &mut self,
        coord: Coord,
        kind: &CropKind,
        now: Timestamp,
    ) -> Result<PlantOutcome, FarmError> {
        let spec = Arc::clone(self.rules.catalog.resolve(kind)?);

        if !self.player.has_crop_unlocked(kind) {
            return Ok(PlantOutcome::Locked {
                unlock_level: spec.unlock_level,
            });
        }
        if !self.player.spend_coins(spec.seed_cost) {
            return Ok(PlantOutcome::NotEnoughCoins {
                needed: spec.seed_cost,
            });
        }

        let crop = match CropInstance::new(Arc::clone(&spec), now) {
            Ok(crop) => crop,
            Err(e) => {
                self.player.add_coins(spec.seed_cost);
                return Err(e);
            }
        };
        if !self.farm.plant(coord, crop) {
            self.player.add_coins(spec.seed_cost);
            tracing::debug!(coord = %coord, kind = %kind, "Plot unavailable, seed refunded");
            return Ok(PlantOutcome::PlotUnavailable);
        }

        self.player.record_planted();
        tracing::debug!(coord = %coord, kind = %kind, seed_cost = spec.seed_cost, "Crop planted");
        self.events.push(GameEvent::CropPlanted {
            coord,
            kind: kind.clone(),
            seed_cost: spec.seed_cost,
        });
        Ok(PlantOutcome::Planted {
            seed_cost: spec.seed_cost,
        })
    }

    /// Harvest the crop at `coord` if it is ready.
    ///
    /// A ready crop pays its full sell price and `xp_per_harvest`
    /// experience; any level-ups unlock every crop the new level allows.
    pub fn harvest(&mut self, coord: Coord, now: Timestamp) -> HarvestOutcome {
        match self.farm.get(coord) {
            None => return HarvestOutcome::Empty,
            Some(crop) if !crop.is_ready(now) => {
                return HarvestOutcome::NotReady {
                    seconds_remaining: crop.seconds_remaining(now),
                };
            }
            Some(_) => {}
        }
        let Some(crop) = self.farm.harvest(coord) else {
            return HarvestOutcome::Empty;
        };

        let kind = crop.kind().clone();
        let coins = crop.spec().sell_price;
        let experience = u64::from(self.rules.progression.xp_per_harvest);
        self.player.add_coins(coins);
        self.player.record_harvested();
        tracing::debug!(coord = %coord, kind = %kind, coins, experience, "Crop harvested");
        self.events.push(GameEvent::CropHarvested {
            coord,
            kind: kind.clone(),
            coins,
            experience,
        });

        let levels_gained = self.gain_experience(experience);
        let unlocked = if levels_gained > 0 {
            self.unlock_for_level()
        } else {
            Vec::new()
        };

        HarvestOutcome::Harvested {
            kind,
            coins,
            experience,
            levels_gained,
            unlocked,
        }
    }

    /// Harvest every ready crop by hand, in scan order.
    ///
    /// Returns the coins earned.
    pub fn harvest_all_ready(&mut self, now: Timestamp) -> u64 {
        let ready: Vec<Coord> = self
            .farm
            .ready_crops(now)
            .into_iter()
            .map(|(coord, _)| coord)
            .collect();
        ready
            .into_iter()
            .map(|coord| match self.harvest(coord, now) {
                HarvestOutcome::Harvested { coins, .. } => coins,
                HarvestOutcome::NotReady { .. } | HarvestOutcome::Empty => 0,
            })
            .fold(0_u64, u64::saturating_add)
    }

    /// Grow the farm. Returns `false` (and changes nothing) unless the new
    /// size is at least as large in both directions and larger in one.
    pub fn expand_farm(&mut self, width: u32, height: u32) -> bool {
        let expanded = self.farm.expand(width, height);
        if expanded {
            tracing::info!(width, height, "Farm expanded");
        }
        expanded
    }

    /// Add experience, queueing one `LevelUp` per level gained.
    fn gain_experience(&mut self, amount: u64) -> u32 {
        let before = self.player.level();
        let levels_gained = self.player.add_experience(amount);
        let after = self.player.level();
        for level in before.saturating_add(1)..=after {
            tracing::info!(level, "Level up");
            self.events.push(GameEvent::LevelUp { level });
        }
        levels_gained
    }

    /// Unlock whatever the current level allows but the player lacks.
    ///
    /// Restoring a save can raise the level (the stored experience may
    /// already cover the next threshold) without a harvest to trigger the
    /// unlock pass, so loading runs this once.
    pub(crate) fn catch_up_unlocks(&mut self) -> Vec<CropKind> {
        self.unlock_for_level()
    }

    /// Unlock every catalog crop the current level allows that is not
    /// unlocked yet.
    fn unlock_for_level(&mut self) -> Vec<CropKind> {
        let level = self.player.level();
        let newly: Vec<CropKind> = self
            .rules
            .catalog
            .available_at(level)
            .filter(|spec| !self.player.has_crop_unlocked(&spec.kind))
            .map(|spec| spec.kind.clone())
            .collect();
        for kind in &newly {
            self.player.unlock_crop(kind.clone());
            tracing::info!(kind = %kind, level, "Crop unlocked");
            self.events.push(GameEvent::CropUnlocked {
                kind: kind.clone(),
                level,
            });
        }
        newly
    }

    // -----------------------------------------------------------------------
    // Host plumbing
    // -----------------------------------------------------------------------

    /// Queue the events of an offline reconciliation.
    pub fn record_offline(&mut self, summary: &OfflineSummary) {
        self.events.extend(summary.events());
    }

    /// Queue an event produced outside the session (saves).
    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take every queued event, oldest first.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Project the session for a front end.
    pub fn view(&self, now: Timestamp) -> FarmView {
        FarmView::capture(&self.farm, &self.player, &self.rules.glyphs, now)
    }

    /// Capture the session for saving.
    pub fn snapshot(&self, last_save: Timestamp) -> SaveSnapshot {
        SaveSnapshot::capture(&self.farm, &self.player, last_save)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    const T0: f64 = 10_000.0;

    fn ts(secs: f64) -> Timestamp {
        Timestamp::from_secs(secs)
    }

    fn kind(key: &str) -> CropKind {
        CropKind::from(key)
    }

    fn session() -> GameSession {
        GameSession::new(Arc::new(GameRules::stock())).unwrap()
    }

    #[test]
    fn new_game_uses_starting_values() {
        let s = session();
        assert_eq!(s.farm().width(), 4);
        assert_eq!(s.farm().height(), 4);
        assert_eq!(s.farm().occupied_count(), 0);
        assert_eq!(s.player().coins(), 100);
    }

    #[test]
    fn plant_spends_seed_cost() {
        let mut s = session();
        let outcome = s.plant(Coord::new(0, 0), &kind("CARROT"), ts(T0)).unwrap();
        assert_eq!(outcome, PlantOutcome::Planted { seed_cost: 20 });
        assert_eq!(s.player().coins(), 80);
        assert_eq!(s.player().total_crops_planted(), 1);
        assert_eq!(
            s.drain_events(),
            vec![GameEvent::CropPlanted {
                coord: Coord::new(0, 0),
                kind: kind("CARROT"),
                seed_cost: 20
            }]
        );
        assert!(s.drain_events().is_empty());
    }

    #[test]
    fn plant_refuses_locked_crop() {
        let mut s = session();
        let outcome = s.plant(Coord::new(0, 0), &kind("PUMPKIN"), ts(T0)).unwrap();
        assert_eq!(outcome, PlantOutcome::Locked { unlock_level: 7 });
        assert_eq!(s.player().coins(), 100);
        assert_eq!(s.farm().occupied_count(), 0);
    }

    #[test]
    fn plant_refuses_when_broke() {
        let mut s = session();
        for y in 0..4 {
            assert!(matches!(
                s.plant(Coord::new(0, y), &kind("CARROT"), ts(T0)).unwrap(),
                PlantOutcome::Planted { .. }
            ));
        }
        assert_eq!(s.player().coins(), 20);
        assert!(matches!(
            s.plant(Coord::new(1, 0), &kind("CARROT"), ts(T0)).unwrap(),
            PlantOutcome::Planted { .. }
        ));
        let outcome = s.plant(Coord::new(1, 1), &kind("RADISH"), ts(T0)).unwrap();
        assert_eq!(outcome, PlantOutcome::NotEnoughCoins { needed: 10 });
        assert_eq!(s.player().coins(), 0);
    }

    #[test]
    fn occupied_or_off_grid_plot_refunds() {
        let mut s = session();
        s.plant(Coord::new(0, 0), &kind("RADISH"), ts(T0)).unwrap();
        let before = s.farm().clone();

        assert_eq!(
            s.plant(Coord::new(0, 0), &kind("CARROT"), ts(T0)).unwrap(),
            PlantOutcome::PlotUnavailable
        );
        assert_eq!(
            s.plant(Coord::new(9, 9), &kind("CARROT"), ts(T0)).unwrap(),
            PlantOutcome::PlotUnavailable
        );
        assert_eq!(s.player().coins(), 90);
        assert_eq!(s.player().total_crops_planted(), 1);
        assert_eq!(s.farm(), &before);
    }

    #[test]
    fn unknown_crop_is_an_error() {
        let mut s = session();
        assert!(matches!(
            s.plant(Coord::new(0, 0), &kind("KALE"), ts(T0)),
            Err(FarmError::UnknownCrop(_))
        ));
    }

    #[test]
    fn invalid_time_is_an_error_and_refunds() {
        let mut s = session();
        assert!(matches!(
            s.plant(Coord::new(0, 0), &kind("RADISH"), ts(-1.0)),
            Err(FarmError::InvalidTimestamp { .. })
        ));
        assert_eq!(s.player().coins(), 100);
    }

    #[test]
    fn harvest_empty_and_growing() {
        let mut s = session();
        assert_eq!(s.harvest(Coord::new(0, 0), ts(T0)), HarvestOutcome::Empty);
        assert_eq!(s.harvest(Coord::new(7, 7), ts(T0)), HarvestOutcome::Empty);

        s.plant(Coord::new(0, 0), &kind("RADISH"), ts(T0)).unwrap();
        assert_eq!(
            s.harvest(Coord::new(0, 0), ts(T0 + 10.0)),
            HarvestOutcome::NotReady {
                seconds_remaining: 20
            }
        );
        assert!(s.farm().get(Coord::new(0, 0)).is_some());
    }

    #[test]
    fn harvest_pays_full_price_and_experience() {
        let mut s = session();
        s.plant(Coord::new(0, 0), &kind("RADISH"), ts(T0)).unwrap();
        let outcome = s.harvest(Coord::new(0, 0), ts(T0 + 30.0));
        assert_eq!(
            outcome,
            HarvestOutcome::Harvested {
                kind: kind("RADISH"),
                coins: 15,
                experience: 10,
                levels_gained: 0,
                unlocked: Vec::new(),
            }
        );
        assert_eq!(s.player().coins(), 105);
        assert_eq!(s.player().experience(), 10);
        assert_eq!(s.player().total_crops_harvested(), 1);
        assert!(s.farm().get(Coord::new(0, 0)).is_none());
        assert_eq!(s.harvest(Coord::new(0, 0), ts(T0 + 30.0)), HarvestOutcome::Empty);
    }

    #[test]
    fn tenth_harvest_levels_up_and_unlocks_wheat() {
        let mut s = session();
        let mut now = T0;
        let mut last = HarvestOutcome::Empty;
        for _ in 0..10 {
            s.plant(Coord::new(0, 0), &kind("RADISH"), ts(now)).unwrap();
            now += 30.0;
            last = s.harvest(Coord::new(0, 0), ts(now));
        }
        assert_eq!(s.player().level(), 2);
        assert!(matches!(
            last,
            HarvestOutcome::Harvested { levels_gained: 1, ref unlocked, .. } if unlocked == &vec![kind("WHEAT")]
        ));
        let events = s.drain_events();
        assert!(events.contains(&GameEvent::LevelUp { level: 2 }));
        assert!(events.contains(&GameEvent::CropUnlocked {
            kind: kind("WHEAT"),
            level: 2
        }));
    }

    #[test]
    fn multi_level_jump_unlocks_every_skipped_crop() {
        let mut rules = GameRules::stock();
        rules.progression.xp_per_harvest = 2_100;
        let mut s = GameSession::new(Arc::new(rules)).unwrap();
        s.plant(Coord::new(0, 0), &kind("RADISH"), ts(T0)).unwrap();
        // 100 + 200 + ... + 600 = 2100, straight to level 7.
        let outcome = s.harvest(Coord::new(0, 0), ts(T0 + 30.0));
        assert_eq!(s.player().level(), 7);
        let HarvestOutcome::Harvested {
            levels_gained,
            unlocked,
            ..
        } = outcome
        else {
            panic!("expected a harvest");
        };
        assert_eq!(levels_gained, 6);
        assert_eq!(
            unlocked,
            vec![kind("WHEAT"), kind("TOMATO"), kind("CORN"), kind("PUMPKIN")]
        );
        let level_ups = s
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::LevelUp { .. }))
            .count();
        assert_eq!(level_ups, 6);
    }

    #[test]
    fn restored_level_catches_up_on_unlocks() {
        let rules = Arc::new(GameRules::stock());
        let record = homestead_player::PlayerRecord {
            coins: 50,
            experience: 0,
            level: 3,
            total_crops_planted: 0,
            total_crops_harvested: 0,
            unlocked_crops: [kind("RADISH"), kind("CARROT")].into_iter().collect(),
        };
        let player = PlayerState::restore(record, &rules.progression).unwrap();
        let farm = FarmGrid::new(4, 4).unwrap();
        let mut s = GameSession::from_parts(rules, farm, player);

        assert_eq!(s.catch_up_unlocks(), vec![kind("WHEAT"), kind("TOMATO")]);
        assert!(s.player().has_crop_unlocked(&kind("TOMATO")));
        assert!(!s.player().has_crop_unlocked(&kind("CORN")));
        assert!(s.drain_events().contains(&GameEvent::CropUnlocked {
            kind: kind("TOMATO"),
            level: 3
        }));
        // Nothing left to unlock the second time.
        assert!(s.catch_up_unlocks().is_empty());
    }

    #[test]
    fn harvest_all_ready_skips_growing_crops() {
        let mut s = session();
        s.plant(Coord::new(0, 0), &kind("RADISH"), ts(T0)).unwrap();
        s.plant(Coord::new(1, 0), &kind("CARROT"), ts(T0)).unwrap();
        assert_eq!(s.harvest_all_ready(ts(T0 + 45.0)), 15);
        assert_eq!(s.farm().occupied_count(), 1);
    }

    #[test]
    fn expand_farm_only_grows() {
        let mut s = session();
        assert!(!s.expand_farm(4, 4));
        assert!(!s.expand_farm(3, 6));
        assert!(s.expand_farm(5, 4));
        assert_eq!(s.farm().width(), 5);
    }
}
