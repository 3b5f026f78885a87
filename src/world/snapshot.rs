//! Checkpoint snapshots and where they are stored.

use std::collections::BTreeMap;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::enemies::CreatureKind;
use crate::player::PlayerProgress;

use super::data::Season;
use super::error::ArenaError;

/// What a checkpoint remembers about a region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionSnapshot {
    pub region: String,
    pub season: Season,
    pub player: PlayerProgress,
    pub alive_creatures: BTreeMap<CreatureKind, usize>,
    pub boss_health: Option<i32>,
}

/// Storage backend for checkpoints.
pub trait SaveStore: Send + Sync + 'static {
    fn save(&mut self, snapshot: &RegionSnapshot) -> Result<(), ArenaError>;

    /// Most recent checkpoint.
    fn load(&self) -> Option<RegionSnapshot>;

    fn clear(&mut self);
}

/// Keeps the latest checkpoint in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    latest: Option<RegionSnapshot>,
    saves: usize,
}

impl MemoryStore {
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl SaveStore for MemoryStore {
    fn save(&mut self, snapshot: &RegionSnapshot) -> Result<(), ArenaError> {
        self.latest = Some(snapshot.clone());
        self.saves += 1;
        Ok(())
    }

    fn load(&self) -> Option<RegionSnapshot> {
        self.latest.clone()
    }

    fn clear(&mut self) {
        self.latest = None;
    }
}

/// Active save backend.
#[derive(Resource)]
pub struct SaveSlot(pub Box<dyn SaveStore>);

impl Default for SaveSlot {
    fn default() -> Self {
        Self(Box::new(MemoryStore::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Direction;

    fn snapshot(region: &str) -> RegionSnapshot {
        RegionSnapshot {
            region: region.to_string(),
            season: Season::Winter,
            player: PlayerProgress {
                health: 3,
                lives: 2,
                position: Vec2::new(10.0, 20.0),
                direction: Direction::Left,
                unlocked_abilities: Vec::new(),
                items_collected: Vec::new(),
            },
            alive_creatures: BTreeMap::from([(CreatureKind::BigBoss, 1)]),
            boss_health: Some(40),
        }
    }

    #[test]
    fn memory_store_keeps_latest() {
        let mut store = MemoryStore::default();
        assert!(store.load().is_none());

        store.save(&snapshot("summer")).unwrap();
        store.save(&snapshot("winter")).unwrap();
        assert_eq!(store.saves(), 2);
        assert_eq!(store.load().unwrap().region, "winter");

        store.clear();
        assert!(store.load().is_none());
    }
}
