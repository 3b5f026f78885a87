//! Creature placement and drop assignment when a region is built.

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::world::{ArenaError, ItemKind, TileMap};

use super::components::{Creature, CreatureId, CreatureKind};
use super::data::CreatureRegistry;

/// Attempts per creature before its spawn is skipped.
pub const MAX_SPAWN_ATTEMPTS: usize = 50;
/// Minimum distance between spawn positions.
pub const MIN_SPAWN_SPACING: f32 = 32.0;

/// Integer-sampled rectangle of candidate spawn positions (inclusive).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnArea {
    pub min: IVec2,
    pub max: IVec2,
}

impl SpawnArea {
    /// Where ordinary creatures may appear.
    pub const CREATURES: SpawnArea = SpawnArea {
        min: IVec2::new(50, 50),
        max: IVec2::new(330, 150),
    };
    /// Smaller, higher rectangle for bosses.
    pub const BOSS: SpawnArea = SpawnArea {
        min: IVec2::new(120, 10),
        max: IVec2::new(200, 40),
    };

    pub fn for_kind(kind: CreatureKind) -> Self {
        if kind.is_boss() {
            Self::BOSS
        } else {
            Self::CREATURES
        }
    }

    pub fn sample(&self, rng: &mut StdRng) -> Vec2 {
        Vec2::new(
            rng.gen_range(self.min.x..=self.max.x) as f32,
            rng.gen_range(self.min.y..=self.max.y) as f32,
        )
    }
}

/// Sample up to [`MAX_SPAWN_ATTEMPTS`] positions and return the first that
/// keeps its distance from `placed` and passes `accept`.
pub fn find_spawn_position(
    area: &SpawnArea,
    placed: &[Vec2],
    rng: &mut StdRng,
    accept: impl Fn(Vec2) -> bool,
) -> Option<Vec2> {
    (0..MAX_SPAWN_ATTEMPTS)
        .map(|_| area.sample(rng))
        .find(|candidate| {
            placed
                .iter()
                .all(|other| other.distance(*candidate) >= MIN_SPAWN_SPACING)
                && accept(*candidate)
        })
}

/// Create `count` creatures of each requested kind at spaced, open
/// positions. Unknown kind names fail; exhausted placements are skipped.
pub fn spawn_creatures(
    requests: &[(String, usize)],
    registry: &CreatureRegistry,
    map: &TileMap,
    rng: &mut StdRng,
) -> Result<Vec<Creature>, ArenaError> {
    let mut creatures = Vec::new();
    let mut placed = Vec::new();
    let mut next_id = 0;

    for (name, count) in requests {
        let kind = CreatureKind::from_name(name)?;
        let Some(definition) = registry.get(kind) else {
            return Err(ArenaError::UnknownCreature(name.clone()));
        };
        let area = SpawnArea::for_kind(kind);

        for _ in 0..*count {
            let position = find_spawn_position(&area, &placed, rng, |candidate| {
                let hitbox = definition.hitbox_at(candidate);
                hitbox.is_within(&map.bounds()) && (definition.flying || !map.overlaps_blocking(&hitbox))
            });

            let Some(position) = position else {
                warn!(
                    "No free spawn position for {} after {} attempts, skipping",
                    kind.name(),
                    MAX_SPAWN_ATTEMPTS
                );
                continue;
            };

            placed.push(position);
            creatures.push(registry.create_kind(kind, CreatureId(next_id), position)?);
            next_id += 1;
        }
    }

    Ok(creatures)
}

/// Choose which creatures drop which items. Bosses always keep the Key;
/// every other drop goes to a random creature not already keeping one.
pub fn assign_item_keepers(creatures: &mut [Creature], drops: &[ItemKind], rng: &mut StdRng) {
    if let Some(boss) = creatures.iter_mut().find(|creature| creature.kind.is_boss()) {
        boss.keep_item(ItemKind::Key);
    }

    for item in drops {
        let eligible: Vec<usize> = creatures
            .iter()
            .enumerate()
            .filter(|(_, creature)| creature.item_to_keep.is_none())
            .map(|(index, _)| index)
            .collect();

        match eligible.choose(rng) {
            Some(&index) => {
                debug!("{:?} will be dropped by {:?}", item, creatures[index].kind);
                creatures[index].keep_item(*item);
            }
            None => warn!("No creature left to keep {:?}", item),
        }
    }
}
