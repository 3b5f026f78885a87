//! Region-owned collaborators handed to the player's states.

use crate::combat::EffectPool;
use crate::core::{Hitbox, SoundEvent, SoundName};
use crate::player::InputSnapshot;

use super::map::TileMap;

/// Terrain, input, effect list and pending audio cues of a region.
///
/// The region keeps this apart from its creature list so the player can be
/// updated, or damaged mid-creature-loop, while creatures are borrowed.
#[derive(Debug)]
pub struct Stage {
    pub map: TileMap,
    pub arena: Hitbox,
    pub input: InputSnapshot,
    pub effects: EffectPool,
    pub sounds: Vec<SoundEvent>,
}

impl Stage {
    pub fn new(map: TileMap) -> Self {
        let arena = map.bounds();
        Self {
            map,
            arena,
            input: InputSnapshot::default(),
            effects: EffectPool::default(),
            sounds: Vec::new(),
        }
    }

    pub fn cue(&mut self, sound: SoundName) {
        self.sounds.push(SoundEvent::Play(sound));
    }
}
