//! Enemy plugin - registers the creature registry and its loader.

use bevy::prelude::*;

use super::data::{load_creature_definitions, CreatureRegistry};
use crate::core::GameState;

/// Enemy plugin - owns creature definitions. Creatures themselves live in
/// the active region and are driven by its tick.
pub struct EnemyPlugin;

impl Plugin for EnemyPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CreatureRegistry>()
            .add_systems(OnEnter(GameState::Loading), load_creature_definitions);
    }
}
