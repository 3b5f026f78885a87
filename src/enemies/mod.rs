//! Enemies module - creatures, their AI states, data and spawning.

mod ai;
mod components;
pub mod data;
mod plugin;
mod spawning;

pub use ai::{
    attack_hitbox, CreatureAnimations, CreatureContext, CreatureParams, CreatureState, CreatureStateName,
    PlayerView, ATTACK_DURATION, ATTACK_REACH, CHASE_SPEED_MULTIPLIER,
};
pub use components::*;
pub use data::{CreatureDefinition, CreatureRegistry};
pub use plugin::EnemyPlugin;
pub use spawning::{assign_item_keepers, find_spawn_position, spawn_creatures, SpawnArea, MAX_SPAWN_ATTEMPTS, MIN_SPAWN_SPACING};
