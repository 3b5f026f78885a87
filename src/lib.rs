//! Season Arena - the simulation core of a small top-down action game.
//!
//! A player fights creatures across seasonal regions, collects the items
//! they drop and wins by picking up the key the boss keeps.
//!
//! # Architecture
//!
//! Gameplay is plain data advanced by [`world::Region::tick`]; Bevy plugins
//! wrap it with game states, resources and events:
//!
//! - **Core**: Geometry, the state machine engine, game states, global events
//! - **Player**: The player entity, input snapshot and player states
//! - **Combat**: Hit outcomes, timed windows, ability effects
//! - **Enemies**: Creatures, their AI states, data files and spawning
//! - **World**: Regions, terrain, items, configuration and checkpoints

pub mod combat;
pub mod core;
pub mod enemies;
pub mod player;
pub mod world;

use bevy::prelude::*;

/// Main plugin that adds all sub-plugins.
pub struct ArenaPlugin;

impl Plugin for ArenaPlugin {
    fn build(&self, app: &mut App) {
        app
            // Core systems (must be first)
            .add_plugins(core::CorePlugin)

            // Creature definitions
            .add_plugins(enemies::EnemyPlugin)

            // Regions and their tick
            .add_plugins(world::WorldPlugin);
    }
}
