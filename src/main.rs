//! Season Arena - headless entry point.
//!
//! Runs the simulation at the configured tick rate without a window.
//!
//! Controls (when a keyboard source is attached):
//! - WASD / Arrows: Move
//! - Space: Sword
//! - J: Fire flame
//! - K: Frozen blast
//! - Escape: Pause/Unpause

use std::path::Path;
use std::time::Duration;

use bevy::app::ScheduleRunnerPlugin;
use bevy::input::InputPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;

use season_arena::world::ArenaConfig;

fn main() {
    let config = ArenaConfig::load(Path::new("assets/config.ron"));
    let tick = Duration::from_secs_f64(1.0 / config.tick_rate_hz.max(1.0));

    App::new()
        // Headless runtime
        .add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(tick)))
        .add_plugins((LogPlugin::default(), InputPlugin, StatesPlugin))

        // Configuration must exist before the world plugin seeds its generator
        .insert_resource(config)

        // Our game plugin
        .add_plugins(season_arena::ArenaPlugin)

        .run();
}
