//! Game flow states.
//!
//! The region simulation only runs in `InGame`. The orchestrator's one-shot
//! outcome signal moves the game to `GameOver` or `Victory`; title and menu
//! screens live outside this crate.

use bevy::prelude::*;

/// Top-level game state.
///
/// - Start in `Loading` while creature and region data is read
/// - `InGame` runs the active region
/// - `Paused` freezes the region but keeps it alive
/// - `GameOver` once the player's lives are exhausted
/// - `Victory` once the player holds the key
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum GameState {
    #[default]
    Loading,
    InGame,
    Paused,
    GameOver,
    Victory,
}
