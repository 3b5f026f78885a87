//! Player module - the player entity, polled input, and its states.

mod components;
mod input;
mod states;

pub use components::*;
pub use input::{InputAction, InputSnapshot, KEY_BINDINGS};
pub use states::{animation_for, weapon_hitbox, PlayerState, PlayerStateName, FALL_SPEED, GROUND_OFFSET};
