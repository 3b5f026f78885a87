//! Core module - geometry, the state machine engine, playback helpers,
//! game states and events.
//!
//! This module provides the foundation that all other game systems build upon.

mod animation;
mod body;
mod events;
mod fsm;
mod hitbox;
mod plugin;
mod states;
mod tween;

pub use animation::{Animation, AnimationDef};
pub use body::{Body, Direction};
pub use events::*;
pub use fsm::{State, StateMachine, StateMachineError, Transition};
pub use hitbox::{Hitbox, HitboxOffset};
pub use plugin::CorePlugin;
pub use states::*;
pub use tween::{Easing, Tween};
