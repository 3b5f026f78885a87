//! Combat module - hit outcomes, timed damage windows and ability effects.

mod components;
mod effects;

pub use components::*;
pub use effects::{Effect, EffectId, EffectKind, EffectLifetime, EffectPool};
