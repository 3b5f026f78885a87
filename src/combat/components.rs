//! Damage bookkeeping shared by the player and creatures.

use std::time::Duration;

use bevy::prelude::*;

/// Result of applying one hit to a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// The hit was discarded (target dead, invulnerable, or no damage).
    Ignored,
    /// Health dropped but the target survived.
    Hurt,
    /// Health reached zero on this hit.
    Killed,
}

impl HitOutcome {
    pub fn landed(self) -> bool {
        !matches!(self, HitOutcome::Ignored)
    }
}

/// A time-boxed flag: hurt flash, invulnerability window, ability cooldown.
///
/// Inactive until `start` is called; expires on its own once its timer
/// finishes.
#[derive(Debug, Clone, Default)]
pub struct TimedWindow {
    timer: Option<Timer>,
}

impl TimedWindow {
    pub fn start(&mut self, seconds: f32) {
        self.timer = Some(Timer::from_seconds(seconds, TimerMode::Once));
    }

    pub fn clear(&mut self) {
        self.timer = None;
    }

    pub fn tick(&mut self, dt: f32) {
        if let Some(timer) = self.timer.as_mut() {
            timer.tick(Duration::from_secs_f32(dt.max(0.0)));
            if timer.finished() {
                self.timer = None;
            }
        }
    }

    pub fn is_active(&self) -> bool {
        self.timer.is_some()
    }

    pub fn remaining(&self) -> f32 {
        self.timer
            .as_ref()
            .map_or(0.0, |timer| timer.remaining_secs())
    }
}

/// Apply `damage` to a health pool. Returns the outcome and never drops
/// health below zero.
pub fn apply_damage(health: &mut i32, damage: i32) -> HitOutcome {
    if damage <= 0 || *health <= 0 {
        return HitOutcome::Ignored;
    }

    *health -= damage;
    if *health <= 0 {
        *health = 0;
        HitOutcome::Killed
    } else {
        HitOutcome::Hurt
    }
}
