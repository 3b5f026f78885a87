//! Position tweening with easing, used for projectiles and dropped items.

use bevy::prelude::*;

/// Easing curves applied to normalized tween progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    #[default]
    Linear,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
}

impl Easing {
    /// Map `t` in `[0, 1]` to eased progress in `[0, 1]`.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseInQuad => t * t,
            Easing::EaseOutQuad => t * (2.0 - t),
            Easing::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
        }
    }
}

/// Travel from `start` to `end` over `duration` seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    pub start: Vec2,
    pub end: Vec2,
    pub duration: f32,
    pub easing: Easing,
    elapsed: f32,
}

impl Tween {
    pub fn new(start: Vec2, end: Vec2, duration: f32, easing: Easing) -> Self {
        Self {
            start,
            end,
            duration,
            easing,
            elapsed: 0.0,
        }
    }

    /// Advance by `dt` and return the new position.
    pub fn advance(&mut self, dt: f32) -> Vec2 {
        self.elapsed = (self.elapsed + dt).min(self.duration);
        self.position()
    }

    pub fn position(&self) -> Vec2 {
        self.start.lerp(self.end, self.easing.apply(self.progress()))
    }

    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        self.elapsed / self.duration
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}
