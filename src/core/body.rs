//! Shared movable, damageable body carried by the player and every creature.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::hitbox::{Hitbox, HitboxOffset};

/// Facing direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn reversed(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    /// Facing from the sign of a horizontal delta. Zero keeps `current`.
    pub fn from_horizontal(dx: f32, current: Direction) -> Self {
        if dx < 0.0 {
            Direction::Left
        } else if dx > 0.0 {
            Direction::Right
        } else {
            current
        }
    }

    pub fn unit(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::NEG_Y,
            Direction::Down => Vec2::Y,
            Direction::Left => Vec2::NEG_X,
            Direction::Right => Vec2::X,
        }
    }
}

/// Base stats and geometry of an entity.
///
/// `hitbox` is derived from `position + hitbox_offset` and must be refreshed
/// after every position or dimension change.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub position: Vec2,
    pub dimensions: Vec2,
    pub hitbox_offset: HitboxOffset,
    hitbox: Hitbox,
    pub health: i32,
    pub total_health: i32,
    pub speed: f32,
    pub damage: i32,
    pub direction: Direction,
    pub is_dead: bool,
    pub clean_up: bool,
    pub render_priority: i32,
}

impl Body {
    pub fn new(position: Vec2, dimensions: Vec2, health: i32, speed: f32, damage: i32) -> Self {
        let mut body = Self {
            position,
            dimensions,
            hitbox_offset: HitboxOffset::default(),
            hitbox: Hitbox::default(),
            health,
            total_health: health,
            speed,
            damage,
            direction: Direction::default(),
            is_dead: false,
            clean_up: false,
            render_priority: 0,
        };
        body.refresh_hitbox();
        body
    }

    pub fn with_hitbox_offset(mut self, offset: HitboxOffset) -> Self {
        self.hitbox_offset = offset;
        self.refresh_hitbox();
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn hitbox(&self) -> Hitbox {
        self.hitbox
    }

    pub fn refresh_hitbox(&mut self) {
        self.hitbox = self.hitbox_offset.apply(self.position, self.dimensions);
    }

    /// Hitbox this body would have at `position`.
    pub fn hitbox_at(&self, position: Vec2) -> Hitbox {
        self.hitbox_offset.apply(position, self.dimensions)
    }

    pub fn move_to(&mut self, position: Vec2) {
        self.position = position;
        self.refresh_hitbox();
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.move_to(self.position + delta);
    }

    pub fn center(&self) -> Vec2 {
        self.hitbox.center()
    }

    pub fn distance_to(&self, point: Vec2) -> f32 {
        self.center().distance(point)
    }

    /// Move so the hitbox stays within `bounds`.
    pub fn clamp_within(&mut self, bounds: &Hitbox) {
        let hitbox = self.hitbox;
        let mut delta = Vec2::ZERO;
        if hitbox.left() < bounds.left() {
            delta.x = bounds.left() - hitbox.left();
        } else if hitbox.right() > bounds.right() {
            delta.x = bounds.right() - hitbox.right();
        }
        if hitbox.top() < bounds.top() {
            delta.y = bounds.top() - hitbox.top();
        } else if hitbox.bottom() > bounds.bottom() {
            delta.y = bounds.bottom() - hitbox.bottom();
        }
        if delta != Vec2::ZERO {
            self.translate(delta);
        }
    }
}
