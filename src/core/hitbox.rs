//! Axis-aligned boxes used for every overlap and collision test.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box, independent of the visual sprite box.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Hitbox {
    pub position: Vec2,
    pub dimensions: Vec2,
    /// Optional RGBA tint for debug overlays.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_color: Option<[f32; 4]>,
}

impl Hitbox {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            dimensions: Vec2::new(width, height),
            debug_color: None,
        }
    }

    pub fn with_debug_color(mut self, rgba: [f32; 4]) -> Self {
        self.debug_color = Some(rgba);
        self
    }

    pub fn left(&self) -> f32 {
        self.position.x
    }

    pub fn right(&self) -> f32 {
        self.position.x + self.dimensions.x
    }

    pub fn top(&self) -> f32 {
        self.position.y
    }

    pub fn bottom(&self) -> f32 {
        self.position.y + self.dimensions.y
    }

    pub fn center(&self) -> Vec2 {
        self.position + self.dimensions / 2.0
    }

    /// A box with no area never overlaps anything.
    pub fn is_empty(&self) -> bool {
        self.dimensions.x <= 0.0 || self.dimensions.y <= 0.0
    }

    /// Separating-axis test: the boxes overlap only if none of the four
    /// axis separations holds. Touching edges do not count.
    pub fn overlaps(&self, other: &Hitbox) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }

        !(self.right() <= other.left()
            || self.left() >= other.right()
            || self.bottom() <= other.top()
            || self.top() >= other.bottom())
    }

    /// Whether this box lies fully inside `bounds`.
    pub fn is_within(&self, bounds: &Hitbox) -> bool {
        self.left() >= bounds.left()
            && self.top() >= bounds.top()
            && self.right() <= bounds.right()
            && self.bottom() <= bounds.bottom()
    }
}

/// Offsets applied to an entity's sprite box to obtain its hitbox.
///
/// `position` shifts the origin, `dimensions` is added to the sprite size
/// (negative values shrink the box).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HitboxOffset {
    pub position: Vec2,
    pub dimensions: Vec2,
}

impl HitboxOffset {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            dimensions: Vec2::new(width, height),
        }
    }

    pub fn apply(&self, position: Vec2, dimensions: Vec2) -> Hitbox {
        let origin = position + self.position;
        let size = dimensions + self.dimensions;
        Hitbox::new(origin.x, origin.y, size.x, size.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlapping_boxes_collide() {
        let a = Hitbox::new(0.0, 0.0, 16.0, 16.0);
        let b = Hitbox::new(8.0, 8.0, 16.0, 16.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn touching_edges_do_not_collide() {
        let a = Hitbox::new(0.0, 0.0, 16.0, 16.0);
        let right = Hitbox::new(16.0, 0.0, 16.0, 16.0);
        let below = Hitbox::new(0.0, 16.0, 16.0, 16.0);
        assert!(!a.overlaps(&right));
        assert!(!a.overlaps(&below));
    }

    #[test]
    fn empty_box_never_collides() {
        let cleared = Hitbox::default();
        let a = Hitbox::new(-4.0, -4.0, 16.0, 16.0);
        assert!(!cleared.overlaps(&a));
        assert!(!a.overlaps(&cleared));
    }

    #[test]
    fn containment_check() {
        let arena = Hitbox::new(0.0, 0.0, 100.0, 50.0);
        assert!(Hitbox::new(0.0, 0.0, 100.0, 50.0).is_within(&arena));
        assert!(!Hitbox::new(90.0, 10.0, 16.0, 16.0).is_within(&arena));
        assert!(!Hitbox::new(-1.0, 10.0, 16.0, 16.0).is_within(&arena));
    }

    #[test]
    fn offset_shrinks_sprite_box() {
        let offset = HitboxOffset::new(24.0, 48.0, -48.0, -48.0);
        let hitbox = offset.apply(Vec2::new(10.0, 20.0), Vec2::new(64.0, 64.0));
        assert_eq!(hitbox, Hitbox::new(34.0, 68.0, 16.0, 16.0));
    }
}
