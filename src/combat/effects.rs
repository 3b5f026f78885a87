//! Transient ability effects spawned by the player into the region.

use bevy::prelude::*;

use crate::core::{Animation, AnimationDef, Direction, Easing, Hitbox, Tween};
use crate::enemies::CreatureId;

/// Stable handle of an effect inside an [`EffectPool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EffectId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    FireFlame,
    FrozenBlast,
}

/// What ends an effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectLifetime {
    /// Removed when the state that cast it exits.
    BoundToCaster,
    /// Removed once its travel tween completes.
    UntilTweenEnds,
}

/// A damaging effect object: fire burst or ice projectile.
#[derive(Debug, Clone)]
pub struct Effect {
    pub id: EffectId,
    pub kind: EffectKind,
    pub position: Vec2,
    pub dimensions: Vec2,
    pub direction: Direction,
    pub damage: i32,
    pub lifetime: EffectLifetime,
    pub tween: Option<Tween>,
    pub animation: Animation,
    pub clean_up: bool,
    struck: Vec<CreatureId>,
}

impl Effect {
    pub const FIRE_FLAME_SIZE: Vec2 = Vec2::new(32.0, 32.0);
    pub const FIRE_FLAME_DAMAGE: i32 = 3;

    pub const FROZEN_BLAST_SIZE: Vec2 = Vec2::new(54.22, 18.0);
    pub const FROZEN_BLAST_DAMAGE: i32 = 5;
    pub const FROZEN_BLAST_TRAVEL: f32 = 70.0;
    pub const FROZEN_BLAST_DURATION: f32 = 1.2;

    /// Gap between the caster's sprite and the spawned effect.
    const SPAWN_GAP: f32 = 8.0;

    /// Stationary fire burst in front of the caster.
    pub fn fire_flame(id: EffectId, caster: Vec2, direction: Direction, caster_size: Vec2) -> Self {
        let position = Self::spawn_position(caster, direction, caster_size, Self::FIRE_FLAME_SIZE);
        Self {
            id,
            kind: EffectKind::FireFlame,
            position,
            dimensions: Self::FIRE_FLAME_SIZE,
            direction,
            damage: Self::FIRE_FLAME_DAMAGE,
            lifetime: EffectLifetime::BoundToCaster,
            tween: None,
            animation: Animation::new(AnimationDef::once((0..12).collect(), 0.4)),
            clean_up: false,
            struck: Vec::new(),
        }
    }

    /// Ice projectile that travels away from the caster. Vertical casts stay
    /// in place since there is no vertical art.
    pub fn frozen_blast(id: EffectId, caster: Vec2, direction: Direction, caster_size: Vec2) -> Self {
        let position = Self::spawn_position(caster, direction, caster_size, Self::FROZEN_BLAST_SIZE);
        let end = if direction.is_horizontal() {
            position + direction.unit() * Self::FROZEN_BLAST_TRAVEL
        } else {
            position
        };
        let frames: Vec<usize> = match direction {
            Direction::Left => (0..9).rev().collect(),
            _ => (0..9).collect(),
        };

        Self {
            id,
            kind: EffectKind::FrozenBlast,
            position,
            dimensions: Self::FROZEN_BLAST_SIZE,
            direction,
            damage: Self::FROZEN_BLAST_DAMAGE,
            lifetime: EffectLifetime::UntilTweenEnds,
            tween: Some(Tween::new(
                position,
                end,
                Self::FROZEN_BLAST_DURATION,
                Easing::EaseOutQuad,
            )),
            animation: Animation::new(AnimationDef::looping(frames, 0.1)),
            clean_up: false,
            struck: Vec::new(),
        }
    }

    /// Place an effect of `size` just beyond the caster on the facing side,
    /// centered on the perpendicular axis.
    pub fn spawn_position(caster: Vec2, direction: Direction, caster_size: Vec2, size: Vec2) -> Vec2 {
        let mut start = caster;
        match direction {
            Direction::Up => {
                start.x += (caster_size.x - size.x) / 2.0;
                start.y -= size.y + Self::SPAWN_GAP;
            }
            Direction::Down => {
                start.x += (caster_size.x - size.x) / 2.0;
                start.y += caster_size.y + Self::SPAWN_GAP;
            }
            Direction::Left => {
                start.x -= size.x + Self::SPAWN_GAP;
                start.y += (caster_size.y - size.y) / 2.0;
            }
            Direction::Right => {
                start.x += caster_size.x + Self::SPAWN_GAP;
                start.y += (caster_size.y - size.y) / 2.0;
            }
        }
        start
    }

    pub fn hitbox(&self) -> Hitbox {
        Hitbox::new(self.position.x, self.position.y, self.dimensions.x, self.dimensions.y)
    }

    pub fn update(&mut self, dt: f32) {
        self.animation.update(dt);
        if let Some(tween) = self.tween.as_mut() {
            self.position = tween.advance(dt);
            if tween.is_finished() && self.lifetime == EffectLifetime::UntilTweenEnds {
                self.clean_up = true;
            }
        }
    }

    /// Register a hit on `target`. Each effect damages a creature once.
    pub fn strike(&mut self, target: CreatureId) -> Option<i32> {
        if self.clean_up || self.struck.contains(&target) {
            return None;
        }
        self.struck.push(target);
        Some(self.damage)
    }
}

/// Effects currently alive in a region.
#[derive(Debug, Default)]
pub struct EffectPool {
    effects: Vec<Effect>,
    next_id: u32,
}

impl EffectPool {
    pub fn spawn(&mut self, build: impl FnOnce(EffectId) -> Effect) -> EffectId {
        let id = EffectId(self.next_id);
        self.next_id += 1;
        self.effects.push(build(id));
        id
    }

    /// Called by the casting state on exit. Only caster-bound effects end
    /// here; projectiles keep flying.
    pub fn release(&mut self, id: EffectId) {
        if let Some(effect) = self.effects.iter_mut().find(|effect| effect.id == id) {
            if effect.lifetime == EffectLifetime::BoundToCaster {
                effect.clean_up = true;
            }
        }
    }

    pub fn get(&self, id: EffectId) -> Option<&Effect> {
        self.effects.iter().find(|effect| effect.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Effect> {
        self.effects.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Effect> {
        self.effects.iter_mut()
    }

    pub fn update(&mut self, dt: f32) {
        for effect in self.effects.iter_mut().filter(|effect| !effect.clean_up) {
            effect.update(dt);
        }
    }

    /// Drop every effect flagged for clean-up.
    pub fn clean_up(&mut self) {
        self.effects.retain(|effect| !effect.clean_up);
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAYER: Vec2 = Vec2::new(16.0, 16.0);

    #[test]
    fn fire_flame_spawns_in_front_of_caster() {
        let right = Effect::fire_flame(EffectId(0), Vec2::new(100.0, 100.0), Direction::Right, PLAYER);
        assert_eq!(right.position, Vec2::new(124.0, 92.0));

        let left = Effect::fire_flame(EffectId(1), Vec2::new(100.0, 100.0), Direction::Left, PLAYER);
        assert_eq!(left.position, Vec2::new(60.0, 92.0));
    }

    #[test]
    fn frozen_blast_travels_and_cleans_itself_up() {
        let mut blast = Effect::frozen_blast(EffectId(0), Vec2::new(100.0, 100.0), Direction::Right, PLAYER);
        let start = blast.position;

        blast.update(0.6);
        assert!(blast.position.x > start.x);
        assert!(!blast.clean_up);

        blast.update(0.7);
        assert_eq!(blast.position, start + Vec2::new(Effect::FROZEN_BLAST_TRAVEL, 0.0));
        assert!(blast.clean_up);
    }

    #[test]
    fn effect_strikes_each_creature_once() {
        let mut flame = Effect::fire_flame(EffectId(0), Vec2::ZERO, Direction::Right, PLAYER);
        assert_eq!(flame.strike(CreatureId(1)), Some(Effect::FIRE_FLAME_DAMAGE));
        assert_eq!(flame.strike(CreatureId(1)), None);
        assert_eq!(flame.strike(CreatureId(2)), Some(Effect::FIRE_FLAME_DAMAGE));
    }

    #[test]
    fn release_only_ends_caster_bound_effects() {
        let mut pool = EffectPool::default();
        let flame = pool.spawn(|id| Effect::fire_flame(id, Vec2::ZERO, Direction::Right, PLAYER));
        let blast = pool.spawn(|id| Effect::frozen_blast(id, Vec2::ZERO, Direction::Left, PLAYER));

        pool.release(flame);
        pool.release(blast);
        pool.clean_up();

        assert_eq!(pool.len(), 1);
        assert!(pool.get(blast).is_some());
        assert!(pool.get(flame).is_none());
    }
}
