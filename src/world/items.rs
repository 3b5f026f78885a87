//! Collectible items: placed in a region or dropped by dying creatures.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::{Animation, AnimationDef, Easing, Hitbox, HitboxOffset, SoundName, Tween};
use crate::player::AbilityKind;

use super::error::ArenaError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ItemKind {
    /// Unlocks Frozen Blast.
    Crystal,
    /// Unlocks Fire Flame.
    FireTorch,
    /// Collecting it wins the run.
    Key,
}

impl ItemKind {
    pub fn from_name(name: &str) -> Result<Self, ArenaError> {
        match name.to_ascii_lowercase().as_str() {
            "crystal" => Ok(ItemKind::Crystal),
            "fire_torch" | "firetorch" | "torch" => Ok(ItemKind::FireTorch),
            "key" => Ok(ItemKind::Key),
            _ => Err(ArenaError::UnknownItem(name.to_string())),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ItemKind::Crystal => "crystal",
            ItemKind::FireTorch => "fire_torch",
            ItemKind::Key => "key",
        }
    }

    pub fn unlocks(self) -> Option<AbilityKind> {
        match self {
            ItemKind::Crystal => Some(AbilityKind::FrozenBlast),
            ItemKind::FireTorch => Some(AbilityKind::FireFlame),
            ItemKind::Key => None,
        }
    }

    pub fn pickup_sound(self) -> SoundName {
        match self {
            ItemKind::Key => SoundName::KeyPickup,
            _ => SoundName::ItemPickup,
        }
    }
}

/// An item lying in the region.
#[derive(Debug, Clone)]
pub struct Item {
    pub kind: ItemKind,
    pub position: Vec2,
    pub dimensions: Vec2,
    pub hitbox_offset: HitboxOffset,
    pub tween: Option<Tween>,
    pub animation: Animation,
    pub clean_up: bool,
}

impl Item {
    pub const SIZE: Vec2 = Vec2::new(16.0, 16.0);
    const POP_HEIGHT: f32 = 12.0;
    const POP_DURATION: f32 = 0.4;

    pub fn placed(kind: ItemKind, position: Vec2) -> Self {
        Self {
            kind,
            position,
            dimensions: Self::SIZE,
            hitbox_offset: HitboxOffset::new(4.0, 4.0, -8.0, -8.0),
            tween: None,
            animation: Animation::new(AnimationDef::looping(vec![0, 1, 2, 3], 0.2)),
            clean_up: false,
        }
    }

    /// Item popping out of a creature whose hitbox is centered on `origin`.
    pub fn dropped(kind: ItemKind, origin: Vec2) -> Self {
        let start = origin - Self::SIZE / 2.0;
        let mut item = Self::placed(kind, start);
        item.tween = Some(Tween::new(
            start - Vec2::new(0.0, Self::POP_HEIGHT),
            start,
            Self::POP_DURATION,
            Easing::EaseOutQuad,
        ));
        item.position = start - Vec2::new(0.0, Self::POP_HEIGHT);
        item
    }

    pub fn hitbox(&self) -> Hitbox {
        self.hitbox_offset.apply(self.position, self.dimensions)
    }

    pub fn update(&mut self, dt: f32) {
        self.animation.update(dt);
        if let Some(tween) = self.tween.as_mut() {
            self.position = tween.advance(dt);
            if tween.is_finished() {
                self.tween = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_resolve_to_kinds() {
        assert_eq!(ItemKind::from_name("crystal").unwrap(), ItemKind::Crystal);
        assert_eq!(ItemKind::from_name("Fire_Torch").unwrap(), ItemKind::FireTorch);
        assert_eq!(ItemKind::from_name("key").unwrap(), ItemKind::Key);
        assert!(matches!(
            ItemKind::from_name("sword"),
            Err(ArenaError::UnknownItem(name)) if name == "sword"
        ));
    }

    #[test]
    fn dropped_item_settles_at_origin() {
        let mut item = Item::dropped(ItemKind::Key, Vec2::new(100.0, 100.0));
        assert!(item.tween.is_some());
        item.update(1.0);
        assert!(item.tween.is_none());
        assert_eq!(item.position, Vec2::new(92.0, 92.0));
        assert!(item.hitbox().center().distance(Vec2::new(100.0, 100.0)) < 1e-4);
    }
}
