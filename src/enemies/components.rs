//! Creature entity and its per-kind traits.

use serde::{Deserialize, Serialize};

use crate::combat::{apply_damage, HitOutcome, TimedWindow};
use crate::core::{Animation, Body, Hitbox, StateMachine, StateMachineError};
use crate::world::{ArenaError, Item, ItemKind};

use super::ai::{CreatureAnimations, CreatureContext, CreatureParams, CreatureState, CreatureStateName};

/// Stable handle of a creature inside its region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CreatureId(pub u32);

/// Creature type tag (matches the RON definition name).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CreatureKind {
    Spider,
    Skeleton,
    Bat,
    BigBoss,
}

impl CreatureKind {
    pub const ALL: [CreatureKind; 4] = [
        CreatureKind::Spider,
        CreatureKind::Skeleton,
        CreatureKind::Bat,
        CreatureKind::BigBoss,
    ];

    pub fn from_name(name: &str) -> Result<Self, ArenaError> {
        match name.to_ascii_lowercase().as_str() {
            "spider" => Ok(CreatureKind::Spider),
            "skeleton" => Ok(CreatureKind::Skeleton),
            "bat" => Ok(CreatureKind::Bat),
            "big_boss" | "bigboss" | "boss" => Ok(CreatureKind::BigBoss),
            _ => Err(ArenaError::UnknownCreature(name.to_string())),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CreatureKind::Spider => "spider",
            CreatureKind::Skeleton => "skeleton",
            CreatureKind::Bat => "bat",
            CreatureKind::BigBoss => "big_boss",
        }
    }

    pub fn is_boss(self) -> bool {
        matches!(self, CreatureKind::BigBoss)
    }
}

/// Behaviour knobs that differ per kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CreatureTraits {
    pub can_chase: bool,
    pub detection_radius: f32,
    pub lose_interest_radius: f32,
    pub attack_range: f32,
    /// Touching the player deals damage.
    pub contact_damage: bool,
    /// Ignores terrain tiles (arena bounds still apply).
    pub flying: bool,
}

impl Default for CreatureTraits {
    fn default() -> Self {
        Self {
            can_chase: false,
            detection_radius: 80.0,
            lose_interest_radius: 120.0,
            attack_range: 10.0,
            contact_damage: true,
            flying: false,
        }
    }
}

/// A non-player creature.
#[derive(Debug)]
pub struct Creature {
    pub id: CreatureId,
    pub kind: CreatureKind,
    pub body: Body,
    pub traits: CreatureTraits,
    /// Item this creature drops on death.
    pub item_to_keep: Option<ItemKind>,
    /// Materialized drop, handed to the region when the creature is culled.
    pub item_kept: Option<Item>,
    pub hurt: TimedWindow,
    pub animation: Animation,
    pub animations: CreatureAnimations,
    /// Box of the current melee swing, for debug overlays.
    pub attack_hitbox: Option<Hitbox>,
    strike: Option<i32>,
    machine: StateMachine<CreatureState>,
}

impl Creature {
    /// Seconds a hurt creature flashes and ignores further weapon hits.
    pub const HURT_DURATION: f32 = 0.4;

    pub fn new(id: CreatureId, kind: CreatureKind, body: Body, traits: CreatureTraits, animations: CreatureAnimations) -> Result<Self, StateMachineError> {
        let animation = Animation::new(animations.idle.clone());
        Ok(Self {
            id,
            kind,
            body,
            traits,
            item_to_keep: None,
            item_kept: None,
            hurt: TimedWindow::default(),
            animation,
            animations,
            attack_hitbox: None,
            strike: None,
            machine: CreatureState::machine()?,
        })
    }

    pub fn state(&self) -> Option<CreatureStateName> {
        self.machine.current()
    }

    pub fn is_dead(&self) -> bool {
        self.body.is_dead
    }

    pub fn hitbox(&self) -> Hitbox {
        self.body.hitbox()
    }

    pub fn keep_item(&mut self, item: ItemKind) {
        self.item_to_keep = Some(item);
    }

    pub fn play(&mut self, state: CreatureStateName) {
        self.animation = Animation::new(self.animations.get(state).clone());
    }

    /// Queue `damage` for the player. Applied by the region right after this
    /// creature's update.
    pub fn queue_strike(&mut self, damage: i32) {
        self.strike = Some(damage);
    }

    pub fn take_strike(&mut self) -> Option<i32> {
        self.strike.take()
    }

    /// Apply a hit: health, then the death flag, then the dropped item.
    pub fn on_taking_hit(&mut self, damage: i32) -> HitOutcome {
        if self.body.is_dead {
            return HitOutcome::Ignored;
        }

        let outcome = apply_damage(&mut self.body.health, damage);
        match outcome {
            HitOutcome::Killed => {
                self.body.is_dead = true;
                self.hurt.clear();
                if let Some(kind) = self.item_to_keep {
                    self.item_kept = Some(Item::dropped(kind, self.body.center()));
                }
            }
            HitOutcome::Hurt => self.hurt.start(Self::HURT_DURATION),
            HitOutcome::Ignored => {}
        }
        outcome
    }

    /// Blocked by terrain, bounds or another creature. Walkers turn around.
    pub fn handle_wall_collision(&mut self) {
        if self.machine.is_in(CreatureStateName::Walking) {
            self.body.direction = self.body.direction.reversed();
            self.animation.refresh();
        }
    }

    pub fn start(&mut self, ctx: &mut CreatureContext<'_>) -> Result<(), StateMachineError> {
        self.change_state(CreatureStateName::Idle, ctx, None)
    }

    pub fn change_state(
        &mut self,
        state: CreatureStateName,
        ctx: &mut CreatureContext<'_>,
        params: Option<CreatureParams>,
    ) -> Result<(), StateMachineError> {
        let mut machine = std::mem::take(&mut self.machine);
        let result = machine.change(state, self, ctx, params);
        self.machine = machine;
        result
    }

    pub fn update(&mut self, ctx: &mut CreatureContext<'_>, dt: f32) -> Result<(), StateMachineError> {
        let mut machine = std::mem::take(&mut self.machine);
        let result = machine.update(self, ctx, dt);
        self.machine = machine;
        result
    }

    /// Timers and playback; runs after collisions each tick.
    pub fn tick(&mut self, dt: f32) {
        self.hurt.tick(dt);
        self.animation.update(dt);
    }
}
