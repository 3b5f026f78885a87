//! The player entity, its abilities and tuning.

use std::collections::{BTreeSet, HashMap};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::combat::{apply_damage, HitOutcome, TimedWindow};
use crate::core::{Animation, Body, Direction, Hitbox, StateMachine, StateMachineError};
use crate::enemies::PlayerView;
use crate::world::{ItemKind, Stage};

use super::states::{animation_for, PlayerState, PlayerStateName};

/// Cast abilities unlocked by items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AbilityKind {
    FireFlame,
    FrozenBlast,
}

impl AbilityKind {
    pub fn state(self) -> PlayerStateName {
        match self {
            AbilityKind::FireFlame => PlayerStateName::FireFlame,
            AbilityKind::FrozenBlast => PlayerStateName::FrozenBlast,
        }
    }
}

/// Player tuning, loaded as part of the arena configuration.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub max_health: i32,
    pub starting_lives: i32,
    /// Movement speed in pixels per second
    pub move_speed: f32,
    pub damage: i32,
    /// Seconds of immunity after taking a hit
    pub invulnerability_duration: f32,
    pub fire_flame_cooldown: f32,
    pub frozen_blast_cooldown: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            max_health: 6,
            starting_lives: 3,
            move_speed: 60.0,
            damage: 1,
            invulnerability_duration: 1.5,
            fire_flame_cooldown: 3.0,
            frozen_blast_cooldown: 2.0,
        }
    }
}

impl PlayerConfig {
    pub fn cooldown(&self, ability: AbilityKind) -> f32 {
        match ability {
            AbilityKind::FireFlame => self.fire_flame_cooldown,
            AbilityKind::FrozenBlast => self.frozen_blast_cooldown,
        }
    }
}

/// Progress carried between regions and stored in checkpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerProgress {
    pub health: i32,
    pub lives: i32,
    pub position: Vec2,
    pub direction: Direction,
    pub unlocked_abilities: Vec<AbilityKind>,
    pub items_collected: Vec<ItemKind>,
}

/// The user-controlled entity.
#[derive(Debug)]
pub struct Player {
    pub body: Body,
    pub lives: i32,
    pub invulnerable: TimedWindow,
    pub items_collected: Vec<ItemKind>,
    /// Weapon box used against creatures. Present for a single tick per
    /// swing or cast.
    pub weapon_hitbox: Option<Hitbox>,
    pub animation: Animation,
    pub is_falling: bool,
    pub ready_for_game_over: bool,
    unlocked: BTreeSet<AbilityKind>,
    cooldowns: HashMap<AbilityKind, TimedWindow>,
    config: PlayerConfig,
    machine: StateMachine<PlayerState>,
}

impl Player {
    pub const SIZE: Vec2 = Vec2::new(16.0, 16.0);
    /// Sprite size while swinging or casting.
    pub const ACTION_SIZE: Vec2 = Vec2::new(32.0, 32.0);
    pub const LIVES_EXHAUSTED: i32 = -1;

    /// Build a player at `position` and enter Idle.
    pub fn spawn(config: &PlayerConfig, position: Vec2, stage: &mut Stage) -> Result<Self, StateMachineError> {
        let body = Body::new(position, Self::SIZE, config.max_health, config.move_speed, config.damage);
        let mut player = Self {
            body,
            lives: config.starting_lives,
            invulnerable: TimedWindow::default(),
            items_collected: Vec::new(),
            weapon_hitbox: None,
            animation: Animation::new(animation_for(PlayerStateName::Idle, Direction::Down)),
            is_falling: false,
            ready_for_game_over: false,
            unlocked: BTreeSet::new(),
            cooldowns: HashMap::new(),
            config: config.clone(),
            machine: PlayerState::machine()?,
        };
        player.change_state(PlayerStateName::Idle, stage)?;
        Ok(player)
    }

    pub fn state(&self) -> Option<PlayerStateName> {
        self.machine.current()
    }

    pub fn is_dead(&self) -> bool {
        self.body.is_dead
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable.is_active()
    }

    pub fn lives_exhausted(&self) -> bool {
        self.lives <= Self::LIVES_EXHAUSTED
    }

    /// Creatures may target the player.
    pub fn is_targetable(&self) -> bool {
        !self.body.is_dead && !self.is_falling
    }

    /// Contact damage may apply.
    pub fn can_be_touched(&self) -> bool {
        self.is_targetable() && !self.is_invulnerable()
    }

    pub fn view(&self) -> PlayerView {
        PlayerView {
            hitbox: self.body.hitbox(),
            is_targetable: self.is_targetable(),
        }
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    /// Play the animation of `state` for the current facing.
    pub fn play(&mut self, state: PlayerStateName) {
        self.animation = Animation::new(animation_for(state, self.body.direction));
    }

    /// Apply a hit. Ignored while invulnerable or dead. Lethal hits move the
    /// player into Dead; lives are settled once the death animation ends.
    pub fn on_taking_damage(&mut self, damage: i32, stage: &mut Stage) -> Result<HitOutcome, StateMachineError> {
        if self.is_invulnerable() || self.body.is_dead {
            return Ok(HitOutcome::Ignored);
        }

        let outcome = apply_damage(&mut self.body.health, damage);
        match outcome {
            HitOutcome::Killed => {
                self.body.is_dead = true;
                info!("Player died with {} lives left", self.lives);
                self.change_state(PlayerStateName::Dead, stage)?;
            }
            HitOutcome::Hurt => {
                self.invulnerable.start(self.config.invulnerability_duration);
            }
            HitOutcome::Ignored => {}
        }
        Ok(outcome)
    }

    /// Register a picked-up item and apply its effect.
    pub fn collect(&mut self, item: ItemKind) {
        if let Some(ability) = item.unlocks() {
            self.unlock(ability);
        }
        self.items_collected.push(item);
    }

    pub fn has_item(&self, item: ItemKind) -> bool {
        self.items_collected.contains(&item)
    }

    pub fn unlock(&mut self, ability: AbilityKind) {
        if self.unlocked.insert(ability) {
            info!("Unlocked ability {:?}", ability);
        }
    }

    pub fn is_unlocked(&self, ability: AbilityKind) -> bool {
        self.unlocked.contains(&ability)
    }

    pub fn is_cooling_down(&self, ability: AbilityKind) -> bool {
        self.cooldowns.get(&ability).is_some_and(TimedWindow::is_active)
    }

    /// Abilities need an unlock, a horizontal facing and no running cooldown.
    pub fn can_use(&self, ability: AbilityKind) -> bool {
        self.is_unlocked(ability) && self.body.direction.is_horizontal() && !self.is_cooling_down(ability)
    }

    pub fn start_cooldown(&mut self, ability: AbilityKind) {
        let seconds = self.config.cooldown(ability);
        self.cooldowns.entry(ability).or_default().start(seconds);
    }

    /// Full health, alive, no immunity.
    pub fn revive(&mut self) {
        self.body.health = self.body.total_health;
        self.body.is_dead = false;
        self.invulnerable.clear();
    }

    pub fn update(&mut self, stage: &mut Stage, dt: f32) -> Result<(), StateMachineError> {
        self.invulnerable.tick(dt);
        for cooldown in self.cooldowns.values_mut() {
            cooldown.tick(dt);
        }
        self.animation.update(dt);

        let mut machine = std::mem::take(&mut self.machine);
        let result = machine.update(self, stage, dt);
        self.machine = machine;
        result
    }

    pub fn change_state(&mut self, state: PlayerStateName, stage: &mut Stage) -> Result<(), StateMachineError> {
        let mut machine = std::mem::take(&mut self.machine);
        let result = machine.change(state, self, stage, None);
        self.machine = machine;
        result
    }

    pub fn progress(&self) -> PlayerProgress {
        PlayerProgress {
            health: self.body.health,
            lives: self.lives,
            position: self.body.position,
            direction: self.body.direction,
            unlocked_abilities: self.unlocked.iter().copied().collect(),
            items_collected: self.items_collected.clone(),
        }
    }

    /// Apply saved progress. Position is left to the region's start point.
    pub fn restore(&mut self, progress: &PlayerProgress) {
        if progress.health > 0 {
            self.body.health = progress.health.min(self.body.total_health);
        }
        if progress.lives > 0 {
            self.lives = progress.lives;
        }
        self.body.direction = progress.direction;
        self.unlocked = progress.unlocked_abilities.iter().copied().collect();
        self.items_collected = progress
            .items_collected
            .iter()
            .copied()
            .filter(|item| *item != ItemKind::Key)
            .collect();
    }
}
