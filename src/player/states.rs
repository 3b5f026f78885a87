//! Player behaviour states.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::combat::{Effect, EffectId};
use crate::core::{AnimationDef, Body, Direction, Hitbox, SoundName, State, StateMachine, StateMachineError, Transition};
use crate::world::Stage;

use super::components::{AbilityKind, Player};
use super::input::{InputAction, InputSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerStateName {
    Idle,
    Walking,
    SwordSwinging,
    FireFlame,
    FrozenBlast,
    Dead,
    /// Respawn drop from above the arena.
    Falling,
}

/// Pixels per second while falling back in after a respawn.
pub const FALL_SPEED: f32 = 150.0;
/// Distance kept between the landing spot and the arena's bottom edge.
pub const GROUND_OFFSET: f32 = 20.0;

/// Frames for `state` facing `direction`. Sheets are laid out one row per
/// direction: right, left, down, up.
pub fn animation_for(state: PlayerStateName, direction: Direction) -> AnimationDef {
    let row = match direction {
        Direction::Right => 0,
        Direction::Left => 1,
        Direction::Down => 2,
        Direction::Up => 3,
    };
    let frames = |count: usize| (row * count..row * count + count).collect::<Vec<_>>();

    match state {
        PlayerStateName::Idle => AnimationDef::looping(vec![row * 4], 1.0),
        PlayerStateName::Walking => AnimationDef::looping(frames(4), 0.2),
        PlayerStateName::SwordSwinging => AnimationDef::once(frames(8), 0.1),
        PlayerStateName::FireFlame => AnimationDef::once(frames(4), 0.2),
        PlayerStateName::FrozenBlast => AnimationDef::once(frames(8), 0.06),
        PlayerStateName::Dead => AnimationDef::once(vec![0, 1, 2, 3], 0.3),
        PlayerStateName::Falling => AnimationDef::looping(vec![row * 4], 1.0),
    }
}

/// The player's state family.
pub enum PlayerState {
    Idle(Idling),
    Walking(Walking),
    SwordSwinging(SwordSwinging),
    Casting(Casting),
    Dead(Dying),
    Falling(Falling),
}

impl PlayerState {
    /// A machine with every player state registered.
    pub fn machine() -> Result<StateMachine<PlayerState>, StateMachineError> {
        let mut machine = StateMachine::new("player");
        machine.add(PlayerStateName::Idle, PlayerState::Idle(Idling))?;
        machine.add(PlayerStateName::Walking, PlayerState::Walking(Walking))?;
        machine.add(PlayerStateName::SwordSwinging, PlayerState::SwordSwinging(SwordSwinging::default()))?;
        machine.add(PlayerStateName::FireFlame, PlayerState::Casting(Casting::new(AbilityKind::FireFlame)))?;
        machine.add(PlayerStateName::FrozenBlast, PlayerState::Casting(Casting::new(AbilityKind::FrozenBlast)))?;
        machine.add(PlayerStateName::Dead, PlayerState::Dead(Dying::default()))?;
        machine.add(PlayerStateName::Falling, PlayerState::Falling(Falling))?;
        Ok(machine)
    }
}

type PlayerTransition = Option<Transition<PlayerStateName, ()>>;

impl State for PlayerState {
    type Key = PlayerStateName;
    type Owner = Player;
    type Params = ();
    type Context<'c> = Stage;

    fn enter(&mut self, player: &mut Player, stage: &mut Stage, _params: Option<()>) {
        match self {
            PlayerState::Idle(_) => player.play(PlayerStateName::Idle),
            PlayerState::Walking(_) => player.play(PlayerStateName::Walking),
            PlayerState::SwordSwinging(state) => state.enter(player, stage),
            PlayerState::Casting(state) => state.enter(player, stage),
            PlayerState::Dead(state) => state.enter(player),
            PlayerState::Falling(state) => state.enter(player),
        }
    }

    fn update(&mut self, player: &mut Player, stage: &mut Stage, dt: f32) -> PlayerTransition {
        match self {
            PlayerState::Idle(state) => state.update(player, &stage.input),
            PlayerState::Walking(state) => state.update(player, stage, dt),
            PlayerState::SwordSwinging(state) => state.update(player),
            PlayerState::Casting(state) => state.update(player),
            PlayerState::Dead(state) => state.update(player),
            PlayerState::Falling(state) => state.update(player, stage, dt),
        }
    }

    fn exit(&mut self, player: &mut Player, stage: &mut Stage) {
        match self {
            PlayerState::SwordSwinging(state) => state.exit(player),
            PlayerState::Casting(state) => state.exit(player, stage),
            PlayerState::Falling(_) => player.is_falling = false,
            _ => {}
        }
    }
}

/// Swing or cast requested this tick, if allowed.
fn requested_action(player: &Player, input: &InputSnapshot) -> PlayerTransition {
    if input.is_pressed(InputAction::Attack) {
        return Some(Transition::to(PlayerStateName::SwordSwinging));
    }
    for (action, ability) in [
        (InputAction::FireFlame, AbilityKind::FireFlame),
        (InputAction::FrozenBlast, AbilityKind::FrozenBlast),
    ] {
        if input.is_pressed(action) && player.can_use(ability) {
            return Some(Transition::to(ability.state()));
        }
    }
    None
}

pub struct Idling;

impl Idling {
    fn update(&mut self, player: &mut Player, input: &InputSnapshot) -> PlayerTransition {
        requested_action(player, input).or_else(|| {
            input
                .movement()
                .map(|_| Transition::to(PlayerStateName::Walking))
        })
    }
}

pub struct Walking;

impl Walking {
    fn update(&mut self, player: &mut Player, stage: &mut Stage, dt: f32) -> PlayerTransition {
        if let Some(transition) = requested_action(player, &stage.input) {
            return Some(transition);
        }

        let Some(direction) = stage.input.movement() else {
            return Some(Transition::to(PlayerStateName::Idle));
        };

        if direction != player.body.direction {
            player.body.direction = direction;
            player.play(PlayerStateName::Walking);
        }

        let target = player.body.position + direction.unit() * player.body.speed * dt;
        if stage.map.is_valid_move(&player.body.hitbox_at(target)) {
            player.body.move_to(target);
        }
        None
    }
}

/// Grow the sprite box to the action sheet size, keeping it centered.
fn enlarge(body: &mut Body) {
    let offset = (Player::ACTION_SIZE - Player::SIZE) / 2.0;
    body.dimensions = Player::ACTION_SIZE;
    body.move_to(body.position - offset);
}

fn shrink(body: &mut Body) {
    let offset = (Player::ACTION_SIZE - Player::SIZE) / 2.0;
    body.dimensions = Player::SIZE;
    body.move_to(body.position + offset);
}

const WEAPON_DEBUG_COLOR: [f32; 4] = [1.0, 0.0, 0.0, 0.5];

/// Weapon box in front of the enlarged action sprite.
pub fn weapon_hitbox(body: &Body) -> Hitbox {
    let size = body.dimensions / 2.0;
    let position = body.position;
    let dims = body.dimensions;
    let (x, y) = match body.direction {
        Direction::Left => (position.x - size.x / 2.0 + 3.0, position.y + dims.y / 4.0),
        Direction::Right => (position.x + dims.x / 2.0 + 4.0, position.y + dims.y / 4.0),
        Direction::Up => (position.x + dims.x / 4.0, position.y - size.y / 2.0 + 5.0),
        Direction::Down => (position.x + dims.x / 4.0, position.y + dims.y / 2.0 + 3.0),
    };
    Hitbox::new(x, y, size.x, size.y)
}

/// Arms the weapon box for exactly one tick once the animation reaches its
/// midpoint. A live box holds the state open for that tick, so the region
/// gets one creature pass with it even when one step finishes the animation.
#[derive(Debug, Default)]
struct WeaponWindow {
    armed: bool,
    live: bool,
}

impl WeaponWindow {
    fn update(&mut self, player: &mut Player) {
        if self.live {
            player.weapon_hitbox = None;
            self.live = false;
        }
        if !self.armed && player.animation.is_halfway_done() {
            player.weapon_hitbox = Some(weapon_hitbox(&player.body).with_debug_color(WEAPON_DEBUG_COLOR));
            self.armed = true;
            self.live = true;
        }
    }

    fn allows_exit(&self, player: &Player) -> bool {
        player.animation.is_done() && !self.live
    }
}

#[derive(Default)]
pub struct SwordSwinging {
    weapon: WeaponWindow,
}

impl SwordSwinging {
    fn enter(&mut self, player: &mut Player, stage: &mut Stage) {
        self.weapon = WeaponWindow::default();
        enlarge(&mut player.body);
        player.play(PlayerStateName::SwordSwinging);
        stage.cue(SoundName::SwordSwing);
    }

    fn update(&mut self, player: &mut Player) -> PlayerTransition {
        self.weapon.update(player);
        self.weapon
            .allows_exit(player)
            .then(|| Transition::to(PlayerStateName::Idle))
    }

    fn exit(&mut self, player: &mut Player) {
        shrink(&mut player.body);
        player.weapon_hitbox = None;
    }
}

/// Fire Flame and Frozen Blast. The effect is spawned from the player's
/// resting box before the sprite grows.
pub struct Casting {
    ability: AbilityKind,
    effect: Option<EffectId>,
    weapon: WeaponWindow,
}

impl Casting {
    fn new(ability: AbilityKind) -> Self {
        Self {
            ability,
            effect: None,
            weapon: WeaponWindow::default(),
        }
    }

    fn enter(&mut self, player: &mut Player, stage: &mut Stage) {
        self.weapon = WeaponWindow::default();

        let (position, direction) = (player.body.position, player.body.direction);
        self.effect = Some(match self.ability {
            AbilityKind::FireFlame => {
                stage.cue(SoundName::FireFlame);
                stage
                    .effects
                    .spawn(|id| Effect::fire_flame(id, position, direction, Player::SIZE))
            }
            AbilityKind::FrozenBlast => {
                stage.cue(SoundName::FrozenBlast);
                stage
                    .effects
                    .spawn(|id| Effect::frozen_blast(id, position, direction, Player::SIZE))
            }
        });

        player.start_cooldown(self.ability);
        enlarge(&mut player.body);
        player.play(self.ability.state());
    }

    fn update(&mut self, player: &mut Player) -> PlayerTransition {
        self.weapon.update(player);
        self.weapon
            .allows_exit(player)
            .then(|| Transition::to(PlayerStateName::Idle))
    }

    fn exit(&mut self, player: &mut Player, stage: &mut Stage) {
        shrink(&mut player.body);
        player.weapon_hitbox = None;
        if let Some(effect) = self.effect.take() {
            stage.effects.release(effect);
        }
    }
}

/// Plays the death animation, then spends a life.
#[derive(Default)]
pub struct Dying {
    settled: bool,
}

impl Dying {
    fn enter(&mut self, player: &mut Player) {
        self.settled = false;
        player.weapon_hitbox = None;
        player.play(PlayerStateName::Dead);
    }

    fn update(&mut self, player: &mut Player) -> PlayerTransition {
        if self.settled || !player.animation.is_done() {
            return None;
        }
        self.settled = true;

        player.lives -= 1;
        if player.lives > 0 {
            info!("Player respawning, {} lives left", player.lives);
            player.revive();
            return Some(Transition::to(PlayerStateName::Falling));
        }

        info!("Player is out of lives");
        player.lives = Player::LIVES_EXHAUSTED;
        player.ready_for_game_over = true;
        None
    }
}

/// Drops the player in from above the arena.
pub struct Falling;

impl Falling {
    fn enter(&mut self, player: &mut Player) {
        player.is_falling = true;
        let x = player.body.position.x;
        player.body.move_to(Vec2::new(x, -player.body.dimensions.y));
        player.play(PlayerStateName::Falling);
    }

    fn update(&mut self, player: &mut Player, stage: &mut Stage, dt: f32) -> PlayerTransition {
        let ground = stage.arena.bottom() - player.body.dimensions.y - GROUND_OFFSET;
        let y = (player.body.position.y + FALL_SPEED * dt).min(ground);
        let x = player.body.position.x;
        player.body.move_to(Vec2::new(x, y));

        if y < ground {
            return None;
        }
        player.is_falling = false;
        player.body.health = player.body.total_health;
        Some(Transition::to(PlayerStateName::Idle))
    }
}
