//! Creature behaviour states.

use std::time::Duration;

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::{AnimationDef, Direction, Hitbox, State, StateMachine, StateMachineError, Transition};

use super::components::Creature;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CreatureStateName {
    Idle,
    Walking,
    Chasing,
    Attacking,
}

/// Optional parameters for entering a creature state.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CreatureParams {
    /// Walking direction. Random left/right when absent.
    pub direction: Option<Direction>,
}

/// Frame lists per creature state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatureAnimations {
    pub idle: AnimationDef,
    pub walking: AnimationDef,
    /// Falls back to `walking`
    #[serde(default)]
    pub chasing: Option<AnimationDef>,
    /// Falls back to `idle`
    #[serde(default)]
    pub attacking: Option<AnimationDef>,
}

impl Default for CreatureAnimations {
    fn default() -> Self {
        Self {
            idle: AnimationDef::looping(vec![0], 1.0),
            walking: AnimationDef::looping(vec![0, 1, 2, 3], 0.2),
            chasing: None,
            attacking: None,
        }
    }
}

impl CreatureAnimations {
    pub fn get(&self, state: CreatureStateName) -> &AnimationDef {
        match state {
            CreatureStateName::Idle => &self.idle,
            CreatureStateName::Walking => &self.walking,
            CreatureStateName::Chasing => self.chasing.as_ref().unwrap_or(&self.walking),
            CreatureStateName::Attacking => self.attacking.as_ref().unwrap_or(&self.idle),
        }
    }
}

/// What a creature may know about the player.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerView {
    pub hitbox: Hitbox,
    /// False while dead or falling back in.
    pub is_targetable: bool,
}

impl PlayerView {
    pub fn center(&self) -> Vec2 {
        self.hitbox.center()
    }
}

/// Collaborators borrowed by creature states for one call.
pub struct CreatureContext<'c> {
    pub player: Option<PlayerView>,
    pub arena: Hitbox,
    pub rng: &'c mut StdRng,
}

impl CreatureContext<'_> {
    fn target(&self) -> Option<PlayerView> {
        self.player.filter(|player| player.is_targetable)
    }
}

pub const IDLE_DURATION: (f32, f32) = (2.0, 5.0);
pub const WALK_DURATION: (f32, f32) = (3.0, 6.0);
pub const CHASE_SPEED_MULTIPLIER: f32 = 1.2;
pub const ATTACK_DURATION: f32 = 0.5;
/// How far a melee swing reaches past the hitbox in the facing direction.
pub const ATTACK_REACH: f32 = 20.0;

/// The creature state family.
pub enum CreatureState {
    Idle(Idling),
    Walking(Walking),
    Chasing(Chasing),
    Attacking(Attacking),
}

impl CreatureState {
    pub fn machine() -> Result<StateMachine<CreatureState>, StateMachineError> {
        let mut machine = StateMachine::new("creature");
        machine.add(CreatureStateName::Idle, CreatureState::Idle(Idling::default()))?;
        machine.add(CreatureStateName::Walking, CreatureState::Walking(Walking::default()))?;
        machine.add(CreatureStateName::Chasing, CreatureState::Chasing(Chasing))?;
        machine.add(CreatureStateName::Attacking, CreatureState::Attacking(Attacking::default()))?;
        Ok(machine)
    }
}

type CreatureTransition = Option<Transition<CreatureStateName, CreatureParams>>;

impl State for CreatureState {
    type Key = CreatureStateName;
    type Owner = Creature;
    type Params = CreatureParams;
    type Context<'c> = CreatureContext<'c>;

    fn enter(&mut self, creature: &mut Creature, ctx: &mut CreatureContext<'_>, params: Option<CreatureParams>) {
        match self {
            CreatureState::Idle(state) => state.enter(creature, ctx),
            CreatureState::Walking(state) => state.enter(creature, ctx, params.unwrap_or_default()),
            CreatureState::Chasing(_) => creature.play(CreatureStateName::Chasing),
            CreatureState::Attacking(state) => state.enter(creature, ctx),
        }
    }

    fn update(&mut self, creature: &mut Creature, ctx: &mut CreatureContext<'_>, dt: f32) -> CreatureTransition {
        match self {
            CreatureState::Idle(state) => state.update(dt),
            CreatureState::Walking(state) => state.update(creature, ctx, dt),
            CreatureState::Chasing(state) => state.update(creature, ctx, dt),
            CreatureState::Attacking(state) => state.update(creature, ctx, dt),
        }
    }

    fn exit(&mut self, creature: &mut Creature, _ctx: &mut CreatureContext<'_>) {
        if let CreatureState::Attacking(_) = self {
            creature.attack_hitbox = None;
        }
    }
}

fn random_timer(rng: &mut StdRng, (min, max): (f32, f32)) -> Timer {
    Timer::from_seconds(rng.gen_range(min..=max), TimerMode::Once)
}

fn tick(timer: &mut Timer, dt: f32) -> bool {
    timer.tick(Duration::from_secs_f32(dt.max(0.0)));
    timer.finished()
}

/// Stands still for a random while, then walks.
#[derive(Default)]
pub struct Idling {
    timer: Timer,
}

impl Idling {
    fn enter(&mut self, creature: &mut Creature, ctx: &mut CreatureContext<'_>) {
        self.timer = random_timer(ctx.rng, IDLE_DURATION);
        creature.play(CreatureStateName::Idle);
    }

    fn update(&mut self, dt: f32) -> CreatureTransition {
        tick(&mut self.timer, dt).then(|| Transition::to(CreatureStateName::Walking))
    }
}

/// Walks along one axis for a random while. Chasers switch to Chasing when
/// the player comes close.
#[derive(Default)]
pub struct Walking {
    timer: Timer,
}

impl Walking {
    fn enter(&mut self, creature: &mut Creature, ctx: &mut CreatureContext<'_>, params: CreatureParams) {
        creature.body.direction = params.direction.unwrap_or_else(|| {
            if ctx.rng.gen_bool(0.5) {
                Direction::Left
            } else {
                Direction::Right
            }
        });
        self.timer = random_timer(ctx.rng, WALK_DURATION);
        creature.play(CreatureStateName::Walking);
    }

    fn update(&mut self, creature: &mut Creature, ctx: &mut CreatureContext<'_>, dt: f32) -> CreatureTransition {
        let step = creature.body.direction.unit() * creature.body.speed * dt;
        creature.body.translate(step);

        if creature.traits.can_chase {
            if let Some(player) = ctx.target() {
                if creature.body.distance_to(player.center()) < creature.traits.detection_radius {
                    return Some(Transition::to(CreatureStateName::Chasing));
                }
            }
        }

        tick(&mut self.timer, dt).then(|| Transition::to(CreatureStateName::Idle))
    }
}

/// Closes in on the player until in range, or gives up when it escapes.
pub struct Chasing;

impl Chasing {
    fn update(&mut self, creature: &mut Creature, ctx: &mut CreatureContext<'_>, dt: f32) -> CreatureTransition {
        let Some(player) = ctx.target() else {
            return Some(Transition::to(CreatureStateName::Idle));
        };

        let delta = player.center() - creature.body.center();
        let distance = delta.length();
        if distance > creature.traits.lose_interest_radius {
            return Some(Transition::to(CreatureStateName::Idle));
        }
        if distance <= creature.traits.attack_range {
            return Some(Transition::to(CreatureStateName::Attacking));
        }

        let speed = creature.body.speed * CHASE_SPEED_MULTIPLIER;
        creature.body.translate(delta.normalize_or_zero() * speed * dt);
        creature.body.clamp_within(&ctx.arena);

        let facing = Direction::from_horizontal(delta.x, creature.body.direction);
        if facing != creature.body.direction {
            creature.body.direction = facing;
            creature.animation.refresh();
        }
        None
    }
}

const ATTACK_DEBUG_COLOR: [f32; 4] = [1.0, 0.5, 0.0, 0.5];

/// Hitbox extended by [`ATTACK_REACH`] on the facing side.
pub fn attack_hitbox(hitbox: &Hitbox, facing: Direction) -> Hitbox {
    let mut attack = *hitbox;
    match facing {
        Direction::Left => {
            attack.position.x -= ATTACK_REACH;
            attack.dimensions.x += ATTACK_REACH;
        }
        Direction::Right => attack.dimensions.x += ATTACK_REACH,
        Direction::Up => {
            attack.position.y -= ATTACK_REACH;
            attack.dimensions.y += ATTACK_REACH;
        }
        Direction::Down => attack.dimensions.y += ATTACK_REACH,
    }
    attack
}

/// One melee swing. Damage is tested once, halfway through.
#[derive(Default)]
pub struct Attacking {
    elapsed: f32,
    has_struck: bool,
}

impl Attacking {
    fn enter(&mut self, creature: &mut Creature, ctx: &mut CreatureContext<'_>) {
        self.elapsed = 0.0;
        self.has_struck = false;

        if let Some(player) = ctx.player {
            let dx = player.center().x - creature.body.center().x;
            creature.body.direction = Direction::from_horizontal(dx, creature.body.direction);
        }
        creature.attack_hitbox =
            Some(attack_hitbox(&creature.hitbox(), creature.body.direction).with_debug_color(ATTACK_DEBUG_COLOR));
        creature.play(CreatureStateName::Attacking);
    }

    fn update(&mut self, creature: &mut Creature, ctx: &mut CreatureContext<'_>, dt: f32) -> CreatureTransition {
        self.elapsed += dt;

        if !self.has_struck && self.elapsed >= ATTACK_DURATION / 2.0 {
            self.has_struck = true;
            let swing = attack_hitbox(&creature.hitbox(), creature.body.direction);
            if let Some(player) = ctx.target() {
                if swing.overlaps(&player.hitbox) {
                    creature.queue_strike(creature.body.damage);
                }
            }
        }

        (self.elapsed >= ATTACK_DURATION).then(|| Transition::to(CreatureStateName::Chasing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enemies::{CreatureId, CreatureKind, CreatureRegistry};
    use rand::SeedableRng;

    const ARENA: Hitbox = Hitbox {
        position: Vec2::ZERO,
        dimensions: Vec2::new(384.0, 224.0),
        debug_color: None,
    };

    fn creature(kind: CreatureKind, position: Vec2) -> Creature {
        CreatureRegistry::default()
            .create_kind(kind, CreatureId(0), position)
            .unwrap()
    }

    fn player_at(center: Vec2) -> PlayerView {
        PlayerView {
            hitbox: Hitbox::new(center.x - 8.0, center.y - 8.0, 16.0, 16.0),
            is_targetable: true,
        }
    }

    #[test]
    fn idle_then_walk_within_duration_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut spider = creature(CreatureKind::Spider, Vec2::new(100.0, 100.0));
        let mut ctx = CreatureContext { player: None, arena: ARENA, rng: &mut rng };
        spider.start(&mut ctx).unwrap();

        let mut elapsed = 0.0;
        while spider.state() == Some(CreatureStateName::Idle) && elapsed < 10.0 {
            spider.update(&mut ctx, 0.1).unwrap();
            elapsed += 0.1;
        }

        assert_eq!(spider.state(), Some(CreatureStateName::Walking));
        assert!((1.9..=5.2).contains(&elapsed), "idled for {elapsed}");
    }

    #[test]
    fn walking_moves_along_its_direction() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut spider = creature(CreatureKind::Spider, Vec2::new(100.0, 100.0));
        let mut ctx = CreatureContext { player: None, arena: ARENA, rng: &mut rng };
        spider
            .change_state(
                CreatureStateName::Walking,
                &mut ctx,
                Some(CreatureParams { direction: Some(Direction::Left) }),
            )
            .unwrap();

        spider.update(&mut ctx, 1.0).unwrap();
        assert_eq!(spider.body.position, Vec2::new(100.0 - spider.body.speed, 100.0));
    }

    #[test]
    fn wall_collision_reverses_walkers_only() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut spider = creature(CreatureKind::Spider, Vec2::new(100.0, 100.0));
        let mut ctx = CreatureContext { player: None, arena: ARENA, rng: &mut rng };
        spider.start(&mut ctx).unwrap();
        spider.body.direction = Direction::Left;

        spider.handle_wall_collision();
        assert_eq!(spider.body.direction, Direction::Left);

        spider
            .change_state(
                CreatureStateName::Walking,
                &mut ctx,
                Some(CreatureParams { direction: Some(Direction::Left) }),
            )
            .unwrap();
        spider.handle_wall_collision();
        assert_eq!(spider.body.direction, Direction::Right);
    }

    #[test]
    fn walking_chaser_notices_nearby_player() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut skeleton = creature(CreatureKind::Skeleton, Vec2::new(100.0, 100.0));
        let center = skeleton.body.center();
        let mut ctx = CreatureContext {
            player: Some(player_at(center + Vec2::new(50.0, 0.0))),
            arena: ARENA,
            rng: &mut rng,
        };
        skeleton
            .change_state(CreatureStateName::Walking, &mut ctx, None)
            .unwrap();

        skeleton.update(&mut ctx, 0.016).unwrap();
        assert_eq!(skeleton.state(), Some(CreatureStateName::Chasing));
    }

    #[test]
    fn chaser_gives_up_on_distant_player() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut skeleton = creature(CreatureKind::Skeleton, Vec2::new(100.0, 60.0));
        let center = skeleton.body.center();
        let mut ctx = CreatureContext {
            player: Some(player_at(center + Vec2::new(150.0, 0.0))),
            arena: ARENA,
            rng: &mut rng,
        };
        skeleton
            .change_state(CreatureStateName::Chasing, &mut ctx, None)
            .unwrap();

        skeleton.update(&mut ctx, 0.016).unwrap();
        assert_eq!(skeleton.state(), Some(CreatureStateName::Idle));
    }

    #[test]
    fn chaser_closes_distance_and_faces_player() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut skeleton = creature(CreatureKind::Skeleton, Vec2::new(100.0, 60.0));
        skeleton.body.direction = Direction::Right;
        let center = skeleton.body.center();
        let target = center - Vec2::new(60.0, 0.0);
        let mut ctx = CreatureContext {
            player: Some(player_at(target)),
            arena: ARENA,
            rng: &mut rng,
        };
        skeleton
            .change_state(CreatureStateName::Chasing, &mut ctx, None)
            .unwrap();

        skeleton.update(&mut ctx, 0.5).unwrap();
        assert_eq!(skeleton.body.direction, Direction::Left);
        assert!(skeleton.body.center().distance(target) < 60.0);
    }

    #[test]
    fn chaser_in_range_attacks_once() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut skeleton = creature(CreatureKind::Skeleton, Vec2::new(100.0, 60.0));
        skeleton.traits.attack_range = 10.0;
        let center = skeleton.body.center();
        let mut ctx = CreatureContext {
            player: Some(player_at(center + Vec2::new(8.0, 0.0))),
            arena: ARENA,
            rng: &mut rng,
        };
        skeleton
            .change_state(CreatureStateName::Chasing, &mut ctx, None)
            .unwrap();

        skeleton.update(&mut ctx, 0.016).unwrap();
        assert_eq!(skeleton.state(), Some(CreatureStateName::Attacking));
        assert_eq!(skeleton.body.direction, Direction::Right);

        let mut strikes = 0;
        for _ in 0..10 {
            skeleton.update(&mut ctx, 0.1).unwrap();
            if skeleton.take_strike().is_some() {
                strikes += 1;
            }
            if skeleton.state() == Some(CreatureStateName::Chasing) {
                break;
            }
        }

        assert_eq!(strikes, 1);
        assert_eq!(skeleton.state(), Some(CreatureStateName::Chasing));
        assert!(skeleton.attack_hitbox.is_none());
    }

    #[test]
    fn dead_player_is_ignored() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut skeleton = creature(CreatureKind::Skeleton, Vec2::new(100.0, 60.0));
        let center = skeleton.body.center();
        let mut view = player_at(center + Vec2::new(8.0, 0.0));
        view.is_targetable = false;
        let mut ctx = CreatureContext { player: Some(view), arena: ARENA, rng: &mut rng };
        skeleton
            .change_state(CreatureStateName::Chasing, &mut ctx, None)
            .unwrap();

        skeleton.update(&mut ctx, 0.016).unwrap();
        assert_eq!(skeleton.state(), Some(CreatureStateName::Idle));
    }
}
