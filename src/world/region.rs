//! The region orchestrator: owns the player, creatures, effects and items
//! of one area and advances them one tick at a time.

use std::collections::BTreeMap;

use bevy::prelude::*;
use rand::rngs::StdRng;

use crate::combat::{EffectId, EffectKind, HitOutcome};
use crate::core::{Direction, Hitbox, Outcome, SoundEvent, SoundName};
use crate::enemies::{
    assign_item_keepers, spawn_creatures, Creature, CreatureContext, CreatureId, CreatureKind, CreatureRegistry,
    CreatureStateName,
};
use crate::player::{InputSnapshot, Player, PlayerConfig, PlayerProgress, PlayerStateName};

use super::data::{RegionDefinition, Season};
use super::error::ArenaError;
use super::items::{Item, ItemKind};
use super::map::TileMap;
use super::snapshot::RegionSnapshot;
use super::stage::Stage;

/// Something the region reports to the outside world.
#[derive(Debug, Clone, PartialEq)]
pub enum RegionEvent {
    CreatureDied { id: CreatureId, kind: CreatureKind },
    ItemCollected(ItemKind),
    /// Signalled once per region.
    Outcome(Outcome),
    /// The player walked into the exit area. Signalled once.
    Exit { destination: String },
}

/// An updatable, drawable entity of the region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityRef {
    Player,
    Creature(CreatureId),
}

/// What is drawn for an entry of the render queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawRef {
    Item(ItemKind),
    Effect(EffectId, EffectKind),
    Entity(EntityRef),
}

/// Which animation a drawable is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pose {
    Item,
    Effect,
    Player(PlayerStateName),
    Creature(CreatureStateName),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Drawable {
    pub entity: DrawRef,
    pub position: Vec2,
    pub dimensions: Vec2,
    pub direction: Direction,
    pub animation: Option<Pose>,
    pub frame: usize,
    /// Hurt flash or invulnerability blink.
    pub flashing: bool,
}

/// One playable area.
pub struct Region {
    name: String,
    season: Season,
    stage: Stage,
    player: Player,
    creatures: Vec<Creature>,
    items: Vec<Item>,
    exit: Option<(Hitbox, String)>,
    render_order: Vec<EntityRef>,
    rng: StdRng,
    events: Vec<RegionEvent>,
    outcome: Option<Outcome>,
    exit_signalled: bool,
}

impl Region {
    /// Build a region from its definition: terrain, creatures and their
    /// drops, placed items, then the player (carrying `progress` if given).
    pub fn new(
        definition: &RegionDefinition,
        registry: &CreatureRegistry,
        player_config: &PlayerConfig,
        progress: Option<&PlayerProgress>,
        mut rng: StdRng,
    ) -> Result<Self, ArenaError> {
        let map = TileMap::from_rows(&definition.collision, definition.tile_size)?;
        let mut stage = Stage::new(map);

        let mut creatures = spawn_creatures(&definition.creatures, registry, &stage.map, &mut rng)?;
        let drops = definition
            .drops
            .iter()
            .map(|name| ItemKind::from_name(name))
            .collect::<Result<Vec<_>, _>>()?;
        assign_item_keepers(&mut creatures, &drops, &mut rng);

        let items = definition
            .items
            .iter()
            .map(|placement| {
                let (x, y) = placement.position;
                Ok(Item::placed(ItemKind::from_name(&placement.kind)?, Vec2::new(x, y)))
            })
            .collect::<Result<Vec<_>, ArenaError>>()?;

        let (x, y) = definition.player_start;
        let mut player = Player::spawn(player_config, Vec2::new(x, y), &mut stage)?;
        if let Some(progress) = progress {
            player.restore(progress);
        }

        let view = player.view();
        let arena = stage.arena;
        for creature in creatures.iter_mut() {
            let mut ctx = CreatureContext {
                player: Some(view),
                arena,
                rng: &mut rng,
            };
            creature.start(&mut ctx)?;
        }

        info!(
            "Built region '{}' ({:?}) with {} creature(s) and {} item(s)",
            definition.name,
            definition.season,
            creatures.len(),
            items.len()
        );

        let mut region = Self {
            name: definition.name.clone(),
            season: definition.season,
            stage,
            player,
            creatures,
            items,
            exit: definition
                .exit
                .as_ref()
                .map(|exit| (exit.hitbox(), exit.destination.clone())),
            render_order: Vec::new(),
            rng,
            events: Vec::new(),
            outcome: None,
            exit_signalled: false,
        };
        region.render_order = region.sorted_render_order();
        Ok(region)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn season(&self) -> Season {
        self.season
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn creatures(&self) -> &[Creature] {
        &self.creatures
    }

    pub fn creatures_mut(&mut self) -> &mut [Creature] {
        &mut self.creatures
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn stage_mut(&mut self) -> &mut Stage {
        &mut self.stage
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn render_order(&self) -> &[EntityRef] {
        &self.render_order
    }

    /// Advance the region by `dt` seconds.
    ///
    /// Order: draw order, clean-up, creatures (movement, collisions,
    /// damage both ways), item pickup, player, effects and items, then the
    /// exit and outcome checks. Once an outcome is signalled the region is
    /// frozen.
    pub fn tick(&mut self, dt: f32, input: &InputSnapshot) -> Result<(), ArenaError> {
        if self.outcome.is_some() {
            return Ok(());
        }
        self.stage.input = input.clone();

        self.render_order = self.sorted_render_order();
        self.clean_up();
        self.update_creatures(dt)?;
        self.collect_items();

        self.player.update(&mut self.stage, dt)?;
        self.stage.effects.update(dt);
        for item in self.items.iter_mut() {
            item.update(dt);
        }
        for creature in self.creatures.iter_mut() {
            creature.tick(dt);
        }

        self.check_exit();
        self.check_outcome();
        Ok(())
    }

    /// Stable sort by render priority, then by hitbox bottom edge.
    fn sorted_render_order(&self) -> Vec<EntityRef> {
        let mut order: Vec<(EntityRef, i32, f32)> = std::iter::once((
            EntityRef::Player,
            self.player.body.render_priority,
            self.player.body.hitbox().bottom(),
        ))
        .chain(self.creatures.iter().map(|creature| {
            (
                EntityRef::Creature(creature.id),
                creature.body.render_priority,
                creature.hitbox().bottom(),
            )
        }))
        .collect();

        order.sort_by(|a, b| a.1.cmp(&b.1).then(a.2.total_cmp(&b.2)));
        order.into_iter().map(|(entity, _, _)| entity).collect()
    }

    /// Cull dead creatures, dropping what they kept, and spent effects and
    /// items.
    fn clean_up(&mut self) {
        for creature in self.creatures.iter_mut().filter(|creature| creature.is_dead()) {
            creature.body.clean_up = true;
            if let Some(item) = creature.item_kept.take() {
                debug!("{:?} dropped {:?}", creature.kind, item.kind);
                self.items.push(item);
            }
        }
        self.creatures.retain(|creature| !creature.body.clean_up);
        self.stage.effects.clean_up();
        self.items.retain(|item| !item.clean_up);
    }

    fn update_creatures(&mut self, dt: f32) -> Result<(), ArenaError> {
        let arena = self.stage.arena;

        for index in 0..self.creatures.len() {
            if self.creatures[index].is_dead() {
                continue;
            }

            let previous = self.creatures[index].body.position;
            let previous_hitbox = self.creatures[index].hitbox();
            let mut ctx = CreatureContext {
                player: Some(self.player.view()),
                arena,
                rng: &mut self.rng,
            };
            self.creatures[index].update(&mut ctx, dt)?;

            if self.is_blocked(index, &previous_hitbox) {
                let creature = &mut self.creatures[index];
                creature.body.move_to(previous);
                creature.handle_wall_collision();
            }

            self.resolve_combat(index)?;
        }
        Ok(())
    }

    /// Out of the arena, on a blocking tile (unless flying), or a walker
    /// bumping into another creature it was not already touching.
    fn is_blocked(&self, index: usize, previous_hitbox: &Hitbox) -> bool {
        let creature = &self.creatures[index];
        let hitbox = creature.hitbox();

        if !hitbox.is_within(&self.stage.arena) {
            return true;
        }
        if !creature.traits.flying && self.stage.map.overlaps_blocking(&hitbox) {
            return true;
        }

        creature.state() == Some(CreatureStateName::Walking)
            && self.creatures.iter().enumerate().any(|(other, neighbour)| {
                other != index
                    && !neighbour.is_dead()
                    && neighbour.hitbox().overlaps(&hitbox)
                    && !neighbour.hitbox().overlaps(previous_hitbox)
            })
    }

    fn resolve_combat(&mut self, index: usize) -> Result<(), ArenaError> {
        let Self {
            creatures,
            player,
            stage,
            events,
            ..
        } = self;
        let creature = &mut creatures[index];

        if let Some(damage) = creature.take_strike() {
            hurt_player(player, stage, damage)?;
        }

        let hitbox = creature.hitbox();
        let effect_hits: Vec<i32> = stage
            .effects
            .iter_mut()
            .filter(|effect| !effect.clean_up && effect.hitbox().overlaps(&hitbox))
            .filter_map(|effect| effect.strike(creature.id))
            .collect();
        for damage in effect_hits {
            let outcome = creature.on_taking_hit(damage);
            report_creature_hit(creature, outcome, stage, events);
        }

        if !creature.is_dead() && !creature.hurt.is_active() {
            if let Some(weapon) = player.weapon_hitbox {
                if weapon.overlaps(&creature.hitbox()) {
                    let outcome = creature.on_taking_hit(player.body.damage);
                    report_creature_hit(creature, outcome, stage, events);
                }
            }
        }

        if !creature.is_dead()
            && creature.traits.contact_damage
            && player.can_be_touched()
            && creature.hitbox().overlaps(&player.body.hitbox())
        {
            hurt_player(player, stage, creature.body.damage)?;
        }
        Ok(())
    }

    fn collect_items(&mut self) {
        if !self.player.is_targetable() {
            return;
        }

        let hitbox = self.player.body.hitbox();
        for item in self.items.iter_mut() {
            if item.clean_up || !item.hitbox().overlaps(&hitbox) {
                continue;
            }
            item.clean_up = true;
            info!("Player picked up {:?}", item.kind);
            self.player.collect(item.kind);
            self.stage.cue(item.kind.pickup_sound());
            self.events.push(RegionEvent::ItemCollected(item.kind));
        }
    }

    fn check_exit(&mut self) {
        let Some((area, destination)) = &self.exit else {
            return;
        };
        if self.exit_signalled || !self.player.is_targetable() {
            return;
        }

        if area.overlaps(&self.player.body.hitbox()) {
            self.exit_signalled = true;
            info!("Player left '{}' for '{}'", self.name, destination);
            self.stage.cue(SoundName::DoorEnter);
            self.events.push(RegionEvent::Exit {
                destination: destination.clone(),
            });
        }
    }

    /// Signal victory or game over. Returns the outcome only the first
    /// time it is reached.
    pub fn check_outcome(&mut self) -> Option<Outcome> {
        if self.outcome.is_some() {
            return None;
        }

        let outcome = if self.player.has_item(ItemKind::Key) {
            Outcome::Victory
        } else if self.player.is_dead() && self.player.ready_for_game_over {
            Outcome::GameOver
        } else {
            return None;
        };

        info!("Region '{}' reached {:?}", self.name, outcome);
        self.outcome = Some(outcome);
        self.events.push(RegionEvent::Outcome(outcome));
        Some(outcome)
    }

    /// Apply damage to the player from outside the creature loop.
    pub fn damage_player(&mut self, damage: i32) -> Result<HitOutcome, ArenaError> {
        hurt_player(&mut self.player, &mut self.stage, damage)
    }

    pub fn drain_events(&mut self) -> Vec<RegionEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn drain_sounds(&mut self) -> Vec<SoundEvent> {
        std::mem::take(&mut self.stage.sounds)
    }

    pub fn snapshot(&self) -> RegionSnapshot {
        let mut alive_creatures = BTreeMap::new();
        for creature in self.creatures.iter().filter(|creature| !creature.is_dead()) {
            *alive_creatures.entry(creature.kind).or_insert(0) += 1;
        }

        RegionSnapshot {
            region: self.name.clone(),
            season: self.season,
            player: self.player.progress(),
            alive_creatures,
            boss_health: self
                .creatures
                .iter()
                .find(|creature| creature.kind.is_boss() && !creature.is_dead())
                .map(|boss| boss.body.health),
        }
    }

    /// Everything to draw this frame, back to front: items, effects, then
    /// entities in render order.
    pub fn render_queue(&self) -> Vec<Drawable> {
        let items = self.items.iter().filter(|item| !item.clean_up).map(|item| Drawable {
            entity: DrawRef::Item(item.kind),
            position: item.position,
            dimensions: item.dimensions,
            direction: Direction::Down,
            animation: Some(Pose::Item),
            frame: item.animation.current_frame(),
            flashing: false,
        });

        let effects = self.stage.effects.iter().filter(|effect| !effect.clean_up).map(|effect| Drawable {
            entity: DrawRef::Effect(effect.id, effect.kind),
            position: effect.position,
            dimensions: effect.dimensions,
            direction: effect.direction,
            animation: Some(Pose::Effect),
            frame: effect.animation.current_frame(),
            flashing: false,
        });

        let entities = self.render_order.iter().filter_map(|entity| match entity {
            EntityRef::Player => Some(Drawable {
                entity: DrawRef::Entity(*entity),
                position: self.player.body.position,
                dimensions: self.player.body.dimensions,
                direction: self.player.body.direction,
                animation: self.player.state().map(Pose::Player),
                frame: self.player.animation.current_frame(),
                flashing: self.player.is_invulnerable(),
            }),
            EntityRef::Creature(id) => self
                .creatures
                .iter()
                .find(|creature| creature.id == *id && !creature.body.clean_up)
                .map(|creature| Drawable {
                    entity: DrawRef::Entity(*entity),
                    position: creature.body.position,
                    dimensions: creature.body.dimensions,
                    direction: creature.body.direction,
                    animation: creature.state().map(Pose::Creature),
                    frame: creature.animation.current_frame(),
                    flashing: creature.hurt.is_active(),
                }),
        });

        items.chain(effects).chain(entities).collect()
    }
}

fn hurt_player(player: &mut Player, stage: &mut Stage, damage: i32) -> Result<HitOutcome, ArenaError> {
    let outcome = player.on_taking_damage(damage, stage)?;
    if outcome.landed() {
        stage.cue(SoundName::PlayerHurt);
    }
    Ok(outcome)
}

/// Cue and record a hit on a creature. A kill is reported exactly once
/// since dead creatures ignore further hits.
fn report_creature_hit(creature: &Creature, outcome: HitOutcome, stage: &mut Stage, events: &mut Vec<RegionEvent>) {
    match outcome {
        HitOutcome::Hurt => {
            stage.cue(SoundName::Hit);
            stage.cue(SoundName::EnemyHurt);
        }
        HitOutcome::Killed => {
            info!("{:?} {:?} died", creature.kind, creature.id);
            stage.cue(if creature.kind.is_boss() {
                SoundName::BossDead
            } else {
                SoundName::EnemyDead
            });
            events.push(RegionEvent::CreatureDied {
                id: creature.id,
                kind: creature.kind,
            });
        }
        HitOutcome::Ignored => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::Effect;
    use crate::enemies::CreatureParams;
    use crate::world::{ItemPlacement, RegionExit};
    use rand::SeedableRng;

    fn open_rows() -> Vec<String> {
        vec![".".repeat(24); 14]
    }

    fn definition(creatures: &[(&str, usize)]) -> RegionDefinition {
        RegionDefinition {
            name: "test".to_string(),
            season: Season::Summer,
            tile_size: 16.0,
            collision: open_rows(),
            player_start: (20.0, 190.0),
            creatures: creatures.iter().map(|(kind, count)| (kind.to_string(), *count)).collect(),
            drops: Vec::new(),
            items: Vec::new(),
            exit: None,
        }
    }

    fn build(definition: &RegionDefinition, seed: u64) -> Region {
        Region::new(
            definition,
            &CreatureRegistry::default(),
            &PlayerConfig::default(),
            None,
            StdRng::seed_from_u64(seed),
        )
        .unwrap()
    }

    fn idle() -> InputSnapshot {
        InputSnapshot::default()
    }

    #[test]
    fn builtin_summer_runs() {
        let mut region = build(&RegionDefinition::summer(), 11);
        assert!(!region.creatures().is_empty());
        assert!(region.creatures().iter().all(|c| c.state() == Some(CreatureStateName::Idle)));
        assert_eq!(region.items().len(), 1);

        for _ in 0..300 {
            region.tick(1.0 / 60.0, &idle()).unwrap();
        }

        for creature in region.creatures() {
            assert!(creature.state().is_some());
            let expected = creature.body.hitbox_offset.apply(creature.body.position, creature.body.dimensions);
            assert_eq!(creature.hitbox(), expected);
            assert!(creature.hitbox().is_within(&region.stage().arena));
        }
    }

    #[test]
    fn unknown_creature_fails_region_build() {
        let result = Region::new(
            &definition(&[("griffin", 1)]),
            &CreatureRegistry::default(),
            &PlayerConfig::default(),
            None,
            StdRng::seed_from_u64(0),
        );
        assert!(matches!(result, Err(ArenaError::UnknownCreature(_))));
    }

    #[test]
    fn render_order_sorts_by_priority_then_bottom() {
        let mut region = build(&definition(&[("spider", 3), ("bat", 2), ("big_boss", 1)]), 4);
        region.tick(0.016, &idle()).unwrap();

        let keys: Vec<(i32, f32)> = region
            .render_order()
            .iter()
            .map(|entity| match entity {
                EntityRef::Player => (region.player().body.render_priority, region.player().body.hitbox().bottom()),
                EntityRef::Creature(id) => {
                    let creature = region.creatures().iter().find(|c| c.id == *id).unwrap();
                    (creature.body.render_priority, creature.hitbox().bottom())
                }
            })
            .collect();

        assert_eq!(keys.len(), region.creatures().len() + 1);
        for pair in keys.windows(2) {
            assert!(pair[0].0 < pair[1].0 || (pair[0].0 == pair[1].0 && pair[0].1 <= pair[1].1));
        }
    }

    #[test]
    fn weapon_hit_respects_hurt_flash() {
        let mut region = build(&definition(&[("big_boss", 1)]), 2);
        let boss_box = region.creatures()[0].hitbox();
        let full = region.creatures()[0].body.health;

        region.player_mut().weapon_hitbox = Some(boss_box);
        region.tick(0.016, &idle()).unwrap();
        assert_eq!(region.creatures()[0].body.health, full - 1);
        assert!(region.creatures()[0].hurt.is_active());

        region.tick(0.016, &idle()).unwrap();
        assert_eq!(region.creatures()[0].body.health, full - 1);

        let sounds = region.drain_sounds();
        assert!(sounds.contains(&SoundEvent::Play(SoundName::EnemyHurt)));
    }

    #[test]
    fn effect_damages_each_creature_once() {
        let mut region = build(&definition(&[("big_boss", 1)]), 2);
        let boss_box = region.creatures()[0].hitbox();
        let full = region.creatures()[0].body.health;

        region.stage_mut().effects.spawn(|id| {
            let mut flame = Effect::fire_flame(id, Vec2::ZERO, Direction::Right, Player::SIZE);
            flame.position = boss_box.position;
            flame
        });

        for _ in 0..3 {
            region.tick(0.016, &idle()).unwrap();
        }
        assert_eq!(region.creatures()[0].body.health, full - Effect::FIRE_FLAME_DAMAGE);
    }

    #[test]
    fn killed_creature_drops_its_item_and_is_culled() {
        let mut def = definition(&[("skeleton", 1)]);
        def.drops = vec!["crystal".to_string()];
        let mut region = build(&def, 8);
        assert_eq!(region.creatures()[0].item_to_keep, Some(ItemKind::Crystal));

        let skeleton_box = region.creatures()[0].hitbox();
        region.player_mut().weapon_hitbox = Some(skeleton_box);
        region.tick(0.016, &idle()).unwrap();
        region.player_mut().weapon_hitbox = None;
        region.creatures_mut()[0].hurt.clear();
        region.player_mut().weapon_hitbox = Some(skeleton_box);
        region.tick(0.016, &idle()).unwrap();
        region.player_mut().weapon_hitbox = None;

        let died: Vec<_> = region
            .drain_events()
            .into_iter()
            .filter(|event| matches!(event, RegionEvent::CreatureDied { .. }))
            .collect();
        assert_eq!(died.len(), 1);
        assert!(region.creatures()[0].is_dead());

        region.tick(0.016, &idle()).unwrap();
        assert!(region.creatures().is_empty());
        assert_eq!(region.items().len(), 1);
        assert_eq!(region.items()[0].kind, ItemKind::Crystal);
        assert_eq!(region.snapshot().alive_creatures.len(), 0);
    }

    #[test]
    fn picking_up_the_key_wins_once() {
        let mut def = definition(&[]);
        def.items = vec![ItemPlacement {
            kind: "key".to_string(),
            position: (16.0, 186.0),
        }];
        let mut region = build(&def, 1);

        region.tick(0.016, &idle()).unwrap();
        assert_eq!(region.outcome(), Some(Outcome::Victory));
        assert!(region.player().has_item(ItemKind::Key));

        region.tick(0.016, &idle()).unwrap();
        assert_eq!(region.check_outcome(), None);
        let outcomes = region
            .drain_events()
            .into_iter()
            .filter(|event| matches!(event, RegionEvent::Outcome(_)))
            .count();
        assert_eq!(outcomes, 1);
    }

    #[test]
    fn game_over_is_signalled_once() {
        let mut region = build(&definition(&[]), 1);
        region.player_mut().lives = 1;
        assert_eq!(region.damage_player(100).unwrap(), HitOutcome::Killed);

        for _ in 0..120 {
            region.tick(0.05, &idle()).unwrap();
        }

        assert_eq!(region.outcome(), Some(Outcome::GameOver));
        assert_eq!(region.player().lives, Player::LIVES_EXHAUSTED);
        assert_eq!(region.check_outcome(), None);
        let events = region.drain_events();
        assert_eq!(events, vec![RegionEvent::Outcome(Outcome::GameOver)]);
    }

    #[test]
    fn exit_is_signalled_once() {
        let mut def = definition(&[]);
        def.exit = Some(RegionExit {
            area: (0.0, 180.0, 48.0, 44.0),
            destination: "winter".to_string(),
        });
        let mut region = build(&def, 1);

        region.tick(0.016, &idle()).unwrap();
        region.tick(0.016, &idle()).unwrap();

        let exits: Vec<_> = region
            .drain_events()
            .into_iter()
            .filter(|event| matches!(event, RegionEvent::Exit { .. }))
            .collect();
        assert_eq!(
            exits,
            vec![RegionEvent::Exit {
                destination: "winter".to_string()
            }]
        );
    }

    #[test]
    fn carried_progress_survives_region_build() {
        let progress = PlayerProgress {
            health: 2,
            lives: 1,
            position: Vec2::ZERO,
            direction: Direction::Right,
            unlocked_abilities: vec![crate::player::AbilityKind::FrozenBlast],
            items_collected: vec![ItemKind::Crystal],
        };
        let region = Region::new(
            &definition(&[]),
            &CreatureRegistry::default(),
            &PlayerConfig::default(),
            Some(&progress),
            StdRng::seed_from_u64(0),
        )
        .unwrap();

        assert_eq!(region.player().body.health, 2);
        assert_eq!(region.player().lives, 1);
        assert!(region.player().is_unlocked(crate::player::AbilityKind::FrozenBlast));
        assert_eq!(region.player().body.position, Vec2::new(20.0, 190.0));
    }

    #[test]
    fn render_queue_lists_everything_visible() {
        let mut def = definition(&[("spider", 2)]);
        def.items = vec![ItemPlacement {
            kind: "crystal".to_string(),
            position: (300.0, 20.0),
        }];
        let region = build(&def, 3);

        let queue = region.render_queue();
        assert_eq!(queue.len(), 1 + region.creatures().len() + 1);
        assert!(matches!(queue[0].entity, DrawRef::Item(ItemKind::Crystal)));
        assert!(queue
            .iter()
            .any(|drawable| drawable.animation == Some(Pose::Player(PlayerStateName::Idle))));
    }

    fn force_state(region: &mut Region, index: usize, state: CreatureStateName, direction: Option<Direction>) {
        let view = region.player().view();
        let arena = region.stage().arena;
        let mut rng = StdRng::seed_from_u64(0);
        let mut ctx = CreatureContext {
            player: Some(view),
            arena,
            rng: &mut rng,
        };
        region.creatures_mut()[index]
            .change_state(state, &mut ctx, Some(CreatureParams { direction }))
            .unwrap();
    }

    #[test]
    fn walker_leaving_the_arena_is_pushed_back_and_turns() {
        let mut region = build(&definition(&[("spider", 1)]), 5);
        region.creatures_mut()[0].body.move_to(Vec2::new(0.1, 60.0));
        force_state(&mut region, 0, CreatureStateName::Walking, Some(Direction::Left));

        region.tick(0.016, &idle()).unwrap();

        let spider = &region.creatures()[0];
        assert_eq!(spider.body.position, Vec2::new(0.1, 60.0));
        assert_eq!(spider.body.direction, Direction::Right);
        assert_eq!(spider.state(), Some(CreatureStateName::Walking));
    }

    #[test]
    fn walker_bumping_a_blocking_tile_is_pushed_back_and_turns() {
        let mut def = definition(&[("spider", 1)]);
        def.collision[3].replace_range(10..11, "#");
        let mut region = build(&def, 5);
        region.creatures_mut()[0].body.move_to(Vec2::new(143.9, 48.0));
        force_state(&mut region, 0, CreatureStateName::Walking, Some(Direction::Right));

        region.tick(0.016, &idle()).unwrap();

        let spider = &region.creatures()[0];
        assert_eq!(spider.body.position, Vec2::new(143.9, 48.0));
        assert_eq!(spider.body.direction, Direction::Left);
        assert!(!region.stage().map.overlaps_blocking(&spider.hitbox()));
    }

    #[test]
    fn touching_a_contact_creature_hurts_the_player_once() {
        let mut region = build(&definition(&[("spider", 1)]), 6);
        let start = region.player().body.position;
        region.creatures_mut()[0].body.move_to(start);
        let full = region.player().body.health;

        region.tick(0.016, &idle()).unwrap();
        assert_eq!(region.player().body.health, full - 1);
        assert!(region.player().is_invulnerable());
        assert!(region.drain_sounds().contains(&SoundEvent::Play(SoundName::PlayerHurt)));

        region.tick(0.016, &idle()).unwrap();
        assert_eq!(region.player().body.health, full - 1);
    }

    #[test]
    fn falling_player_takes_no_contact_damage() {
        let mut region = build(&definition(&[("spider", 1)]), 6);
        let start = region.player().body.position;
        region.creatures_mut()[0].body.move_to(start);
        region.player_mut().is_falling = true;
        let full = region.player().body.health;

        region.tick(0.016, &idle()).unwrap();
        assert_eq!(region.player().body.health, full);
        assert!(!region.player().is_invulnerable());
    }

    #[test]
    fn attacking_creature_strike_reaches_the_player() {
        let mut region = build(&definition(&[("skeleton", 1)]), 7);
        // Hitbox lands at (40, 190), just right of the player.
        region.creatures_mut()[0].body.move_to(Vec2::new(16.0, 142.0));
        force_state(&mut region, 0, CreatureStateName::Attacking, None);
        assert_eq!(region.creatures()[0].body.direction, Direction::Left);
        let full = region.player().body.health;

        region.tick(0.3, &idle()).unwrap();
        assert_eq!(region.player().body.health, full - 1);
        assert_eq!(region.creatures()[0].state(), Some(CreatureStateName::Attacking));

        region.tick(0.3, &idle()).unwrap();
        assert_eq!(region.player().body.health, full - 1);
        assert_eq!(region.creatures()[0].state(), Some(CreatureStateName::Chasing));
    }
}
