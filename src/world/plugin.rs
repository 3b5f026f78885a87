//! World plugin - region data, the active region and its tick.

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::{CheckpointEvent, CheckpointReason, GameState, OutcomeEvent, SoundEvent, SoundName};
use crate::enemies::data::load_creature_definitions;
use crate::enemies::CreatureRegistry;
use crate::player::{InputSnapshot, PlayerConfig, PlayerProgress};

use super::config::ArenaConfig;
use super::data::{load_region_definitions, RegionRegistry};
use super::error::ArenaError;
use super::region::{Region, RegionEvent};
use super::snapshot::SaveSlot;

/// The region currently being played.
#[derive(Resource)]
pub struct ActiveRegion(pub Region);

/// Seeds every region built during a run.
#[derive(Resource)]
pub struct ArenaRng(pub StdRng);

impl FromWorld for ArenaRng {
    fn from_world(world: &mut World) -> Self {
        let rng = world
            .get_resource::<ArenaConfig>()
            .map(ArenaConfig::rng)
            .unwrap_or_else(StdRng::from_entropy);
        Self(rng)
    }
}

/// World plugin - loads region data, builds the active region on entering
/// `InGame`, ticks it and forwards what it reports.
pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ArenaConfig>()
            .init_resource::<RegionRegistry>()
            .init_resource::<SaveSlot>()
            .init_resource::<ArenaRng>()
            .add_systems(
                OnEnter(GameState::Loading),
                (load_region_definitions, finish_loading)
                    .chain()
                    .after(load_creature_definitions),
            )
            .add_systems(
                OnEnter(GameState::InGame),
                setup_region.run_if(not(resource_exists::<ActiveRegion>)),
            )
            .add_systems(
                Update,
                (
                    (tick_region, dispatch_region_events)
                        .chain()
                        .run_if(in_state(GameState::InGame)),
                    persist_checkpoints,
                ),
            )
            .add_systems(OnEnter(GameState::GameOver), cleanup_region)
            .add_systems(OnEnter(GameState::Victory), cleanup_region);
    }
}

fn finish_loading(mut next_state: ResMut<NextState<GameState>>) {
    next_state.set(GameState::InGame);
}

/// Build `name` with a seed drawn from the run's generator.
pub fn build_region(
    name: &str,
    progress: Option<&PlayerProgress>,
    regions: &RegionRegistry,
    creatures: &CreatureRegistry,
    player: &PlayerConfig,
    rng: &mut StdRng,
) -> Result<Region, ArenaError> {
    let definition = regions.get(name)?;
    Region::new(definition, creatures, player, progress, StdRng::seed_from_u64(rng.gen()))
}

/// Build the starting region, or resume the stored checkpoint.
#[allow(clippy::too_many_arguments)]
fn setup_region(
    mut commands: Commands,
    config: Res<ArenaConfig>,
    regions: Res<RegionRegistry>,
    creatures: Res<CreatureRegistry>,
    saves: Res<SaveSlot>,
    mut rng: ResMut<ArenaRng>,
    mut sounds: EventWriter<SoundEvent>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let resumed = if config.resume_from_save { saves.0.load() } else { None };
    let (name, progress) = match &resumed {
        Some(snapshot) => {
            info!("Resuming checkpoint in '{}'", snapshot.region);
            (snapshot.region.as_str(), Some(&snapshot.player))
        }
        None => (config.start_region.as_str(), None),
    };

    match build_region(name, progress, &regions, &creatures, &config.player, &mut rng.0) {
        Ok(region) => {
            sounds.send(SoundEvent::Play(region.season().music()));
            commands.insert_resource(ActiveRegion(region));
        }
        Err(e) => {
            error!("Failed to build region '{}': {}", name, e);
            next_state.set(GameState::GameOver);
        }
    }
}

fn tick_region(
    time: Res<Time>,
    keyboard: Option<Res<ButtonInput<KeyCode>>>,
    region: Option<ResMut<ActiveRegion>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let Some(mut region) = region else {
        return;
    };
    let input = keyboard
        .map(|keyboard| InputSnapshot::from_keyboard(&keyboard))
        .unwrap_or_default();

    if let Err(e) = region.0.tick(time.delta_secs(), &input) {
        error!("Region '{}' failed to tick: {}", region.0.name(), e);
        next_state.set(GameState::GameOver);
    }
}

/// Forward the region's cues and events, and move to the next region when
/// the player leaves through an exit.
#[allow(clippy::too_many_arguments)]
fn dispatch_region_events(
    region: Option<ResMut<ActiveRegion>>,
    config: Res<ArenaConfig>,
    regions: Res<RegionRegistry>,
    creatures: Res<CreatureRegistry>,
    mut rng: ResMut<ArenaRng>,
    mut sounds: EventWriter<SoundEvent>,
    mut checkpoints: EventWriter<CheckpointEvent>,
    mut outcomes: EventWriter<OutcomeEvent>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let Some(mut region) = region else {
        return;
    };

    for sound in region.0.drain_sounds() {
        sounds.send(sound);
    }

    let mut exit = None;
    for event in region.0.drain_events() {
        match event {
            RegionEvent::CreatureDied { id, kind } => {
                debug!("Checkpoint after {:?} {:?} died", kind, id);
                checkpoints.send(CheckpointEvent {
                    reason: CheckpointReason::CreatureDeath,
                    snapshot: region.0.snapshot(),
                });
            }
            RegionEvent::ItemCollected(kind) => debug!("Collected {:?}", kind),
            RegionEvent::Outcome(outcome) => {
                outcomes.send(OutcomeEvent(outcome));
            }
            RegionEvent::Exit { destination } => exit = Some(destination),
        }
    }

    // An outcome reached on the exit tick ends the run instead.
    let Some(destination) = exit else {
        return;
    };
    if let Some(outcome) = region.0.outcome() {
        info!("Staying in '{}' after {:?}", region.0.name(), outcome);
        return;
    }

    let progress = region.0.player().progress();
    match build_region(&destination, Some(&progress), &regions, &creatures, &config.player, &mut rng.0) {
        Ok(next) => {
            sounds.send(SoundEvent::Stop(region.0.season().music()));
            sounds.send(SoundEvent::Play(SoundName::DoorExit));
            sounds.send(SoundEvent::Play(next.season().music()));
            checkpoints.send(CheckpointEvent {
                reason: CheckpointReason::RegionTransition,
                snapshot: next.snapshot(),
            });
            info!("Entered region '{}'", next.name());
            region.0 = next;
        }
        Err(e) => {
            error!("Failed to enter region '{}': {}", destination, e);
            next_state.set(GameState::GameOver);
        }
    }
}

fn persist_checkpoints(mut checkpoints: EventReader<CheckpointEvent>, mut saves: ResMut<SaveSlot>) {
    for checkpoint in checkpoints.read() {
        match saves.0.save(&checkpoint.snapshot) {
            Ok(()) => debug!("Saved checkpoint ({:?}) in '{}'", checkpoint.reason, checkpoint.snapshot.region),
            Err(e) => warn!("Failed to save checkpoint: {}", e),
        }
    }
}

/// Drop the region once the run has ended.
fn cleanup_region(
    mut commands: Commands,
    region: Option<Res<ActiveRegion>>,
    mut sounds: EventWriter<SoundEvent>,
) {
    if let Some(region) = region {
        sounds.send(SoundEvent::Stop(region.0.season().music()));
        commands.remove_resource::<ActiveRegion>();
    }
}
