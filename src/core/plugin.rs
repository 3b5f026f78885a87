//! Core plugin that sets up game states, events, and fundamental systems.

use bevy::prelude::*;

use super::events::*;
use super::states::*;

/// Core plugin - must be added first as other plugins depend on it.
///
/// This plugin sets up:
/// - Game states (Loading, InGame, Paused, GameOver, Victory)
/// - Global events (SoundEvent, CheckpointEvent, OutcomeEvent)
/// - Outcome screens' music and pause handling
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameState>()
            .add_event::<SoundEvent>()
            .add_event::<CheckpointEvent>()
            .add_event::<OutcomeEvent>()
            .add_systems(OnEnter(GameState::GameOver), play_gameover_music)
            .add_systems(OnExit(GameState::GameOver), stop_gameover_music)
            .add_systems(OnEnter(GameState::Victory), play_victory_music)
            .add_systems(OnExit(GameState::Victory), stop_victory_music)
            .add_systems(
                Update,
                (
                    handle_pause_input.run_if(
                        in_state(GameState::InGame).or(in_state(GameState::Paused)),
                    ),
                    apply_outcome.run_if(in_state(GameState::InGame)),
                ),
            );
    }
}

fn play_gameover_music(mut sounds: EventWriter<SoundEvent>) {
    sounds.send(SoundEvent::Play(SoundName::Gameover));
}

fn stop_gameover_music(mut sounds: EventWriter<SoundEvent>) {
    sounds.send(SoundEvent::Stop(SoundName::Gameover));
}

fn play_victory_music(mut sounds: EventWriter<SoundEvent>) {
    sounds.send(SoundEvent::Play(SoundName::Victory));
}

fn stop_victory_music(mut sounds: EventWriter<SoundEvent>) {
    sounds.send(SoundEvent::Stop(SoundName::Victory));
}

/// Handle Escape key to pause/unpause the game.
fn handle_pause_input(
    keyboard: Option<Res<ButtonInput<KeyCode>>>,
    current_state: Res<State<GameState>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let Some(keyboard) = keyboard else {
        return;
    };

    if keyboard.just_pressed(KeyCode::Escape) {
        match current_state.get() {
            GameState::InGame => next_state.set(GameState::Paused),
            GameState::Paused => next_state.set(GameState::InGame),
            _ => {}
        }
    }
}

/// Move to the outcome screen the region signalled.
fn apply_outcome(
    mut outcomes: EventReader<OutcomeEvent>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if let Some(OutcomeEvent(outcome)) = outcomes.read().last() {
        info!("Region reached outcome {:?}", outcome);
        next_state.set(match outcome {
            Outcome::Victory => GameState::Victory,
            Outcome::GameOver => GameState::GameOver,
        });
    }
}
