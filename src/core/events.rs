//! Global events used for cross-system communication.
//!
//! The region simulation is plain data; the world plugin drains what it
//! produced each tick and forwards it as these events so audio, persistence
//! and flow control stay decoupled from gameplay.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::world::RegionSnapshot;

/// Sound and music identifiers understood by the audio backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundName {
    // Music
    Summer,
    Winter,
    Victory,
    Gameover,

    // Effects
    DoorEnter,
    DoorExit,
    BossDead,
    KeyPickup,
    ItemPickup,
    EnemyDead,
    EnemyHurt,
    Hit,
    PlayerHurt,
    SwordSwing,
    FireFlame,
    FrozenBlast,
}

/// Fire-and-forget audio command. Nothing in the simulation waits on it.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEvent {
    Play(SoundName),
    Stop(SoundName),
}

/// Why a checkpoint snapshot was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckpointReason {
    CreatureDeath,
    RegionTransition,
}

/// Sent when the simulation reaches a save checkpoint.
#[derive(Event, Debug, Clone)]
pub struct CheckpointEvent {
    pub reason: CheckpointReason,
    pub snapshot: RegionSnapshot,
}

/// Terminal result of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Victory,
    GameOver,
}

/// Sent exactly once when the active region reaches an outcome.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutcomeEvent(pub Outcome);
