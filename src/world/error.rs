//! Error types for arena data loading and simulation.

use thiserror::Error;

use crate::core::StateMachineError;

/// Errors raised while loading data, building a region or ticking it.
#[derive(Debug, Error)]
pub enum ArenaError {
    /// Creature factory was asked for a kind it does not know.
    #[error("Unknown creature type '{0}'")]
    UnknownCreature(String),

    /// Item name that maps to no item kind.
    #[error("Unknown item type '{0}'")]
    UnknownItem(String),

    /// Region name missing from the registry.
    #[error("Unknown region '{0}'")]
    UnknownRegion(String),

    /// A state machine was driven into an unregistered or unstarted state.
    #[error(transparent)]
    Fsm(#[from] StateMachineError),

    /// File could not be found.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// File could not be read.
    #[error("Failed to read file '{path}': {details}")]
    ReadError { path: String, details: String },

    /// RON parsing failed.
    #[error("Parse error in '{path}': {details}")]
    ParseError { path: String, details: String },

    /// Collision grid rows of uneven length.
    #[error("Grid mismatch: expected row width {expected_width}, row {row} has {actual_width}")]
    GridMismatch {
        expected_width: usize,
        actual_width: usize,
        row: usize,
    },

    /// Collision grid character that is neither blocking nor open.
    #[error("Unknown tile '{character}' at position ({x}, {y})")]
    UnknownTile { character: char, x: usize, y: usize },
}
