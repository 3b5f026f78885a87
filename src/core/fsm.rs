//! Generic named-state machine with enter/update/exit lifecycle.
//!
//! A machine holds one registered state object per key and exactly one
//! current key once started. States never mutate the machine directly:
//! `update` returns an optional [`Transition`] which the machine applies
//! through [`StateMachine::change`], so the outgoing state's `exit` always
//! runs before the incoming state's `enter`.
//!
//! Waiting behaviours (idle duration, attack wind-up, ...) are timers owned
//! by the state value itself and only ticked from its `update`. Exiting a
//! state therefore cancels every pending continuation of that activation,
//! and `enter` re-arms them for the next one.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use bevy::prelude::*;
use thiserror::Error;

/// Errors raised by the state machine engine. These are programming errors
/// and are propagated, never silently ignored.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateMachineError {
    /// `change` targeted a key that was never registered.
    #[error("state machine '{machine}' has no state '{state}'")]
    Unregistered { machine: &'static str, state: String },

    /// `add` was called twice for the same key.
    #[error("state machine '{machine}' already has a state '{state}'")]
    Duplicate { machine: &'static str, state: String },

    /// `update` was called before the first `change`.
    #[error("state machine '{machine}' has no current state")]
    NotStarted { machine: &'static str },
}

/// A requested change of state, returned from [`State::update`].
#[derive(Debug, Clone, PartialEq)]
pub struct Transition<K, P> {
    pub to: K,
    pub params: Option<P>,
}

impl<K, P> Transition<K, P> {
    pub fn to(key: K) -> Self {
        Self { to: key, params: None }
    }

    pub fn with(key: K, params: P) -> Self {
        Self {
            to: key,
            params: Some(params),
        }
    }
}

/// A behaviour unit bound to one owner.
///
/// `Context` carries the collaborators a state may need (arena bounds, the
/// region's effect list, input, rng); it is borrowed only for the duration
/// of one call.
pub trait State {
    type Key: Copy + Eq + Hash + fmt::Debug;
    type Owner;
    type Params;
    type Context<'c>;

    fn enter(
        &mut self,
        _owner: &mut Self::Owner,
        _ctx: &mut Self::Context<'_>,
        _params: Option<Self::Params>,
    ) {
    }

    fn update(
        &mut self,
        owner: &mut Self::Owner,
        ctx: &mut Self::Context<'_>,
        dt: f32,
    ) -> Option<Transition<Self::Key, Self::Params>>;

    fn exit(&mut self, _owner: &mut Self::Owner, _ctx: &mut Self::Context<'_>) {}
}

/// Container of named states with one current state.
pub struct StateMachine<S: State> {
    label: &'static str,
    states: HashMap<S::Key, S>,
    current: Option<S::Key>,
    activation: u64,
}

impl<S: State> Default for StateMachine<S> {
    fn default() -> Self {
        Self::new("unnamed")
    }
}

impl<S: State> fmt::Debug for StateMachine<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("label", &self.label)
            .field("states", &self.states.keys().collect::<Vec<_>>())
            .field("current", &self.current)
            .field("activation", &self.activation)
            .finish()
    }
}

impl<S: State> StateMachine<S> {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            states: HashMap::new(),
            current: None,
            activation: 0,
        }
    }

    /// Register `state` under `key`. Each key may be registered once.
    pub fn add(&mut self, key: S::Key, state: S) -> Result<(), StateMachineError> {
        if self.states.contains_key(&key) {
            return Err(StateMachineError::Duplicate {
                machine: self.label,
                state: format!("{key:?}"),
            });
        }
        self.states.insert(key, state);
        Ok(())
    }

    pub fn current(&self) -> Option<S::Key> {
        self.current
    }

    pub fn is_in(&self, key: S::Key) -> bool {
        self.current == Some(key)
    }

    pub fn is_registered(&self, key: S::Key) -> bool {
        self.states.contains_key(&key)
    }

    /// Number of `change` calls applied so far. Each one starts a new
    /// activation of the incoming state.
    pub fn activation(&self) -> u64 {
        self.activation
    }

    /// Exit the current state, then enter `key` with `params`.
    ///
    /// Changing to the current key re-enters it (exit then enter).
    pub fn change(
        &mut self,
        key: S::Key,
        owner: &mut S::Owner,
        ctx: &mut S::Context<'_>,
        params: Option<S::Params>,
    ) -> Result<(), StateMachineError> {
        if !self.is_registered(key) {
            return Err(self.unregistered(key));
        }

        if let Some(previous) = self.current {
            if let Some(state) = self.states.get_mut(&previous) {
                state.exit(owner, ctx);
            }
        }

        let Some(next) = self.states.get_mut(&key) else {
            return Err(self.unregistered(key));
        };

        debug!("{}: {:?} -> {:?}", self.label, self.current, key);
        self.current = Some(key);
        self.activation += 1;
        next.enter(owner, ctx, params);
        Ok(())
    }

    /// Delegate to the current state and apply any transition it requests.
    pub fn update(
        &mut self,
        owner: &mut S::Owner,
        ctx: &mut S::Context<'_>,
        dt: f32,
    ) -> Result<(), StateMachineError> {
        let Some(key) = self.current else {
            return Err(StateMachineError::NotStarted { machine: self.label });
        };

        let Some(state) = self.states.get_mut(&key) else {
            return Err(self.unregistered(key));
        };

        if let Some(transition) = state.update(owner, ctx, dt) {
            self.change(transition.to, owner, ctx, transition.params)?;
        }
        Ok(())
    }

    fn unregistered(&self, key: S::Key) -> StateMachineError {
        StateMachineError::Unregistered {
            machine: self.label,
            state: format!("{key:?}"),
        }
    }
}
