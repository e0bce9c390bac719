//! Finite-state machines that drive entity behavior
//!
//! An entity may carry a [`StateMachine`]. Switching state through
//! [`crate::graphic::Graphic::set_state`] makes the new state's update hook
//! the entity's per-frame behavior, runs the state's `before` hook once, and
//! lets the state pin a sprite frame while autonomous playback is off.
//!
//! [`FiniteStateMachine`] is the stock implementation: a named set of
//! [`StateDef`]s and a current state.

use std::collections::HashMap;

use crate::error::EngineError;
use crate::graphic::{Graphic, UpdateContext};

/// Per-frame behavior of an entity while it is in a given state.
pub type UpdateHook = fn(&mut Graphic, &mut UpdateContext<'_>);

/// One-shot hook run when a state is entered.
pub type EnterHook = fn(&mut Graphic);

#[derive(Debug, Clone)]
pub struct StateDef {
    pub name: String,
    /// Sprite frame shown while in this state (when playback is off)
    pub sprite_frame: Option<u32>,
    pub update: Option<UpdateHook>,
    pub before: Option<EnterHook>,
}

impl StateDef {
    pub fn new(name: impl Into<String>) -> Self {
        StateDef {
            name: name.into(),
            sprite_frame: None,
            update: None,
            before: None,
        }
    }

    pub fn with_sprite_frame(mut self, frame: u32) -> Self {
        self.sprite_frame = Some(frame);
        self
    }

    pub fn with_update(mut self, hook: UpdateHook) -> Self {
        self.update = Some(hook);
        self
    }

    pub fn with_before(mut self, hook: EnterHook) -> Self {
        self.before = Some(hook);
        self
    }
}

/// The contract an entity needs from its state machine.
pub trait StateMachine {
    /// The active state, `None` before the first transition.
    fn current_state(&self) -> Option<&StateDef>;

    /// Transitions to `name`.
    ///
    /// # Errors
    ///
    /// [`EngineError::UnknownState`] if no such state exists; the current
    /// state is left unchanged.
    fn change(&mut self, name: &str) -> Result<(), EngineError>;
}

#[derive(Debug, Clone, Default)]
pub struct FiniteStateMachine {
    states: HashMap<String, StateDef>,
    current: Option<String>,
}

impl FiniteStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_state(&mut self, state: StateDef) {
        self.states.insert(state.name.clone(), state);
    }

    /// Builder form of [`Self::add_state`].
    pub fn with_state(mut self, state: StateDef) -> Self {
        self.add_state(state);
        self
    }

    pub fn current_name(&self) -> Option<&str> {
        self.current.as_deref()
    }
}

impl StateMachine for FiniteStateMachine {
    fn current_state(&self) -> Option<&StateDef> {
        self.current.as_ref().and_then(|name| self.states.get(name))
    }

    fn change(&mut self, name: &str) -> Result<(), EngineError> {
        if !self.states.contains_key(name) {
            return Err(EngineError::UnknownState(name.to_string()));
        }
        log::debug!("state change {:?} -> {}", self.current, name);
        self.current = Some(name.to_string());
        Ok(())
    }
}
