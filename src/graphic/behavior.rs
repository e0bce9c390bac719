//! Per-frame behavior dispatch
//!
//! Every entity has exactly one [`Behavior`]. The collection calls
//! [`Graphic::update`] once per frame and the behavior decides what runs:
//! nothing, the attachment follow step, or the current state's update hook.

use rand::Rng;
use std::time::Duration;

use super::{Anchor, Graphic};
use crate::error::EngineResult;
use crate::timer::{Scheduler, TimerTask};
use crate::world::World;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Behavior {
    /// No per-frame logic
    #[default]
    Default,
    /// Copy position and heading from the attachment target
    Attached,
    /// Run the state machine's current update hook
    StateDriven,
}

/// What an update hook may look at or arm while it runs.
pub struct UpdateContext<'a> {
    pub world: &'a World,
    pub scheduler: &'a mut Scheduler,
    /// Time since the previous frame
    pub elapsed: Duration,
}

impl Graphic {
    pub fn behavior(&self) -> Behavior {
        self.behavior
    }

    pub fn set_behavior(&mut self, behavior: Behavior) {
        self.behavior = behavior;
    }

    /// Runs this frame's behavior. `target` is the attachment target
    /// snapshot, `None` when not attached or the target is gone.
    pub fn update(&mut self, ctx: &mut UpdateContext<'_>, target: Option<Anchor>) {
        match self.behavior {
            Behavior::Default => {}
            Behavior::Attached => match target {
                Some(anchor) => self.update_attached(anchor),
                None if self.attached_to.is_some() => {
                    log::debug!("attachment target of {:?} is gone", self.id);
                }
                None => {}
            },
            Behavior::StateDriven => {
                let hook = self
                    .state_manager
                    .as_ref()
                    .and_then(|sm| sm.current_state())
                    .and_then(|state| state.update);
                if let Some(hook) = hook {
                    hook(self, ctx);
                }
            }
        }
    }

    /// Switches the state machine to `name` and runs its `before` hook.
    ///
    /// Entities without a state machine ignore the call.
    ///
    /// # Errors
    ///
    /// `UnknownState` from the state machine; nothing changes in that case.
    pub fn set_state(&mut self, name: &str) -> EngineResult<()> {
        let Some(manager) = self.state_manager.as_mut() else {
            log::debug!("entity {:?} has no state machine, ignoring state {}", self.id, name);
            return Ok(());
        };
        manager.change(name)?;
        let before = manager.current_state().and_then(|state| state.before);

        self.behavior = Behavior::StateDriven;
        if let Some(hook) = before {
            hook(self);
        }
        Ok(())
    }

    /// Handles one firing of a timer this entity owns.
    pub fn on_timer<R: Rng + ?Sized>(&mut self, task: TimerTask, rng: &mut R) {
        match task {
            TimerTask::AdvanceSprite => self.advance_playback(),
            TimerTask::RandomDirection => self.change_to_random_direction(rng),
        }
    }
}
