//! Sprite-frame animation
//!
//! Two ways to pick the frame cut from the sprite sheet:
//!
//! - Autonomous playback (`play_sprite`): the first draw arms a repeating
//!   timer every `frame_interval`. Each tick bumps `interval`; once it
//!   reaches `end_frame` the frame advances, wrapping back to `start_frame`
//!   after `end_frame`.
//! - State-driven: with playback off, the current state's `sprite_frame` is
//!   shown when it declares one, else `current_frame`.
//!
//! `play_frame_lock` holds the playback timer handle. An entity never owns
//! more than one playback timer.

use super::Graphic;
use crate::error::{EngineError, EngineResult};
use crate::timer::{Scheduler, TimerPeriod, TimerTask};

impl Graphic {
    /// Frame to blit this draw. Arms autonomous playback on first use.
    pub fn frame_to_draw(&mut self, scheduler: &mut Scheduler) -> u32 {
        if self.play_sprite {
            self.ensure_playback(scheduler);
            return self.current_frame;
        }

        self.state_manager
            .as_ref()
            .and_then(|sm| sm.current_state())
            .and_then(|state| state.sprite_frame)
            .unwrap_or(self.current_frame)
    }

    /// Arms the playback timer unless one is already running.
    pub fn ensure_playback(&mut self, scheduler: &mut Scheduler) {
        if let Some(handle) = self.play_frame_lock {
            if scheduler.is_active(handle) {
                return;
            }
        }

        let Some(key) = self.key() else {
            log::debug!("entity {:?} is not in a collection, playback not armed", self.id);
            return;
        };

        let period = TimerPeriod::Fixed(self.frame_interval);
        self.play_frame_lock = Some(scheduler.schedule_repeating(key, TimerTask::AdvanceSprite, period));
    }

    pub fn is_playback_armed(&self) -> bool {
        self.play_frame_lock.is_some()
    }

    /// One playback tick.
    pub fn advance_playback(&mut self) {
        self.interval += 1;
        if self.interval < self.end_frame {
            return;
        }

        if self.current_frame >= self.end_frame || self.current_frame < self.start_frame {
            self.current_frame = self.start_frame;
        } else {
            self.current_frame += 1;
        }
        self.interval = 0;
    }

    /// Restarts playback over `start..=end`.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if the range is reversed or past the last frame.
    pub fn play_frames(&mut self, start: u32, end: u32) -> EngineResult<()> {
        if start > end || end > self.frames {
            return Err(EngineError::InvalidConfig(format!(
                "frame range {}..={} is outside 0..={}",
                start, end, self.frames
            )));
        }
        self.start_frame = start;
        self.end_frame = end;
        self.current_frame = start;
        self.interval = 0;
        self.play_sprite = true;
        Ok(())
    }

    /// Stops autonomous playback and releases the timer.
    pub fn stop_sprite(&mut self, scheduler: &mut Scheduler) {
        self.play_sprite = false;
        if let Some(handle) = self.play_frame_lock.take() {
            scheduler.cancel(handle);
        }
    }
}
