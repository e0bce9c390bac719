//! Cancellable repeating timers
//!
//! Sprite playback and the random-direction changer both need a callback
//! that fires on a wall-clock period, independent of how often frames are
//! drawn. The [`Scheduler`] owns every such timer. The frame loop pumps it
//! with the elapsed time via [`Scheduler::advance`] and dispatches the
//! returned [`FiredTimer`]s to the entities that own them.
//!
//! # Rules
//!
//! - A frame that spans several periods fires the timer several times
//!   (catch-up), in timestamp order across all timers.
//! - Every timer belongs to one entity; removing the entity cancels them.
//! - Random periods are re-drawn after every firing.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use slotmap::{SlotMap, new_key_type};
use std::time::Duration;

use crate::object_manager::EntityKey;

new_key_type! {
    /// Handle used to cancel a scheduled timer.
    pub struct TimerHandle;
}

/// Shortest period a timer may have; shorter requests are raised to this.
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

/// What a timer does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTask {
    /// Advance the owner's autonomous sprite playback by one tick
    AdvanceSprite,
    /// Replace the owner's velocity with a random vector
    RandomDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerPeriod {
    Fixed(Duration),
    /// Uniform in `[min, max]`, re-drawn after each firing
    Random { min: Duration, max: Duration },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiredTimer {
    pub handle: TimerHandle,
    pub owner: EntityKey,
    pub task: TimerTask,
}

#[derive(Debug)]
struct ScheduledTimer {
    owner: EntityKey,
    task: TimerTask,
    period: TimerPeriod,
    remaining: Duration,
}

pub struct Scheduler {
    timers: SlotMap<TimerHandle, ScheduledTimer>,
    rng: StdRng,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Deterministic scheduler for tests and replays.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Scheduler {
            timers: SlotMap::with_key(),
            rng,
        }
    }

    /// Random source shared by timers and the entities they drive.
    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    pub fn schedule_repeating(
        &mut self,
        owner: EntityKey,
        task: TimerTask,
        period: TimerPeriod,
    ) -> TimerHandle {
        let remaining = next_period(period, &mut self.rng);
        let handle = self.timers.insert(ScheduledTimer {
            owner,
            task,
            period,
            remaining,
        });
        log::debug!("armed {:?} timer for {:?} (first in {:?})", task, owner, remaining);
        handle
    }

    /// Stops a timer. Returns false if it was already gone.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        match self.timers.remove(handle) {
            Some(timer) => {
                log::debug!("cancelled {:?} timer for {:?}", timer.task, timer.owner);
                true
            }
            None => false,
        }
    }

    /// Stops every timer owned by `owner`, returning how many were removed.
    pub fn cancel_owner(&mut self, owner: EntityKey) -> usize {
        let before = self.timers.len();
        self.timers.retain(|_, timer| timer.owner != owner);
        before - self.timers.len()
    }

    pub fn is_active(&self, handle: TimerHandle) -> bool {
        self.timers.contains_key(handle)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Moves time forward and returns every firing in timestamp order.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<FiredTimer> {
        let mut fired: Vec<(Duration, FiredTimer)> = Vec::new();
        let rng = &mut self.rng;

        for (handle, timer) in self.timers.iter_mut() {
            let mut budget = elapsed;
            let mut offset = Duration::ZERO;

            while budget >= timer.remaining {
                budget -= timer.remaining;
                offset += timer.remaining;
                fired.push((
                    offset,
                    FiredTimer {
                        handle,
                        owner: timer.owner,
                        task: timer.task,
                    },
                ));
                timer.remaining = next_period(timer.period, rng);
            }
            timer.remaining -= budget;
        }

        // Stable: simultaneous firings keep timer order
        fired.sort_by_key(|(at, _)| *at);
        fired.into_iter().map(|(_, f)| f).collect()
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

fn next_period<R: Rng + ?Sized>(period: TimerPeriod, rng: &mut R) -> Duration {
    let raw = match period {
        TimerPeriod::Fixed(d) => d,
        TimerPeriod::Random { min, max } => {
            let (lo, hi) = (min.as_millis() as u64, max.as_millis() as u64);
            if lo >= hi {
                min
            } else {
                Duration::from_millis(rng.gen_range(lo..=hi))
            }
        }
    };
    raw.max(MIN_PERIOD)
}
