//! Velocity, heading and the random-direction changer.

use glam::DVec2;
use rand::Rng;
use std::time::Duration;

use super::Graphic;
use crate::timer::{Scheduler, TimerHandle, TimerPeriod, TimerTask};
use crate::util;

/// Bounds of each random velocity component.
pub const RANDOM_COMPONENT_RANGE: (i32, i32) = (-10, 10);

/// Random direction changes happen every 1 to 10 seconds.
pub const RANDOM_DIRECTION_PERIOD: TimerPeriod = TimerPeriod::Random {
    min: Duration::from_millis(1000),
    max: Duration::from_millis(10000),
};

impl Graphic {
    pub fn velocity(&self) -> DVec2 {
        DVec2::new(self.vx, self.vy)
    }

    pub fn center(&self) -> DVec2 {
        DVec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Sets the velocity and turns the entity to face it.
    pub fn set_vector(&mut self, vx: f64, vy: f64) {
        self.vx = vx;
        self.vy = vy;
        self.adapt_angle();
    }

    /// Heading derived from the current velocity.
    pub fn adapt_angle(&mut self) {
        self.angle = util::angle_of_vector(self.velocity());
    }

    pub fn set_rotate_to_direction_angle(&mut self) {
        self.adapt_angle();
    }

    pub fn inverse_direction(&mut self) {
        self.set_vector(-self.vx, -self.vy);
    }

    /// A vector with both components drawn from [`RANDOM_COMPONENT_RANGE`].
    pub fn random_direction<R: Rng + ?Sized>(rng: &mut R) -> DVec2 {
        let (min, max) = RANDOM_COMPONENT_RANGE;
        DVec2::new(
            util::random_int(rng, min, max) as f64,
            util::random_int(rng, min, max) as f64,
        )
    }

    pub fn change_to_random_direction<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let v = Self::random_direction(rng);
        self.set_vector(v.x, v.y);
    }

    /// Starts changing direction at random intervals. Replaces any earlier
    /// changer; returns `None` if the entity is not in a collection yet.
    pub fn set_random_direction(&mut self, scheduler: &mut Scheduler) -> Option<TimerHandle> {
        let Some(key) = self.key() else {
            log::debug!("entity {:?} is not in a collection, random direction not armed", self.id);
            return None;
        };

        if let Some(old) = self.direction_timer.take() {
            scheduler.cancel(old);
        }
        let handle = scheduler.schedule_repeating(key, TimerTask::RandomDirection, RANDOM_DIRECTION_PERIOD);
        self.direction_timer = Some(handle);
        Some(handle)
    }

    pub fn stop_random_direction(&mut self, scheduler: &mut Scheduler) {
        if let Some(handle) = self.direction_timer.take() {
            scheduler.cancel(handle);
        }
    }

    /// Remembers the current position as the one drawn last frame.
    pub fn set_last_position(&mut self) {
        self.last_x = self.x;
        self.last_y = self.y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphic::test_support::shape_at;
    use crate::object_manager::EntityKey;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use slotmap::SlotMap;
    use std::f64::consts::{FRAC_PI_4, PI};

    #[test]
    fn test_set_vector_updates_angle() {
        let mut g = shape_at(0.0, 0.0);
        g.set_vector(3.0, 3.0);
        assert_eq!(g.velocity(), DVec2::new(3.0, 3.0));
        assert_relative_eq!(g.angle, FRAC_PI_4);

        g.set_vector(-1.0, 0.0);
        assert_relative_eq!(g.angle, PI);
    }

    #[test]
    fn test_double_inverse_restores_direction() {
        let mut g = shape_at(0.0, 0.0);
        g.set_vector(2.0, -5.0);
        let angle = g.angle;
        g.inverse_direction();
        assert_eq!(g.velocity(), DVec2::new(-2.0, 5.0));
        g.inverse_direction();
        assert_eq!(g.velocity(), DVec2::new(2.0, -5.0));
        assert_relative_eq!(g.angle, angle);
    }

    #[test]
    fn test_random_direction_in_range() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut g = shape_at(0.0, 0.0);
        for _ in 0..100 {
            g.change_to_random_direction(&mut rng);
            assert!((-10.0..=10.0).contains(&g.vx));
            assert!((-10.0..=10.0).contains(&g.vy));
            assert_eq!(g.vx.fract(), 0.0);
            assert_relative_eq!(g.angle, g.vy.atan2(g.vx));
        }
    }

    #[test]
    fn test_rearming_replaces_timer() {
        let mut keys: SlotMap<EntityKey, ()> = SlotMap::with_key();
        let mut g = shape_at(0.0, 0.0);
        let mut scheduler = Scheduler::with_seed(2);
        assert_eq!(g.set_random_direction(&mut scheduler), None);

        g.set_key(keys.insert(()));
        let first = g.set_random_direction(&mut scheduler).unwrap();
        let second = g.set_random_direction(&mut scheduler).unwrap();
        assert!(!scheduler.is_active(first));
        assert!(scheduler.is_active(second));
        assert_eq!(scheduler.len(), 1);

        // nothing fires before the minimum period
        assert!(scheduler.advance(Duration::from_millis(999)).is_empty());
        let fired = scheduler.advance(Duration::from_millis(9001));
        assert!(!fired.is_empty());
        assert!(fired.iter().all(|f| f.handle == second && f.task == TimerTask::RandomDirection));

        g.stop_random_direction(&mut scheduler);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_center_and_last_position() {
        let mut g = shape_at(10.0, 20.0);
        assert_eq!(g.center(), DVec2::new(20.0, 30.0));
        g.x = 15.0;
        g.set_last_position();
        assert_eq!((g.last_x, g.last_y), (15.0, 20.0));
    }
}
