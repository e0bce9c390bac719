//! Geometry and randomness helpers shared by entities and the scene.
//!
//! All random helpers take the generator explicitly so callers can seed it
//! (the scheduler owns one; tests use `StdRng::seed_from_u64`).

use glam::DVec2;
use rand::Rng;

use crate::color::Color;

/// Heading of a vector in radians, measured from the positive X axis
/// towards positive Y (screen "down"). The zero vector maps to 0.
pub fn angle_of_vector(v: DVec2) -> f64 {
    v.y.atan2(v.x)
}

/// Uniform integer in `[min, max]`, both ends inclusive.
pub fn random_int<R: Rng + ?Sized>(rng: &mut R, min: i32, max: i32) -> i32 {
    if min >= max {
        return min;
    }
    rng.gen_range(min..=max)
}

/// An opaque color with uniformly random channels.
pub fn random_color<R: Rng + ?Sized>(rng: &mut R) -> Color {
    Color::rgb(
        rng.gen_range(0..=255),
        rng.gen_range(0..=255),
        rng.gen_range(0..=255),
    )
}
