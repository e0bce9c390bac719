//! Camera translation, zoom and entity following
//!
//! The camera is applied as `translate(x, y)` then `scale(scale, scale)`
//! around everything the collection draws. Following recomputes the
//! translation from the target after each draw pass:
//!
//! - X: `(target.x + follow_offset_x + target.width / 2) * -scale + target.init_x`
//! - Y: `(target.y + target.height / 2) * -scale + world.center_y`, never
//!   below `max_follow_y * scale`

use glam::DVec2;

use crate::error::{EngineError, EngineResult};
use crate::graphic::Graphic;
use crate::object_manager::EntityKey;
use crate::surface::Surface;
use crate::world::World;

/// Which camera axes track the follow target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Axis {
    X,
    Y,
    #[default]
    Both,
}

impl Axis {
    fn tracks_x(self) -> bool {
        matches!(self, Axis::X | Axis::Both)
    }

    fn tracks_y(self) -> bool {
        matches!(self, Axis::Y | Axis::Both)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Follow {
    pub target: EntityKey,
    pub axis: Axis,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
    pub follow_offset_x: f64,
    /// Floor for `y`, in unscaled units
    pub max_follow_y: f64,
    follow: Option<Follow>,
}

impl Camera {
    /// A camera centered on `world` at the given zoom.
    pub fn new(world: &World, scale: f64) -> Self {
        let mut camera = Camera {
            x: 0.0,
            y: 0.0,
            scale,
            follow_offset_x: 0.0,
            max_follow_y: 0.0,
            follow: None,
        };
        camera.center_on(world);
        camera
    }

    /// Translation that keeps the world centered when zoomed.
    pub fn centered_offset(world: &World, scale: f64) -> DVec2 {
        DVec2::new(
            world.center_x() - world.center_x() * scale,
            world.center_y() - world.center_y() * scale,
        )
    }

    pub fn center_on(&mut self, world: &World) {
        let offset = Self::centered_offset(world, self.scale);
        self.x = offset.x;
        self.y = offset.y;
    }

    pub fn follow(&self) -> Option<Follow> {
        self.follow
    }

    /// Starts following `target`, or stops following and recenters when
    /// `target` is `None`.
    pub fn follow_object(&mut self, target: Option<EntityKey>, axis: Axis, world: &World) {
        self.follow = target.map(|target| Follow { target, axis });
        if self.follow.is_none() {
            self.center_on(world);
        }
    }

    /// Recomputes the translation from the followed entity.
    ///
    /// # Errors
    ///
    /// [`EngineError::NoFollowTarget`] when `target` is `None` (the followed
    /// entity is gone). The camera is left unchanged.
    pub fn translate_to_follow_object(&mut self, target: Option<&Graphic>, world: &World) -> EngineResult<()> {
        let Some(follow) = self.follow else {
            return Ok(());
        };
        let target = target.ok_or(EngineError::NoFollowTarget)?;

        if follow.axis.tracks_x() {
            self.x = (target.x + self.follow_offset_x + target.width / 2.0) * -self.scale + target.init_x;
        }

        if follow.axis.tracks_y() {
            self.y = (target.y + target.height / 2.0) * -self.scale + world.center_y();
            self.y = self.clamp_y(self.y);
        }
        Ok(())
    }

    fn clamp_y(&self, y: f64) -> f64 {
        let floor = self.max_follow_y * self.scale;
        if y <= floor { floor } else { y }
    }

    /// Pushes the camera transform onto the surface.
    pub fn apply(&self, surface: &mut dyn Surface) {
        surface.translate(self.x, self.y);
        surface.scale(self.scale, self.scale);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphic::test_support::shape_at;
    use slotmap::SlotMap;

    fn world() -> World {
        World::new(400.0, 300.0, 0.0)
    }

    fn key() -> EntityKey {
        let mut keys: SlotMap<EntityKey, ()> = SlotMap::with_key();
        keys.insert(())
    }

    #[test]
    fn test_centered_default() {
        let camera = Camera::new(&world(), 2.0);
        assert_eq!((camera.x, camera.y), (-200.0, -150.0));
        let camera = Camera::new(&world(), 1.0);
        assert_eq!((camera.x, camera.y), (0.0, 0.0));
    }

    #[test]
    fn test_follow_x_axis() {
        let world = world();
        let mut camera = Camera::new(&world, 2.0);
        camera.follow_offset_x = 5.0;
        camera.follow_object(Some(key()), Axis::X, &world);

        let mut target = shape_at(30.0, 40.0);
        target.x = 100.0;
        camera.translate_to_follow_object(Some(&target), &world).unwrap();
        // (100 + 5 + 10) * -2 + 30
        assert_eq!(camera.x, -200.0);
        assert_eq!(camera.y, -150.0);
    }

    #[test]
    fn test_follow_y_is_clamped() {
        let world = world();
        let mut camera = Camera::new(&world, 1.0);
        camera.max_follow_y = -50.0;
        camera.follow_object(Some(key()), Axis::Y, &world);

        let mut target = shape_at(0.0, 0.0);
        for y in [0.0, 100.0, 180.0, 500.0, 10_000.0] {
            target.y = y;
            camera.translate_to_follow_object(Some(&target), &world).unwrap();
            assert!(camera.y >= camera.max_follow_y * camera.scale);
        }
        assert_eq!(camera.y, -50.0);

        target.y = 0.0;
        camera.translate_to_follow_object(Some(&target), &world).unwrap();
        assert_eq!(camera.y, 140.0);
    }

    #[test]
    fn test_missing_target_leaves_camera() {
        let world = world();
        let mut camera = Camera::new(&world, 1.0);
        camera.follow_object(Some(key()), Axis::Both, &world);
        camera.x = 7.0;
        let err = camera.translate_to_follow_object(None, &world).unwrap_err();
        assert!(matches!(err, EngineError::NoFollowTarget));
        assert_eq!(camera.x, 7.0);
    }

    #[test]
    fn test_follow_none_recenters() {
        let world = world();
        let mut camera = Camera::new(&world, 2.0);
        camera.x = 1.0;
        camera.y = 1.0;
        camera.follow_object(None, Axis::Both, &world);
        assert_eq!(camera.follow(), None);
        assert_eq!((camera.x, camera.y), (-200.0, -150.0));
    }
}
