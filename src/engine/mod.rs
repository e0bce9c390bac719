//! The frame loop
//!
//! [`GameEngine`] owns the surface, the entity collection, the world, the
//! timer scheduler and the camera. Each [`GameEngine::frame`] while running:
//!
//! 1. Advance the scheduler and hand fired timers to their entities
//! 2. Update pass, then collision detection
//! 3. Clear the world area when `do_clear` is on
//! 4. Save, apply the camera transform
//! 5. Draw pass in insertion order
//! 6. World border when debugging
//! 7. Recompute the camera from the follow target
//! 8. Restore
//!
//! [`GameEngine::run`] repeats this for every frame a [`Platform`] delivers
//! and presents the result.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use canvas_engine::config::EngineConfig;
//! use canvas_engine::engine::GameEngine;
//! use canvas_engine::graphic::GraphicConfig;
//! use canvas_engine::surface::PixelSurface;
//!
//! let config = EngineConfig::default();
//! let surface = PixelSurface::new(640, 360);
//! let mut engine = GameEngine::new(&config, surface).unwrap();
//! engine.add_graphic(GraphicConfig { x: 10.0, y: 10.0, ..Default::default() }).unwrap();
//! engine.start();
//! assert!(engine.frame(Duration::from_millis(16)));
//! ```

pub mod camera;
pub mod effects;

pub use camera::{Axis, Camera, Follow};

use std::time::Duration;

use crate::config::{EngineConfig, Environment};
use crate::error::EngineResult;
use crate::graphic::{DrawContext, Graphic, GraphicConfig, UpdateContext};
use crate::object_manager::{EntityCollection, EntityKey, ObjectManager};
use crate::surface::{Rect, Surface};
use crate::timer::Scheduler;
use crate::world::World;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Stopped,
    Running,
}

/// What the platform delivers when asked for the next frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameEvent {
    /// Draw a frame; the duration is the wall time since the previous one
    Frame(Duration),
    Quit,
}

/// The window or display the engine runs inside.
pub trait Platform<S: Surface> {
    /// Blocks until the next frame is due.
    fn next_frame(&mut self) -> EngineResult<FrameEvent>;

    fn present(&mut self, surface: &S) -> EngineResult<()>;
}

/// Caller hook run by [`GameEngine::lose`] or [`GameEngine::reset`].
pub type EngineHook<S, C> = fn(&mut GameEngine<S, C>);

pub struct GameEngine<S: Surface, C: EntityCollection = ObjectManager> {
    surface: S,
    objects: C,
    world: World,
    env: Environment,
    scheduler: Scheduler,
    pub camera: Camera,
    state: RunState,
    pub debug: bool,
    pub do_clear: bool,
    on_lose: Option<EngineHook<S, C>>,
    on_reset: Option<EngineHook<S, C>>,
}

impl<S: Surface> GameEngine<S, ObjectManager> {
    /// An engine with an empty [`ObjectManager`].
    ///
    /// # Errors
    ///
    /// `InvalidConfig` when the config fails validation.
    pub fn new(config: &EngineConfig, surface: S) -> EngineResult<Self> {
        Self::with_collection(config, surface, ObjectManager::new())
    }
}

impl<S: Surface, C: EntityCollection> GameEngine<S, C> {
    pub fn with_collection(config: &EngineConfig, surface: S, objects: C) -> EngineResult<Self> {
        config.validate()?;

        let world = World::from(&config.world);
        let mut camera = Camera::new(&world, config.scale);
        camera.follow_offset_x = config.follow_offset_x;
        camera.max_follow_y = config.max_follow_y;

        Ok(GameEngine {
            surface,
            objects,
            world,
            env: config.environment(),
            scheduler: Scheduler::new(),
            camera,
            state: RunState::Stopped,
            debug: config.debug,
            do_clear: config.do_clear,
            on_lose: None,
            on_reset: None,
        })
    }

    /// Replaces the scheduler, e.g. with a seeded one.
    pub fn with_scheduler(mut self, scheduler: Scheduler) -> Self {
        self.scheduler = scheduler;
        self
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn objects(&self) -> &C {
        &self.objects
    }

    pub fn objects_mut(&mut self) -> &mut C {
        &mut self.objects
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    pub fn scheduler_mut(&mut self) -> &mut Scheduler {
        &mut self.scheduler
    }

    /// Mutable access to one entity together with the scheduler, for arming
    /// timers from outside the frame loop.
    pub fn graphic_and_scheduler(&mut self, key: EntityKey) -> Option<(&mut Graphic, &mut Scheduler)> {
        let graphic = self.objects.get_mut(key)?;
        Some((graphic, &mut self.scheduler))
    }

    /// Builds an entity with this engine's environment and adds it.
    pub fn add_graphic(&mut self, config: GraphicConfig) -> EngineResult<EntityKey> {
        let graphic = Graphic::new(config, &self.env)?;
        Ok(self.objects.add(graphic))
    }

    pub fn remove_graphic(&mut self, key: EntityKey) -> Option<Graphic> {
        self.objects.remove(key, &mut self.scheduler)
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    pub fn start(&mut self) {
        log::info!("engine started");
        self.state = RunState::Running;
    }

    pub fn stop(&mut self) {
        log::info!("engine stopped");
        self.state = RunState::Stopped;
    }

    /// Stops the loop and runs the reset hook, which clears game state.
    pub fn reset(&mut self) {
        self.stop();
        if let Some(hook) = self.on_reset {
            hook(self);
        }
    }

    pub fn set_on_reset(&mut self, hook: EngineHook<S, C>) {
        self.on_reset = Some(hook);
    }

    pub fn set_on_lose(&mut self, hook: EngineHook<S, C>) {
        self.on_lose = Some(hook);
    }

    /// Starts following `target` on `axis`; `None` stops and recenters.
    pub fn follow_object(&mut self, target: Option<EntityKey>, axis: Axis) {
        self.camera.follow_object(target, axis, &self.world);
    }

    /// Recomputes the camera from the follow target. A vanished target is
    /// reported as a warning and the camera stays put.
    pub fn translate_to_follow_object(&mut self) {
        let Some(follow) = self.camera.follow() else {
            return;
        };
        let target = self.objects.get(follow.target);
        if let Err(e) = self.camera.translate_to_follow_object(target, &self.world) {
            log::warn!("{}", e);
        }
    }

    /// Grays out the surface, then runs the lose hook.
    pub fn lose(&mut self) {
        if let Err(e) = effects::surface_to_grayscale(&mut self.surface) {
            log::warn!("lose effect skipped: {}", e);
        }
        if let Some(hook) = self.on_lose {
            hook(self);
        }
    }

    /// Runs one frame. Returns false, doing nothing, when stopped.
    pub fn frame(&mut self, elapsed: Duration) -> bool {
        if !self.is_running() {
            return false;
        }

        let fired = self.scheduler.advance(elapsed);
        self.objects.dispatch_timers(&fired, &mut self.scheduler);

        let mut update_ctx = UpdateContext {
            world: &self.world,
            scheduler: &mut self.scheduler,
            elapsed,
        };
        self.objects.update_all(&mut update_ctx);
        self.objects.detect_collisions();

        if self.do_clear {
            self.surface
                .clear_rect(Rect::new(0.0, 0.0, self.world.width, self.world.height));
        }

        self.surface.save();
        self.camera.apply(&mut self.surface);

        let mut draw_ctx = DrawContext {
            surface: &mut self.surface,
            world: &self.world,
            scheduler: &mut self.scheduler,
            debug: self.debug,
        };
        self.objects.draw_all(&mut draw_ctx);

        if self.debug {
            self.world.draw_debug(&mut self.surface);
        }

        self.translate_to_follow_object();

        self.surface.restore();
        true
    }

    /// Drives frames from `platform` until the engine stops or the platform
    /// quits. Returns immediately when not started.
    ///
    /// # Errors
    ///
    /// Whatever the platform reports; the engine is stopped first.
    pub fn run<P: Platform<S>>(&mut self, platform: &mut P) -> EngineResult<()> {
        while self.is_running() {
            let event = match platform.next_frame() {
                Ok(event) => event,
                Err(e) => {
                    self.stop();
                    return Err(e);
                }
            };
            match event {
                FrameEvent::Quit => self.stop(),
                FrameEvent::Frame(elapsed) => {
                    if self.frame(elapsed) {
                        if let Err(e) = platform.present(&self.surface) {
                            self.stop();
                            return Err(e);
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::config::WorldConfig;
    use crate::error::EngineError;
    use crate::graphic::ImageConfig;
    use crate::surface::recording::{Op, RecordingSurface};
    use crate::surface::{Image, PixelSurface};
    use glam::{DAffine2, DVec2};
    use std::rc::Rc;

    fn config() -> EngineConfig {
        EngineConfig {
            scale: 2.0,
            world: WorldConfig {
                width: 200.0,
                height: 100.0,
                border_offset: 0.0,
            },
            ..Default::default()
        }
    }

    fn engine() -> GameEngine<RecordingSurface> {
        GameEngine::new(&config(), RecordingSurface::new(200, 100))
            .unwrap()
            .with_scheduler(Scheduler::with_seed(3))
    }

    fn red_box(x: f64, y: f64) -> GraphicConfig {
        GraphicConfig {
            x,
            y,
            width: 20.0,
            height: 20.0,
            color: Some(Color::RED),
            ..Default::default()
        }
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = EngineConfig {
            scale: 0.0,
            ..Default::default()
        };
        let result = GameEngine::new(&config, RecordingSurface::new(1, 1));
        assert!(matches!(result, Err(EngineError::InvalidConfig(_))));
    }

    #[test]
    fn test_stopped_engine_draws_nothing() {
        let mut engine = engine();
        engine.add_graphic(red_box(10.0, 10.0)).unwrap();
        assert!(!engine.frame(Duration::from_millis(16)));
        assert!(engine.surface().commands.is_empty());
    }

    #[test]
    fn test_frame_applies_camera_around_draw_pass() {
        let mut engine = engine();
        engine.add_graphic(red_box(10.0, 10.0)).unwrap();
        engine.start();
        assert!(engine.frame(Duration::from_millis(16)));

        let surface = engine.surface();
        assert_eq!(
            surface.commands[0].op,
            Op::ClearRect {
                rect: Rect::new(0.0, 0.0, 200.0, 100.0)
            }
        );
        // camera centered at scale 2: translate(-100, -50) then scale(2)
        let camera = DAffine2::from_translation(DVec2::new(-100.0, -50.0)) * DAffine2::from_scale(DVec2::splat(2.0));
        let fill = &surface.commands[1];
        assert_eq!(fill.op, Op::FillRect { rect: Rect::new(10.0, 10.0, 20.0, 20.0), color: Color::RED });
        assert!(fill.transform.abs_diff_eq(camera, 1e-9));
        assert_eq!(surface.depth(), 0);
        assert_eq!(surface.saves, surface.restores);
    }

    #[test]
    fn test_debug_draws_world_border() {
        let mut engine = engine();
        engine.debug = true;
        engine.start();
        engine.frame(Duration::from_millis(16));
        assert_eq!(engine.surface().strokes().len(), 1);
    }

    #[test]
    fn test_frame_follows_target() {
        let mut engine = engine();
        let hero = engine.add_graphic(red_box(10.0, 10.0)).unwrap();
        engine.follow_object(Some(hero), Axis::X);
        engine.start();
        engine.objects_mut().get_mut(hero).unwrap().x = 50.0;
        engine.frame(Duration::from_millis(16));
        // (50 + 0 + 10) * -2 + 10
        assert_eq!(engine.camera.x, -110.0);
        assert_eq!(engine.camera.y, -50.0);
    }

    #[test]
    fn test_removed_follow_target_keeps_camera() {
        let mut engine = engine();
        let hero = engine.add_graphic(red_box(10.0, 10.0)).unwrap();
        engine.follow_object(Some(hero), Axis::Both);
        engine.start();
        engine.frame(Duration::from_millis(16));
        let before = (engine.camera.x, engine.camera.y);

        engine.remove_graphic(hero);
        engine.frame(Duration::from_millis(16));
        assert_eq!((engine.camera.x, engine.camera.y), before);

        engine.follow_object(None, Axis::Both);
        assert_eq!((engine.camera.x, engine.camera.y), (-100.0, -50.0));
    }

    #[test]
    fn test_frame_pumps_sprite_timers() {
        let mut engine = engine();
        let sprite = engine
            .add_graphic(GraphicConfig {
                img: Some(ImageConfig { src: "s.png".to_string() }),
                width: 10.0,
                height: 10.0,
                frames: 3,
                end_frame: Some(2),
                play_sprite: true,
                frame_interval: 10,
                ..Default::default()
            })
            .unwrap();
        let sheet = Rc::new(Image::filled(30, 10, Color::RED));
        engine.objects_mut().get_mut(sprite).unwrap().bind_image(sheet).unwrap();
        engine.start();
        // first frame arms the timer during draw
        engine.frame(Duration::from_millis(16));
        assert!(engine.objects().get(sprite).unwrap().is_playback_armed());
        assert_eq!(engine.objects().get(sprite).unwrap().current_frame, 0);

        // 25ms spans two ticks, enough to reach end_frame once
        engine.frame(Duration::from_millis(25));
        let g = engine.objects().get(sprite).unwrap();
        assert_eq!((g.current_frame, g.interval), (1, 0));
    }

    #[test]
    fn test_lose_grays_surface_and_runs_hook() {
        fn mark(engine: &mut GameEngine<PixelSurface>) {
            engine.debug = true;
        }
        let mut engine = GameEngine::new(&config(), PixelSurface::new(4, 4)).unwrap();
        engine.surface_mut().fill_rect(Rect::new(0.0, 0.0, 4.0, 4.0), Color::rgb(0, 255, 0));
        engine.set_on_lose(mark);
        engine.lose();

        let gray = effects::luminance(0, 255, 0);
        assert_eq!(engine.surface().pixel(1, 1), Some(Color::rgb(gray, gray, gray)));
        assert!(engine.debug);
    }

    #[test]
    fn test_lose_on_restricted_surface_still_runs_hook() {
        fn mark(engine: &mut GameEngine<RecordingSurface>) {
            engine.do_clear = false;
        }
        let mut engine = engine();
        engine.surface_mut().readable = false;
        engine.set_on_lose(mark);
        engine.lose();
        assert!(engine.surface().commands.is_empty());
        assert!(!engine.do_clear);
    }

    #[test]
    fn test_reset_stops_and_runs_hook() {
        fn clear_all(engine: &mut GameEngine<RecordingSurface>) {
            let keys = engine.objects().keys();
            for key in keys {
                engine.remove_graphic(key);
            }
        }
        let mut engine = engine();
        engine.add_graphic(red_box(0.0, 0.0)).unwrap();
        engine.set_on_reset(clear_all);
        engine.start();
        engine.reset();
        assert_eq!(engine.state(), RunState::Stopped);
        assert!(engine.objects().is_empty());
    }

    struct ScriptedPlatform {
        frames: Vec<FrameEvent>,
        presented: usize,
    }

    impl Platform<RecordingSurface> for ScriptedPlatform {
        fn next_frame(&mut self) -> EngineResult<FrameEvent> {
            if self.frames.is_empty() {
                return Err(EngineError::Platform("out of frames".to_string()));
            }
            Ok(self.frames.remove(0))
        }

        fn present(&mut self, _surface: &RecordingSurface) -> EngineResult<()> {
            self.presented += 1;
            Ok(())
        }
    }

    #[test]
    fn test_run_until_quit() {
        let mut engine = engine();
        let mut platform = ScriptedPlatform {
            frames: vec![
                FrameEvent::Frame(Duration::from_millis(16)),
                FrameEvent::Frame(Duration::from_millis(16)),
                FrameEvent::Quit,
                FrameEvent::Frame(Duration::from_millis(16)),
            ],
            presented: 0,
        };

        // not started: returns at once
        engine.run(&mut platform).unwrap();
        assert_eq!(platform.presented, 0);

        engine.start();
        engine.run(&mut platform).unwrap();
        assert_eq!(platform.presented, 2);
        assert!(!engine.is_running());
        assert_eq!(platform.frames.len(), 1);
    }

    #[test]
    fn test_run_stops_on_platform_error() {
        let mut engine = engine();
        let mut platform = ScriptedPlatform {
            frames: vec![FrameEvent::Frame(Duration::from_millis(16))],
            presented: 0,
        };
        engine.start();
        assert!(engine.run(&mut platform).is_err());
        assert_eq!(platform.presented, 1);
        assert!(!engine.is_running());
    }
}
