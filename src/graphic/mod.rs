//! The visual game object
//!
//! A [`Graphic`] holds everything the engine knows about one entity:
//! transform, motion, look, sprite animation, collision box, life bar and
//! behavioral binding (state machine or attachment). Its surface is split
//! across submodules by concern:
//!
//! - `draw` - the per-frame draw contract and debug overlays
//! - `animation` - autonomous sprite playback and state-driven frames
//! - `motion` - velocity, heading and the random-direction changer
//! - `attachment` - following another entity with a fixed offset
//! - `behavior` - the single update entry point and state switching
//! - `bounds` - world-edge predicates and the bounding box
//!
//! # Lifecycle
//!
//! Built from a [`GraphicConfig`] by [`Graphic::new`], inserted into an
//! [`crate::object_manager::EntityCollection`] (which assigns its key),
//! updated and drawn every frame, and dropped when removed from the
//! collection. Removal cancels the entity's timers.

pub mod animation;
pub mod attachment;
pub mod behavior;
pub mod bounds;
pub mod config;
pub mod draw;
pub mod life_bar;
pub mod motion;

pub use attachment::{Anchor, Attachment};
pub use behavior::{Behavior, UpdateContext};
pub use config::{BoundingBoxConfig, GraphicConfig, ImageConfig, LifeBarConfig};
pub use draw::DrawContext;
pub use life_bar::LifeBar;

use std::rc::Rc;
use std::time::Duration;

use crate::color::Color;
use crate::config::Environment;
use crate::error::{EngineError, EngineResult};
use crate::object_manager::EntityKey;
use crate::state::StateMachine;
use crate::surface::Image;
use crate::timer::TimerHandle;
use crate::util;

/// Speed multiplier applied to `env.speed` for the default entity speed.
pub const SPEED_MULTIPLIER: f64 = 6.0;

/// Response to a detected collision with another entity.
pub type CollisionHook = fn(&mut Graphic, &Graphic);

/// How an entity is drawn, fixed at construction.
#[derive(Debug, Clone)]
pub enum Renderable {
    /// Flat rectangle filled with the entity color
    Shape,
    /// A frame cut from a horizontal sprite sheet
    Sprite {
        source: String,
        image: Option<Rc<Image>>,
    },
}

/// Collision box, shrunk from the entity size by its offsets.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundingBox {
    pub offset_x: f64,
    pub offset_y: f64,
    pub color: Color,
}

pub struct Graphic {
    pub id: Option<String>,
    pub kind: Option<String>,
    key: Option<EntityKey>,

    // Transform
    pub x: f64,
    pub y: f64,
    pub last_x: f64,
    pub last_y: f64,
    pub width: f64,
    pub height: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub angle: f64,
    pub balance_point_x: Option<f64>,
    pub balance_point_y: Option<f64>,

    // Motion
    pub vx: f64,
    pub vy: f64,
    pub speed: f64,
    pub gravity: f64,
    pub acceleration: f64,
    pub max_acceleration: f64,
    pub rotate_to_direction: bool,

    // Visual
    pub color: Color,
    pub opacity: f64,
    pub is_visible: bool,
    pub is_selected: bool,
    pub direction_line_color: Color,
    pub direction_arrow: bool,
    pub select_color: Color,
    pub debug: bool,
    pub do_clear_last_position: bool,

    // Sprite animation
    renderable: Renderable,
    pub frames: u32,
    pub current_frame: u32,
    pub start_frame: u32,
    pub end_frame: u32,
    pub play_sprite: bool,
    pub interval: u32,
    pub frame_interval: Duration,
    play_frame_lock: Option<TimerHandle>,

    // Collision
    pub bounding_box: BoundingBox,
    pub is_collidable: bool,
    pub can_collide_with_same_type: bool,
    on_collision: Option<CollisionHook>,

    pub life_bar: LifeBar,

    // Behavioral binding
    state_manager: Option<Box<dyn StateMachine>>,
    attached_to: Option<Attachment>,
    behavior: Behavior,
    direction_timer: Option<TimerHandle>,

    // Initial snapshot
    pub init_x: f64,
    pub init_y: f64,
    pub init_speed: f64,
}

impl Graphic {
    /// Builds an entity from config, filling environment-dependent defaults.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidConfig`] when the config breaks an invariant:
    /// non-positive size, opacity outside `0..=1`, frame indices outside
    /// `start_frame <= end_frame <= frames`, or a zero frame interval.
    pub fn new(config: GraphicConfig, env: &Environment) -> EngineResult<Self> {
        validate(&config)?;

        let renderable = match config.img {
            Some(img) => Renderable::Sprite {
                source: img.src,
                image: None,
            },
            None => Renderable::Shape,
        };
        let color = config
            .color
            .unwrap_or_else(|| util::random_color(&mut rand::thread_rng()));
        let speed = config.speed.unwrap_or(env.speed * SPEED_MULTIPLIER);
        let end_frame = config.end_frame.unwrap_or(config.frames);

        Ok(Graphic {
            id: config.id,
            kind: config.kind,
            key: None,
            x: config.x,
            y: config.y,
            last_x: config.x,
            last_y: config.y,
            width: config.width,
            height: config.height,
            scale_x: config.scale_x,
            scale_y: config.scale_y,
            angle: config.angle,
            balance_point_x: config.balance_point_x,
            balance_point_y: config.balance_point_y,
            vx: config.vx,
            vy: config.vy,
            speed,
            gravity: config.gravity.unwrap_or(env.gravity),
            acceleration: config.acceleration,
            max_acceleration: config.max_acceleration,
            rotate_to_direction: config.rotate_to_direction,
            color,
            opacity: config.opacity,
            is_visible: config.is_visible,
            is_selected: false,
            direction_line_color: config.direction_line_color,
            direction_arrow: config.direction_arrow,
            select_color: config.select_color,
            debug: config.debug.unwrap_or(env.debug),
            do_clear_last_position: config.do_clear_last_position,
            renderable,
            frames: config.frames,
            current_frame: config.current_frame,
            start_frame: config.start_frame,
            end_frame,
            play_sprite: config.play_sprite,
            interval: 0,
            frame_interval: Duration::from_millis(config.frame_interval),
            play_frame_lock: None,
            bounding_box: BoundingBox {
                offset_x: config.bounding_box.offset_x,
                offset_y: config
                    .bounding_box
                    .offset_y
                    .unwrap_or(config.bounding_box.offset_x),
                color: config.bounding_box.color,
            },
            is_collidable: config.is_collidable,
            can_collide_with_same_type: config.can_collide_with_same_type,
            on_collision: None,
            life_bar: LifeBar::from_config(&config.life_bar, config.width),
            state_manager: None,
            attached_to: None,
            behavior: Behavior::Default,
            direction_timer: None,
            init_x: config.x,
            init_y: config.y,
            init_speed: speed,
        })
    }

    /// Key assigned by the owning collection, `None` until inserted.
    pub fn key(&self) -> Option<EntityKey> {
        self.key
    }

    pub(crate) fn set_key(&mut self, key: EntityKey) {
        self.key = Some(key);
    }

    pub fn renderable(&self) -> &Renderable {
        &self.renderable
    }

    /// Path of the sprite sheet, `None` for shapes.
    pub fn image_source(&self) -> Option<&str> {
        match &self.renderable {
            Renderable::Sprite { source, .. } => Some(source),
            Renderable::Shape => None,
        }
    }

    /// Binds the loaded sprite sheet. Marks the entity as loaded.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` for shape entities, which never draw images.
    pub fn bind_image(&mut self, loaded: Rc<Image>) -> EngineResult<()> {
        match &mut self.renderable {
            Renderable::Sprite { image, .. } => {
                *image = Some(loaded);
                Ok(())
            }
            Renderable::Shape => Err(EngineError::InvalidConfig(format!(
                "entity {:?} was built as a shape and cannot take an image",
                self.id
            ))),
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(&self.renderable, Renderable::Sprite { image: Some(_), .. })
    }

    pub fn set_state_manager(&mut self, manager: Box<dyn StateMachine>) {
        self.state_manager = Some(manager);
    }

    pub fn state_manager(&self) -> Option<&dyn StateMachine> {
        self.state_manager.as_deref()
    }

    pub fn set_collision_hook(&mut self, hook: CollisionHook) {
        self.on_collision = Some(hook);
    }

    /// Called for every detected collision; does nothing unless a hook is set.
    pub fn has_collided_with(&mut self, other: &Graphic) {
        if let Some(hook) = self.on_collision {
            hook(self, other);
        }
    }

    pub fn select(&mut self) {
        self.is_selected = true;
    }

    pub fn deselect(&mut self) {
        self.is_selected = false;
    }

    /// Timer handles currently owned by this entity.
    pub fn timers(&self) -> impl Iterator<Item = TimerHandle> + '_ {
        self.play_frame_lock.iter().chain(self.direction_timer.iter()).copied()
    }

    /// Stops every timer this entity armed.
    pub fn cancel_timers(&mut self, scheduler: &mut crate::timer::Scheduler) {
        if let Some(handle) = self.play_frame_lock.take() {
            scheduler.cancel(handle);
        }
        if let Some(handle) = self.direction_timer.take() {
            scheduler.cancel(handle);
        }
    }
}

impl std::fmt::Debug for Graphic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Graphic")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("key", &self.key)
            .field("x", &self.x)
            .field("y", &self.y)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("angle", &self.angle)
            .field("renderable", &self.renderable)
            .field("current_frame", &self.current_frame)
            .field("behavior", &self.behavior)
            .field("attached_to", &self.attached_to)
            .finish_non_exhaustive()
    }
}

fn validate(config: &GraphicConfig) -> EngineResult<()> {
    let invalid = |msg: String| Err(EngineError::InvalidConfig(msg));

    if !(config.width.is_finite() && config.width > 0.0 && config.height.is_finite() && config.height > 0.0) {
        return invalid(format!(
            "width and height must be positive, got {}x{}",
            config.width, config.height
        ));
    }
    if !(0.0..=1.0).contains(&config.opacity) {
        return invalid(format!("opacity must be within 0..=1, got {}", config.opacity));
    }
    let end_frame = config.end_frame.unwrap_or(config.frames);
    if config.start_frame > end_frame || end_frame > config.frames {
        return invalid(format!(
            "frames must satisfy start <= end <= frames, got {} <= {} <= {}",
            config.start_frame, end_frame, config.frames
        ));
    }
    if config.current_frame > config.frames {
        return invalid(format!(
            "current_frame {} exceeds frames {}",
            config.current_frame, config.frames
        ));
    }
    if config.frame_interval == 0 {
        return invalid("frame_interval must be at least 1ms".to_string());
    }
    if config.bounding_box.offset_x < 0.0 || config.bounding_box.offset_y.is_some_and(|o| o < 0.0) {
        return invalid("bounding box offsets must not be negative".to_string());
    }
    Ok(())
}
