//! Entity rendering, sprite animation and camera core for a 2D game engine.
//!
//! The crate is built around three pieces:
//!
//! - [`graphic::Graphic`] - one visual game object and its draw/update contract
//! - [`object_manager::ObjectManager`] - the live entities, in draw order
//! - [`engine::GameEngine`] - the frame loop, camera and lose effect
//!
//! Drawing targets implement [`surface::Surface`]. [`surface::PixelSurface`]
//! is a software implementation that the `window` binary presents with SDL2.

pub mod collision;
pub mod color;
pub mod config;
pub mod engine;
pub mod error;
pub mod graphic;
pub mod object_manager;
pub mod state;
pub mod surface;
pub mod timer;
pub mod util;
pub mod world;

pub use color::Color;
pub use config::{EngineConfig, Environment};
pub use engine::{Axis, FrameEvent, GameEngine, Platform, RunState};
pub use error::{EngineError, EngineResult};
pub use graphic::{Graphic, GraphicConfig};
pub use object_manager::{EntityCollection, EntityKey, ObjectManager};
pub use state::{FiniteStateMachine, StateDef, StateMachine};
pub use surface::{PixelSurface, Surface};
pub use world::World;
