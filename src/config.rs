//! Engine configuration
//!
//! [`EngineConfig`] replaces the process-wide settings of a classic canvas
//! engine (global debug flag, `ENV` speed/gravity, camera tuning and world
//! size) with one value that is passed explicitly to whatever needs it.
//!
//! Every field has a default, so a JSON file only needs the keys it wants to
//! override:
//!
//! ```json
//! { "debug": true, "world": { "width": 1280, "height": 720 } }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::EngineError;

/// Environment values that seed every entity's motion defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Environment {
    pub speed: f64,
    pub max_speed: f64,
    pub gravity: f64,
    /// Initial per-entity debug flag
    pub debug: bool,
}

impl Default for Environment {
    fn default() -> Self {
        Environment {
            speed: 2.0,
            max_speed: 2.0,
            gravity: 0.0,
            debug: false,
        }
    }
}

/// Size of the playable world in pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub width: f64,
    pub height: f64,
    /// Margin around the world used by culling and edge checks
    pub border_offset: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            width: 640.0,
            height: 360.0,
            border_offset: 0.0,
        }
    }
}

/// Top-level configuration for [`crate::engine::GameEngine`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Draw bounding boxes, direction lines and the world border
    pub debug: bool,
    /// Clear the whole surface at the start of every frame
    pub do_clear: bool,
    /// Uniform camera zoom
    pub scale: f64,
    pub follow_offset_x: f64,
    /// Floor for vertical camera travel while following (in unscaled units)
    pub max_follow_y: f64,
    pub world: WorldConfig,
    pub env: Environment,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            debug: false,
            do_clear: true,
            scale: 1.0,
            follow_offset_x: 0.0,
            max_follow_y: 0.0,
            world: WorldConfig::default(),
            env: Environment::default(),
        }
    }
}

impl EngineConfig {
    /// Loads a config from a JSON file, falling back to defaults for absent keys.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let content = std::fs::read_to_string(path)?;
        let config: EngineConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the invariants a running engine relies on.
    pub fn validate(&self) -> Result<(), EngineError> {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(EngineError::InvalidConfig(format!(
                "scale must be positive, got {}",
                self.scale
            )));
        }
        if self.world.width <= 0.0 || self.world.height <= 0.0 {
            return Err(EngineError::InvalidConfig(format!(
                "world must have a positive size, got {}x{}",
                self.world.width, self.world.height
            )));
        }
        if self.world.border_offset < 0.0 {
            return Err(EngineError::InvalidConfig(
                "border_offset must not be negative".to_string(),
            ));
        }
        Ok(())
    }

    /// The environment handed to new entities, carrying the global debug flag.
    pub fn environment(&self) -> Environment {
        Environment {
            debug: self.debug,
            ..self.env.clone()
        }
    }
}
