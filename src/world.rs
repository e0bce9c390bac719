//! World bounds
//!
//! The world is the rectangle entities live in. It answers the containment
//! question for [`crate::graphic::Graphic::is_within_board`], provides the
//! center used for camera centering, and draws its own border in debug mode.

use crate::color::Color;
use crate::config::WorldConfig;
use crate::surface::{Surface, primitives};

const BORDER_COLOR: Color = Color::rgb(0xFF, 0xBB, 0x00);

#[derive(Debug, Clone, PartialEq)]
pub struct World {
    pub width: f64,
    pub height: f64,
    pub border_offset: f64,
}

impl World {
    pub fn new(width: f64, height: f64, border_offset: f64) -> Self {
        World {
            width,
            height,
            border_offset,
        }
    }

    pub fn center_x(&self) -> f64 {
        self.width / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.height / 2.0
    }

    /// True when the rectangle lies entirely inside the border.
    pub fn position_is_within_world(&self, x: f64, y: f64, width: f64, height: f64) -> bool {
        x >= self.border_offset
            && y >= self.border_offset
            && x + width <= self.width - self.border_offset
            && y + height <= self.height - self.border_offset
    }

    /// Debug overlay: outline of the playable area.
    pub fn draw_debug(&self, surface: &mut dyn Surface) {
        primitives::draw_rectangle(
            surface,
            self.border_offset,
            self.border_offset,
            self.width - self.border_offset * 2.0,
            self.height - self.border_offset * 2.0,
            BORDER_COLOR,
        );
    }
}

impl From<&WorldConfig> for World {
    fn from(config: &WorldConfig) -> Self {
        World::new(config.width, config.height, config.border_offset)
    }
}

impl Default for World {
    fn default() -> Self {
        World::from(&WorldConfig::default())
    }
}
