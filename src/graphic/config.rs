//! Construction options for [`super::Graphic`]
//!
//! Every field is optional in serialized form (`#[serde(default)]`), so an
//! entity can be described by just the keys that differ from the defaults:
//!
//! ```json
//! { "width": 32, "height": 32, "img": { "src": "hero.png" },
//!   "play_sprite": true, "frame_interval": 80, "frames": 4,
//!   "life_bar": { "show": true, "total_lifes": 3, "lifes": 3 } }
//! ```
//!
//! Fields whose default depends on the engine environment (`speed`,
//! `gravity`, `debug`) or on other fields (`end_frame`, `life_bar.width`,
//! `bounding_box.offset_y`) are `Option`s resolved in `Graphic::new`.

use serde::{Deserialize, Serialize};

use crate::color::Color;

/// Location of the sprite sheet for an image-backed entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageConfig {
    pub src: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundingBoxConfig {
    pub offset_x: f64,
    /// Defaults to `offset_x`, shrinking the box evenly on all sides
    pub offset_y: Option<f64>,
    pub color: Color,
}

impl Default for BoundingBoxConfig {
    fn default() -> Self {
        BoundingBoxConfig {
            offset_x: 0.0,
            offset_y: None,
            color: Color::GREEN,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifeBarConfig {
    pub show: bool,
    pub total_lifes: u32,
    pub lifes: u32,
    pub offset_x: f64,
    /// Negative values place the bar above the entity
    pub offset_y: f64,
    /// Defaults to the entity width
    pub width: Option<f64>,
    pub height: f64,
}

impl Default for LifeBarConfig {
    fn default() -> Self {
        LifeBarConfig {
            show: false,
            total_lifes: 1,
            lifes: 1,
            offset_x: 0.0,
            offset_y: -10.0,
            width: None,
            height: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphicConfig {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,

    // Transform
    pub x: f64,
    pub y: f64,
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
    /// Defaults to `env.speed * 6`
    pub speed: Option<f64>,
    /// Defaults to `env.gravity`
    pub gravity: Option<f64>,
    pub acceleration: f64,
    pub max_acceleration: f64,
    pub rotate_to_direction: bool,

    // Visual
    /// Random when absent
    pub color: Option<Color>,
    pub opacity: f64,
    pub is_visible: bool,
    pub direction_line_color: Color,
    pub direction_arrow: bool,
    pub select_color: Color,
    /// Defaults to the engine's debug flag
    pub debug: Option<bool>,
    pub do_clear_last_position: bool,

    // Sprite animation
    pub img: Option<ImageConfig>,
    pub frames: u32,
    pub current_frame: u32,
    pub start_frame: u32,
    /// Defaults to `frames`
    pub end_frame: Option<u32>,
    pub play_sprite: bool,
    /// Milliseconds per playback tick
    pub frame_interval: u64,

    // Collision
    pub bounding_box: BoundingBoxConfig,
    pub is_collidable: bool,
    pub can_collide_with_same_type: bool,

    pub life_bar: LifeBarConfig,
}

impl Default for GraphicConfig {
    fn default() -> Self {
        GraphicConfig {
            id: None,
            kind: None,
            x: 0.0,
            y: 0.0,
            width: 10.0,
            height: 10.0,
            scale_x: 1.0,
            scale_y: 1.0,
            angle: 0.0,
            balance_point_x: None,
            balance_point_y: None,
            vx: 0.0,
            vy: 0.0,
            speed: None,
            gravity: None,
            acceleration: 0.04,
            max_acceleration: 2.0,
            rotate_to_direction: false,
            color: None,
            opacity: 1.0,
            is_visible: true,
            direction_line_color: Color::RED,
            direction_arrow: true,
            select_color: Color::rgb(0xD9, 0x8E, 0x1A),
            debug: None,
            do_clear_last_position: false,
            img: None,
            frames: 0,
            current_frame: 0,
            start_frame: 0,
            end_frame: None,
            play_sprite: false,
            frame_interval: 60,
            bounding_box: BoundingBoxConfig::default(),
            is_collidable: true,
            can_collide_with_same_type: false,
            life_bar: LifeBarConfig::default(),
        }
    }
}

impl GraphicConfig {
    /// Parses a config from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
