//! Life bar drawn next to an entity
//!
//! Two filled rectangles: a full-width red background and a green
//! foreground whose width is proportional to the remaining lifes.
//!
//! # Example
//!
//! ```rust
//! use canvas_engine::graphic::LifeBar;
//!
//! let mut bar = LifeBar::new(4, 40.0);
//! bar.lose_life();
//! assert_eq!(bar.green_width(), 30.0);
//! ```

use crate::color::Color;
use crate::graphic::config::LifeBarConfig;
use crate::surface::{Surface, primitives};

const BACKGROUND_COLOR: Color = Color::RED;
const LIFE_COLOR: Color = Color::GREEN;

#[derive(Debug, Clone, PartialEq)]
pub struct LifeBar {
    pub show: bool,
    total_lifes: u32,
    lifes: u32,
    /// Offset from the entity's top-left corner
    pub offset_x: f64,
    pub offset_y: f64,
    pub width: f64,
    pub height: f64,
}

impl LifeBar {
    /// A visible bar with full lifes and the stock offsets.
    pub fn new(total_lifes: u32, width: f64) -> Self {
        let defaults = LifeBarConfig::default();
        LifeBar {
            show: true,
            total_lifes: total_lifes.max(1),
            lifes: total_lifes.max(1),
            offset_x: defaults.offset_x,
            offset_y: defaults.offset_y,
            width,
            height: defaults.height,
        }
    }

    /// Builds the bar from config. `entity_width` is used when no width is set.
    ///
    /// Lifes above the total are clamped; a total of zero is raised to one.
    pub fn from_config(config: &LifeBarConfig, entity_width: f64) -> Self {
        let total_lifes = config.total_lifes.max(1);
        LifeBar {
            show: config.show,
            total_lifes,
            lifes: config.lifes.min(total_lifes),
            offset_x: config.offset_x,
            offset_y: config.offset_y,
            width: config.width.unwrap_or(entity_width),
            height: config.height,
        }
    }

    pub fn lifes(&self) -> u32 {
        self.lifes
    }

    pub fn total_lifes(&self) -> u32 {
        self.total_lifes
    }

    /// Sets the remaining lifes, clamped to `0..=total_lifes`.
    pub fn set_lifes(&mut self, lifes: u32) {
        self.lifes = lifes.min(self.total_lifes);
    }

    /// Removes one life; returns true when none are left.
    pub fn lose_life(&mut self) -> bool {
        self.lifes = self.lifes.saturating_sub(1);
        self.lifes == 0
    }

    /// Fraction of lifes remaining in `0.0..=1.0`.
    pub fn percentage(&self) -> f64 {
        self.lifes as f64 / self.total_lifes as f64
    }

    /// Width of the green foreground
    pub fn green_width(&self) -> f64 {
        let one_life_in_pixels = self.width / self.total_lifes as f64;
        one_life_in_pixels * self.lifes as f64
    }

    /// Draws the bar relative to the entity position `(x, y)`.
    pub fn draw(&self, surface: &mut dyn Surface, x: f64, y: f64) {
        let pos_x = x + self.offset_x;
        let pos_y = y + self.offset_y;

        primitives::draw_filled_rectangle(surface, pos_x, pos_y, self.width, self.height, BACKGROUND_COLOR);
        primitives::draw_filled_rectangle(surface, pos_x, pos_y, self.green_width(), self.height, LIFE_COLOR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Rect;
    use crate::surface::recording::RecordingSurface;

    #[test]
    fn test_green_width_is_proportional() {
        let mut bar = LifeBar::new(4, 20.0);
        assert_eq!(bar.green_width(), 20.0);
        bar.set_lifes(1);
        assert_eq!(bar.green_width(), 5.0);
        bar.set_lifes(0);
        assert_eq!(bar.green_width(), 0.0);
    }

    #[test]
    fn test_lifes_are_clamped() {
        let mut bar = LifeBar::new(3, 10.0);
        bar.set_lifes(10);
        assert_eq!(bar.lifes(), 3);
        assert!(!bar.lose_life());
        assert!(!bar.lose_life());
        assert!(bar.lose_life());
        assert!(bar.lose_life());
        assert_eq!(bar.lifes(), 0);
    }

    #[test]
    fn test_from_config_defaults_width_to_entity() {
        let config = LifeBarConfig {
            show: true,
            total_lifes: 0,
            lifes: 5,
            ..Default::default()
        };
        let bar = LifeBar::from_config(&config, 32.0);
        assert_eq!(bar.width, 32.0);
        assert_eq!(bar.total_lifes(), 1);
        assert_eq!(bar.lifes(), 1);
    }

    #[test]
    fn test_draw_red_then_green() {
        let mut bar = LifeBar::new(2, 10.0);
        bar.set_lifes(1);
        let mut s = RecordingSurface::new(100, 100);
        bar.draw(&mut s, 50.0, 50.0);
        assert_eq!(
            s.fills(),
            vec![
                (Rect::new(50.0, 40.0, 10.0, 5.0), Color::RED),
                (Rect::new(50.0, 40.0, 5.0, 5.0), Color::GREEN),
            ]
        );
    }
}
