//! Drawing surfaces
//!
//! Everything the engine draws goes through the [`Surface`] trait: a 2D
//! target with a save/restore-able affine transform, a global alpha, filled
//! and stroked rectangles, lines, polygons, image blits with a source
//! rectangle and pixel read-back.
//!
//! - [`PixelSurface`] - software RGBA surface used by the demo binary and tests
//! - [`primitives`] - the rectangle/line helpers entities use for overlays
//!
//! # Transform scoping
//!
//! Transform and alpha state are only ever changed between a `save()` and
//! the matching `restore()`. The entity draw pass relies on this so that one
//! entity's rotation never leaks into the next.

pub mod image;
pub mod pixel;
pub mod primitives;
#[cfg(test)]
pub(crate) mod recording;
pub mod transform;

pub use image::Image;
pub use pixel::PixelSurface;
pub use transform::TransformStack;

use glam::{DAffine2, DVec2};

use crate::color::Color;
use crate::error::EngineError;

/// Axis-aligned rectangle in user (pre-transform) space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Same rectangle with non-negative width and height.
    pub fn normalized(&self) -> Rect {
        let (x, width) = if self.width < 0.0 {
            (self.x + self.width, -self.width)
        } else {
            (self.x, self.width)
        };
        let (y, height) = if self.height < 0.0 {
            (self.y + self.height, -self.height)
        } else {
            (self.y, self.height)
        };
        Rect::new(x, y, width, height)
    }

    /// Half-open containment: left/top edges inside, right/bottom outside.
    pub fn contains(&self, p: DVec2) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }

    pub fn corners(&self) -> [DVec2; 4] {
        [
            DVec2::new(self.x, self.y),
            DVec2::new(self.right(), self.y),
            DVec2::new(self.right(), self.bottom()),
            DVec2::new(self.x, self.bottom()),
        ]
    }
}

/// A 2D drawing target with canvas-like semantics.
///
/// Drawing operations are expressed in user space and mapped through the
/// current transform. Pixel read/write (`get_image_data`/`put_image_data`)
/// ignore the transform and address device pixels directly.
pub trait Surface {
    /// Width in device pixels
    fn width(&self) -> u32;

    /// Height in device pixels
    fn height(&self) -> u32;

    /// Pushes the current transform and alpha.
    fn save(&mut self);

    /// Pops the last saved transform and alpha. Unbalanced calls are ignored.
    fn restore(&mut self);

    fn translate(&mut self, dx: f64, dy: f64);

    fn rotate(&mut self, angle: f64);

    fn scale(&mut self, sx: f64, sy: f64);

    fn set_global_alpha(&mut self, alpha: f64);

    fn global_alpha(&self) -> f64;

    /// Current user-to-device transform.
    fn transform(&self) -> DAffine2;

    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Strokes the outline of `rect`, centered on its edges.
    fn stroke_rect(&mut self, rect: Rect, color: Color, line_width: f64);

    /// Resets the covered pixels to fully transparent.
    fn clear_rect(&mut self, rect: Rect);

    fn draw_line(&mut self, from: DVec2, to: DVec2, color: Color, line_width: f64);

    /// Fills a closed polygon (even-odd rule).
    fn fill_polygon(&mut self, points: &[DVec2], color: Color);

    /// Copies the `src` region of `image` onto `dest`, scaling as needed.
    fn draw_image(&mut self, image: &Image, src: Rect, dest: Rect);

    /// Reads back every device pixel.
    ///
    /// # Errors
    ///
    /// [`EngineError::SurfaceReadRestricted`] when the surface is tainted.
    fn get_image_data(&self) -> Result<Image, EngineError>;

    /// Writes `data` at the device origin, bypassing transform and alpha.
    fn put_image_data(&mut self, data: &Image);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_normalized() {
        let r = Rect::new(10.0, 10.0, -4.0, -6.0).normalized();
        assert_eq!(r, Rect::new(6.0, 4.0, 4.0, 6.0));
    }

    #[test]
    fn test_rect_contains_is_half_open() {
        let r = Rect::new(0.0, 0.0, 2.0, 2.0);
        assert!(r.contains(DVec2::new(0.0, 0.0)));
        assert!(r.contains(DVec2::new(1.9, 1.9)));
        assert!(!r.contains(DVec2::new(2.0, 1.0)));
    }
}
