//! Rectangle and line helpers used for overlays and debug drawing.

use glam::DVec2;

use super::{Rect, Surface};
use crate::color::Color;

/// One-pixel rectangle outline.
pub fn draw_rectangle(
    surface: &mut dyn Surface,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    color: Color,
) {
    surface.stroke_rect(Rect::new(x, y, width, height), color, 1.0);
}

pub fn draw_filled_rectangle(
    surface: &mut dyn Surface,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    color: Color,
) {
    surface.fill_rect(Rect::new(x, y, width, height), color);
}

pub fn draw_line(
    surface: &mut dyn Surface,
    from: DVec2,
    to: DVec2,
    color: Color,
    line_width: f64,
) {
    surface.draw_line(from, to, color, line_width);
}
