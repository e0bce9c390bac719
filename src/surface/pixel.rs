//! Software RGBA surface
//!
//! A CPU rasterizer implementing [`Surface`]: every fill is evaluated per
//! device pixel by mapping the pixel center back into user space through the
//! inverse transform, which makes rotated and scaled shapes exact without any
//! special-casing.
//!
//! The demo binary uploads [`PixelSurface::pixels`] into a streaming texture
//! once per frame; tests read pixels back directly.

use glam::{DAffine2, DVec2};

use super::{Image, Rect, Surface, TransformStack};
use crate::color::Color;
use crate::error::EngineError;

pub struct PixelSurface {
    buffer: Image,
    stack: TransformStack,
    tainted: bool,
}

impl PixelSurface {
    /// Creates a fully transparent surface.
    pub fn new(width: u32, height: u32) -> Self {
        PixelSurface {
            buffer: Image::filled(width, height, Color::TRANSPARENT),
            stack: TransformStack::new(),
            tainted: false,
        }
    }

    pub fn pixels(&self) -> &[u8] {
        self.buffer.pixels()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        self.buffer.pixel(x, y)
    }

    /// True once a cross-origin image has been drawn.
    pub fn is_tainted(&self) -> bool {
        self.tainted
    }

    /// Outstanding `save()` calls.
    pub fn save_depth(&self) -> usize {
        self.stack.depth()
    }

    /// Device-space pixel bounds covered by `points`, clipped to the surface.
    fn device_bounds(&self, points: &[DVec2]) -> Option<(u32, u32, u32, u32)> {
        let (mut min, mut max) = (DVec2::splat(f64::INFINITY), DVec2::splat(f64::NEG_INFINITY));
        for p in points {
            min = min.min(*p);
            max = max.max(*p);
        }
        let x0 = min.x.floor().max(0.0);
        let y0 = min.y.floor().max(0.0);
        let x1 = max.x.ceil().min(self.buffer.width() as f64);
        let y1 = max.y.ceil().min(self.buffer.height() as f64);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
    }

    /// Visits every device pixel whose center maps inside `rect`, passing the
    /// user-space point it maps to.
    fn for_each_covered(&mut self, rect: Rect, mut visit: impl FnMut(&mut Image, u32, u32, DVec2)) {
        let rect = rect.normalized();
        if rect.width == 0.0 || rect.height == 0.0 {
            return;
        }
        let Some(inverse) = self.stack.inverse() else {
            return;
        };
        let transform = self.stack.transform();
        let corners = rect.corners().map(|c| transform.transform_point2(c));
        let Some((x0, y0, x1, y1)) = self.device_bounds(&corners) else {
            return;
        };

        for py in y0..y1 {
            for px in x0..x1 {
                let user = inverse.transform_point2(DVec2::new(px as f64 + 0.5, py as f64 + 0.5));
                if rect.contains(user) {
                    visit(&mut self.buffer, px, py, user);
                }
            }
        }
    }

    /// Source-over compositing of `color` scaled by `alpha`.
    fn blend(buffer: &mut Image, x: u32, y: u32, color: Color, alpha: f64) {
        let Some(dst) = buffer.pixel(x, y) else {
            return;
        };
        let sa = (color.a as f64 / 255.0) * alpha;
        if sa <= 0.0 {
            return;
        }
        let da = dst.a as f64 / 255.0;
        let out_a = sa + da * (1.0 - sa);
        let mix = |s: u8, d: u8| -> u8 {
            let v = (s as f64 * sa + d as f64 * da * (1.0 - sa)) / out_a;
            v.round().clamp(0.0, 255.0) as u8
        };
        let out = Color::rgba(
            mix(color.r, dst.r),
            mix(color.g, dst.g),
            mix(color.b, dst.b),
            (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
        );
        buffer.set_pixel(x, y, out);
    }
}

impl Surface for PixelSurface {
    fn width(&self) -> u32 {
        self.buffer.width()
    }

    fn height(&self) -> u32 {
        self.buffer.height()
    }

    fn save(&mut self) {
        self.stack.save();
    }

    fn restore(&mut self) {
        self.stack.restore();
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.stack.translate(dx, dy);
    }

    fn rotate(&mut self, angle: f64) {
        self.stack.rotate(angle);
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.stack.scale(sx, sy);
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.stack.set_alpha(alpha);
    }

    fn global_alpha(&self) -> f64 {
        self.stack.alpha()
    }

    fn transform(&self) -> DAffine2 {
        self.stack.transform()
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let alpha = self.stack.alpha();
        self.for_each_covered(rect, |buffer, x, y, _| Self::blend(buffer, x, y, color, alpha));
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, line_width: f64) {
        let r = rect.normalized();
        let half = line_width / 2.0;
        let inner_height = r.height - line_width;

        self.fill_rect(Rect::new(r.x - half, r.y - half, r.width + line_width, line_width), color);
        self.fill_rect(
            Rect::new(r.x - half, r.bottom() - half, r.width + line_width, line_width),
            color,
        );
        if inner_height > 0.0 {
            self.fill_rect(Rect::new(r.x - half, r.y + half, line_width, inner_height), color);
            self.fill_rect(Rect::new(r.right() - half, r.y + half, line_width, inner_height), color);
        }
    }

    fn clear_rect(&mut self, rect: Rect) {
        self.for_each_covered(rect, |buffer, x, y, _| buffer.set_pixel(x, y, Color::TRANSPARENT));
    }

    fn draw_line(&mut self, from: DVec2, to: DVec2, color: Color, line_width: f64) {
        let delta = to - from;
        let length = delta.length();
        if length == 0.0 {
            return;
        }
        self.stack.save();
        self.stack.translate(from.x, from.y);
        self.stack.rotate(delta.y.atan2(delta.x));
        self.fill_rect(Rect::new(0.0, -line_width / 2.0, length, line_width), color);
        self.stack.restore();
    }

    fn fill_polygon(&mut self, points: &[DVec2], color: Color) {
        if points.len() < 3 {
            return;
        }
        let transform = self.stack.transform();
        let device: Vec<DVec2> = points.iter().map(|p| transform.transform_point2(*p)).collect();
        let Some((x0, y0, x1, y1)) = self.device_bounds(&device) else {
            return;
        };
        let alpha = self.stack.alpha();

        for py in y0..y1 {
            for px in x0..x1 {
                let p = DVec2::new(px as f64 + 0.5, py as f64 + 0.5);
                if point_in_polygon(p, &device) {
                    Self::blend(&mut self.buffer, px, py, color, alpha);
                }
            }
        }
    }

    fn draw_image(&mut self, image: &Image, src: Rect, dest: Rect) {
        if image.is_cross_origin() {
            self.tainted = true;
        }
        let dest = dest.normalized();
        if dest.width == 0.0 || dest.height == 0.0 {
            return;
        }
        let sx = src.width / dest.width;
        let sy = src.height / dest.height;
        let alpha = self.stack.alpha();

        self.for_each_covered(dest, |buffer, x, y, user| {
            let u = src.x + (user.x - dest.x) * sx;
            let v = src.y + (user.y - dest.y) * sy;
            if u < 0.0 || v < 0.0 || !src.contains(DVec2::new(u, v)) {
                return;
            }
            if let Some(texel) = image.pixel(u.floor() as u32, v.floor() as u32) {
                Self::blend(buffer, x, y, texel, alpha);
            }
        });
    }

    fn get_image_data(&self) -> Result<Image, EngineError> {
        if self.tainted {
            return Err(EngineError::SurfaceReadRestricted);
        }
        Ok(self.buffer.clone())
    }

    fn put_image_data(&mut self, data: &Image) {
        let w = data.width().min(self.buffer.width());
        let h = data.height().min(self.buffer.height());
        for y in 0..h {
            for x in 0..w {
                if let Some(c) = data.pixel(x, y) {
                    self.buffer.set_pixel(x, y, c);
                }
            }
        }
    }
}

/// Even-odd rule test.
fn point_in_polygon(p: DVec2, polygon: &[DVec2]) -> bool {
    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let (a, b) = (polygon[i], polygon[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_fill_rect_covers_exact_pixels() {
        let mut s = PixelSurface::new(10, 10);
        s.fill_rect(Rect::new(2.0, 3.0, 4.0, 2.0), Color::RED);
        assert_eq!(s.pixel(2, 3), Some(Color::RED));
        assert_eq!(s.pixel(5, 4), Some(Color::RED));
        assert_eq!(s.pixel(6, 4), Some(Color::TRANSPARENT));
        assert_eq!(s.pixel(2, 5), Some(Color::TRANSPARENT));
    }

    #[test]
    fn test_translate_and_scale_apply() {
        let mut s = PixelSurface::new(20, 20);
        s.save();
        s.translate(5.0, 5.0);
        s.scale(2.0, 2.0);
        s.fill_rect(Rect::new(0.0, 0.0, 2.0, 2.0), Color::GREEN);
        s.restore();
        assert_eq!(s.pixel(5, 5), Some(Color::GREEN));
        assert_eq!(s.pixel(8, 8), Some(Color::GREEN));
        assert_eq!(s.pixel(9, 9), Some(Color::TRANSPARENT));
        assert_eq!(s.save_depth(), 0);
    }

    #[test]
    fn test_rotation_about_center_turns_bar_vertical() {
        // A 10x2 horizontal bar centered on (10, 10), rotated a quarter turn
        let mut s = PixelSurface::new(20, 20);
        s.save();
        s.translate(10.0, 10.0);
        s.rotate(FRAC_PI_2);
        s.translate(-10.0, -10.0);
        s.fill_rect(Rect::new(5.0, 9.0, 10.0, 2.0), Color::RED);
        s.restore();
        assert_eq!(s.pixel(10, 6), Some(Color::RED));
        assert_eq!(s.pixel(10, 13), Some(Color::RED));
        assert_eq!(s.pixel(6, 10), Some(Color::TRANSPARENT));
    }

    #[test]
    fn test_global_alpha_blends() {
        let mut s = PixelSurface::new(2, 2);
        s.fill_rect(Rect::new(0.0, 0.0, 2.0, 2.0), Color::BLACK);
        s.set_global_alpha(0.5);
        s.fill_rect(Rect::new(0.0, 0.0, 2.0, 2.0), Color::WHITE);
        let p = s.pixel(0, 0).unwrap();
        assert!((127..=128).contains(&p.r));
        assert_eq!(p.a, 255);
    }

    #[test]
    fn test_clear_rect_resets_to_transparent() {
        let mut s = PixelSurface::new(4, 4);
        s.fill_rect(Rect::new(0.0, 0.0, 4.0, 4.0), Color::RED);
        s.clear_rect(Rect::new(1.0, 1.0, 2.0, 2.0));
        assert_eq!(s.pixel(1, 1), Some(Color::TRANSPARENT));
        assert_eq!(s.pixel(0, 0), Some(Color::RED));
    }

    #[test]
    fn test_draw_image_uses_source_rect() {
        // Two 2x2 frames side by side: red then green
        let mut sheet = Image::filled(4, 2, Color::RED);
        for y in 0..2 {
            for x in 2..4 {
                sheet.set_pixel(x, y, Color::GREEN);
            }
        }
        let mut s = PixelSurface::new(4, 4);
        s.draw_image(&sheet, Rect::new(2.0, 0.0, 2.0, 2.0), Rect::new(1.0, 1.0, 2.0, 2.0));
        assert_eq!(s.pixel(1, 1), Some(Color::GREEN));
        assert_eq!(s.pixel(2, 2), Some(Color::GREEN));
        assert_eq!(s.pixel(0, 0), Some(Color::TRANSPARENT));
    }

    #[test]
    fn test_cross_origin_image_taints_surface() {
        let mut s = PixelSurface::new(4, 4);
        assert!(s.get_image_data().is_ok());
        let foreign = Image::filled(1, 1, Color::RED).with_cross_origin(true);
        s.draw_image(&foreign, Rect::new(0.0, 0.0, 1.0, 1.0), Rect::new(0.0, 0.0, 1.0, 1.0));
        assert!(s.is_tainted());
        assert!(matches!(s.get_image_data(), Err(EngineError::SurfaceReadRestricted)));
    }

    #[test]
    fn test_stroke_rect_leaves_interior() {
        let mut s = PixelSurface::new(12, 12);
        s.stroke_rect(Rect::new(2.0, 2.0, 8.0, 8.0), Color::RED, 2.0);
        assert_eq!(s.pixel(1, 1), Some(Color::RED));
        assert_eq!(s.pixel(2, 6), Some(Color::RED));
        assert_eq!(s.pixel(6, 6), Some(Color::TRANSPARENT));
    }

    #[test]
    fn test_fill_polygon_triangle() {
        let mut s = PixelSurface::new(10, 10);
        let tri = [DVec2::new(0.0, 0.0), DVec2::new(10.0, 0.0), DVec2::new(0.0, 10.0)];
        s.fill_polygon(&tri, Color::RED);
        assert_eq!(s.pixel(1, 1), Some(Color::RED));
        assert_eq!(s.pixel(8, 8), Some(Color::TRANSPARENT));
    }

    #[test]
    fn test_draw_line_horizontal() {
        let mut s = PixelSurface::new(10, 4);
        s.draw_line(DVec2::new(1.0, 2.0), DVec2::new(8.0, 2.0), Color::RED, 2.0);
        assert_eq!(s.pixel(4, 1), Some(Color::RED));
        assert_eq!(s.pixel(4, 2), Some(Color::RED));
        assert_eq!(s.pixel(9, 2), Some(Color::TRANSPARENT));
    }

    #[test]
    fn test_put_image_data_round_trips_pixels() {
        let mut s = PixelSurface::new(3, 3);
        s.fill_rect(Rect::new(0.0, 0.0, 3.0, 3.0), Color::RED);
        let mut data = s.get_image_data().unwrap();
        data.set_pixel(1, 1, Color::GREEN);
        s.put_image_data(&data);
        assert_eq!(s.pixel(1, 1), Some(Color::GREEN));
        assert_eq!(s.pixel(0, 0), Some(Color::RED));
    }
}
