//! Per-frame draw contract
//!
//! [`Graphic::draw`] runs in this order:
//!
//! 1. Cull: invisible entities and entities past the left/right world edge
//!    are skipped.
//! 2. Heading: with `rotate_to_direction`, the angle follows the velocity.
//! 3. Optionally clear the rectangle covered on the previous frame.
//! 4. Pivot: the balance point if set, else the geometric center.
//! 5. Transform: translate(pivot), rotate(angle), scale, translate(-pivot),
//!    plus global alpha when the entity is translucent.
//! 6. Body: flat rectangle or sprite frame.
//! 7. Overlays: selection box, debug box and heading, life bar.
//! 8. Restore the surface state, whatever happened in between.

use glam::DVec2;

use super::{Graphic, Renderable};
use crate::color::Color;
use crate::error::{EngineError, EngineResult};
use crate::surface::{Rect, Surface, primitives};
use crate::timer::Scheduler;
use crate::world::World;

const SELECT_LINE_WIDTH: f64 = 3.0;
const ARROW_COLOR: Color = Color::rgb(0x11, 0x11, 0x11);
const ARROW_SCALE: f64 = 0.4;
const ARROW_SHAPE: [(f64, f64); 4] = [(-20.0, 0.0), (-25.0, -12.0), (1.0, 0.0), (-25.0, 12.0)];

/// Collaborators an entity needs while drawing.
pub struct DrawContext<'a> {
    pub surface: &'a mut dyn Surface,
    pub world: &'a World,
    /// Used to arm sprite playback on first draw
    pub scheduler: &'a mut Scheduler,
    /// Global debug flag; entities also honor their own
    pub debug: bool,
}

impl Graphic {
    /// Draws the entity. See the module docs for the exact sequence.
    ///
    /// # Errors
    ///
    /// [`EngineError::MissingImageResource`] when a sprite entity has no image
    /// bound yet. The surface state is restored before returning.
    pub fn draw(&mut self, ctx: &mut DrawContext<'_>) -> EngineResult<()> {
        if !self.is_drawable(ctx.world) {
            return Ok(());
        }

        if self.rotate_to_direction {
            self.set_rotate_to_direction_angle();
        }

        if self.do_clear_last_position {
            self.clear_last_position(ctx.surface);
        }

        let pivot = self.pivot();
        let surface = &mut *ctx.surface;

        surface.save();
        surface.translate(pivot.x, pivot.y);
        surface.rotate(self.angle);
        surface.scale(self.scale_x, self.scale_y);
        surface.translate(-pivot.x, -pivot.y);

        if self.opacity != 1.0 {
            surface.set_global_alpha(self.opacity);
        }

        let result = self.draw_body(ctx);
        if result.is_ok() {
            self.draw_overlays(ctx.surface, pivot, ctx.debug);
        }

        ctx.surface.restore();
        result
    }

    /// Point rotation and scaling are applied around.
    pub fn pivot(&self) -> DVec2 {
        let center = self.center();
        DVec2::new(
            self.balance_point_x.unwrap_or(center.x),
            self.balance_point_y.unwrap_or(center.y),
        )
    }

    /// The rectangle cleared by [`Self::clear_last_position`], `None` when
    /// the entity has not moved since the last snapshot.
    pub fn last_position_rect(&self) -> Option<Rect> {
        if self.last_x == self.x && self.last_y == self.y {
            return None;
        }

        let mut x = self.last_x + (-self.vx - 2.0);
        let mut y = self.last_y + (-self.vy - 2.0);
        let mut w = self.width + 2.0;
        let mut h = self.height + 4.0;

        if self.life_bar.show {
            x = self.last_x + (-self.vx - 2.0);
            y = self.last_y + self.life_bar.offset_y - 2.0;
            w = self.width.max(self.life_bar.width) + 6.0;
            h = self.life_bar.offset_y.abs() + self.height + 4.0;
        }

        Some(Rect::new(x, y, w, h))
    }

    /// Erases where the entity was drawn last frame, with some slop for
    /// velocity and the life bar.
    pub fn clear_last_position(&self, surface: &mut dyn Surface) {
        if let Some(rect) = self.last_position_rect() {
            surface.clear_rect(rect);
        }
    }

    fn draw_body(&mut self, ctx: &mut DrawContext<'_>) -> EngineResult<()> {
        let image = match &self.renderable {
            Renderable::Shape => {
                ctx.surface.fill_rect(Rect::new(self.x, self.y, self.width, self.height), self.color);
                return Ok(());
            }
            Renderable::Sprite { image, .. } => image.clone(),
        };
        let Some(image) = image else {
            return Err(EngineError::MissingImageResource { id: self.id.clone() });
        };

        let frame = self.frame_to_draw(ctx.scheduler) as f64;
        let src = Rect::new(self.width * frame, 0.0, self.width, self.height);
        let dest = Rect::new(self.x, self.y, self.width, self.height);
        ctx.surface.draw_image(&image, src, dest);
        Ok(())
    }

    fn draw_overlays(&self, surface: &mut dyn Surface, pivot: DVec2, global_debug: bool) {
        if self.is_selected {
            surface.stroke_rect(
                Rect::new(self.x, self.y, self.width, self.height),
                self.select_color,
                SELECT_LINE_WIDTH,
            );
        }

        if global_debug || self.debug {
            self.draw_bounding_box(surface);
            self.draw_direction_line(surface, pivot);
        }

        if self.life_bar.show {
            self.life_bar.draw(surface, self.x, self.y);
        }
    }

    fn draw_bounding_box(&self, surface: &mut dyn Surface) {
        let b = self.bounding_box_rect();
        primitives::draw_rectangle(surface, b.x, b.y, b.width, b.height, self.bounding_box.color);
    }

    /// Heading indicator along the local X axis; the entity transform turns
    /// it towards the current angle.
    fn draw_direction_line(&self, surface: &mut dyn Surface, pivot: DVec2) {
        let tip = DVec2::new(pivot.x + self.width / 2.0, pivot.y);
        primitives::draw_line(surface, pivot, tip, self.direction_line_color, 1.0);

        if !self.direction_arrow {
            return;
        }

        surface.save();
        surface.translate(self.x + self.width, pivot.y);
        surface.scale(ARROW_SCALE, ARROW_SCALE);
        let points: Vec<DVec2> = ARROW_SHAPE.iter().map(|&(x, y)| DVec2::new(x, y)).collect();
        surface.fill_polygon(&points, ARROW_COLOR);
        surface.restore();
    }
}
