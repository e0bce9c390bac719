//! Command-recording surface for unit tests.

use glam::{DAffine2, DVec2};

use super::{Image, Rect, Surface, TransformStack};
use crate::color::Color;
use crate::error::EngineError;

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    FillRect { rect: Rect, color: Color },
    StrokeRect { rect: Rect, color: Color, line_width: f64 },
    ClearRect { rect: Rect },
    Line { from: DVec2, to: DVec2, color: Color },
    Polygon { points: Vec<DVec2>, color: Color },
    Image { src: Rect, dest: Rect },
    PutImageData,
}

/// A drawing operation plus the transform and alpha in effect when it ran.
#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub op: Op,
    pub transform: DAffine2,
    pub alpha: f64,
}

pub struct RecordingSurface {
    pub commands: Vec<Recorded>,
    pub saves: usize,
    pub restores: usize,
    pub readable: bool,
    pub pixels: Image,
    stack: TransformStack,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        RecordingSurface {
            commands: Vec::new(),
            saves: 0,
            restores: 0,
            readable: true,
            pixels: Image::filled(width, height, Color::TRANSPARENT),
            stack: TransformStack::new(),
        }
    }

    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    pub fn ops(&self) -> Vec<&Op> {
        self.commands.iter().map(|c| &c.op).collect()
    }

    pub fn fills(&self) -> Vec<(Rect, Color)> {
        self.commands
            .iter()
            .filter_map(|c| match c.op {
                Op::FillRect { rect, color } => Some((rect, color)),
                _ => None,
            })
            .collect()
    }

    pub fn strokes(&self) -> Vec<(Rect, Color)> {
        self.commands
            .iter()
            .filter_map(|c| match c.op {
                Op::StrokeRect { rect, color, .. } => Some((rect, color)),
                _ => None,
            })
            .collect()
    }

    fn record(&mut self, op: Op) {
        self.commands.push(Recorded {
            op,
            transform: self.stack.transform(),
            alpha: self.stack.alpha(),
        });
    }
}

impl Surface for RecordingSurface {
    fn width(&self) -> u32 {
        self.pixels.width()
    }

    fn height(&self) -> u32 {
        self.pixels.height()
    }

    fn save(&mut self) {
        self.saves += 1;
        self.stack.save();
    }

    fn restore(&mut self) {
        self.restores += 1;
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
        self.record(Op::FillRect { rect, color });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, line_width: f64) {
        self.record(Op::StrokeRect {
            rect,
            color,
            line_width,
        });
    }

    fn clear_rect(&mut self, rect: Rect) {
        self.record(Op::ClearRect { rect });
    }

    fn draw_line(&mut self, from: DVec2, to: DVec2, color: Color, _line_width: f64) {
        self.record(Op::Line { from, to, color });
    }

    fn fill_polygon(&mut self, points: &[DVec2], color: Color) {
        self.record(Op::Polygon {
            points: points.to_vec(),
            color,
        });
    }

    fn draw_image(&mut self, _image: &Image, src: Rect, dest: Rect) {
        self.record(Op::Image { src, dest });
    }

    fn get_image_data(&self) -> Result<Image, EngineError> {
        if self.readable {
            Ok(self.pixels.clone())
        } else {
            Err(EngineError::SurfaceReadRestricted)
        }
    }

    fn put_image_data(&mut self, data: &Image) {
        self.pixels = data.clone();
        self.record(Op::PutImageData);
    }
}
