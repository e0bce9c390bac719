//! Save/restore stack of transform and alpha state, shared by surfaces.

use glam::{DAffine2, DVec2};

#[derive(Debug, Clone, Copy, PartialEq)]
struct DrawState {
    transform: DAffine2,
    alpha: f64,
}

impl Default for DrawState {
    fn default() -> Self {
        DrawState {
            transform: DAffine2::IDENTITY,
            alpha: 1.0,
        }
    }
}

/// Current draw state plus everything pushed by `save()`.
#[derive(Debug, Clone, Default)]
pub struct TransformStack {
    current: DrawState,
    saved: Vec<DrawState>,
}

impl TransformStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn save(&mut self) {
        self.saved.push(self.current);
    }

    pub fn restore(&mut self) {
        if let Some(state) = self.saved.pop() {
            self.current = state;
        }
    }

    /// Number of `save()` calls not yet restored.
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    // Canvas semantics: each operation post-multiplies the current matrix,
    // so the last call applies first to drawn coordinates.

    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.current.transform = self.current.transform * DAffine2::from_translation(DVec2::new(dx, dy));
    }

    pub fn rotate(&mut self, angle: f64) {
        self.current.transform = self.current.transform * DAffine2::from_angle(angle);
    }

    pub fn scale(&mut self, sx: f64, sy: f64) {
        self.current.transform = self.current.transform * DAffine2::from_scale(DVec2::new(sx, sy));
    }

    pub fn set_alpha(&mut self, alpha: f64) {
        self.current.alpha = alpha.clamp(0.0, 1.0);
    }

    pub fn alpha(&self) -> f64 {
        self.current.alpha
    }

    pub fn transform(&self) -> DAffine2 {
        self.current.transform
    }

    /// Inverse of the current transform, `None` when it collapses an axis.
    pub fn inverse(&self) -> Option<DAffine2> {
        let det = self.current.transform.matrix2.determinant();
        if det.abs() < f64::EPSILON {
            None
        } else {
            Some(self.current.transform.inverse())
        }
    }
}
