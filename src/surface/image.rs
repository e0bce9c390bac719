//! RGBA bitmaps used as sprite sheets and as surface read-back buffers.

use crate::color::Color;
use crate::error::EngineError;

/// A bitmap stored as tightly packed, non-premultiplied RGBA8 rows.
///
/// `cross_origin` mirrors the browser notion of a tainted image: it can be
/// drawn, but a surface it was drawn onto can no longer be read back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    cross_origin: bool,
}

impl Image {
    /// Wraps raw RGBA8 data.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` when `pixels` does not hold exactly `width * height * 4` bytes.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, EngineError> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(EngineError::InvalidConfig(format!(
                "image data has {} bytes, expected {} for {}x{}",
                pixels.len(),
                expected,
                width,
                height
            )));
        }
        Ok(Image {
            width,
            height,
            pixels,
            cross_origin: false,
        })
    }

    /// A `width` x `height` image filled with one color.
    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        let mut pixels = Vec::with_capacity(width as usize * height as usize * 4);
        for _ in 0..(width as usize * height as usize) {
            pixels.extend_from_slice(&[color.r, color.g, color.b, color.a]);
        }
        Image {
            width,
            height,
            pixels,
            cross_origin: false,
        }
    }

    /// Marks the image as coming from another origin.
    pub fn with_cross_origin(mut self, cross_origin: bool) -> Self {
        self.cross_origin = cross_origin;
        self
    }

    pub fn is_cross_origin(&self) -> bool {
        self.cross_origin
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Color at `(x, y)`, `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some(Color::rgba(
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ))
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        self.pixels[i..i + 4].copy_from_slice(&[color.r, color.g, color.b, color.a]);
    }
}
