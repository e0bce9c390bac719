//! Full-surface post effects.

use crate::color::Color;
use crate::error::EngineResult;
use crate::surface::{Image, Rect, Surface};

/// Luminance of an RGB triple, as used by the lose effect.
pub fn luminance(r: u8, g: u8, b: u8) -> u8 {
    let gray = r as f64 * 0.3 + g as f64 * 0.59 + b as f64 * 0.11;
    gray.round().clamp(0.0, 255.0) as u8
}

/// Replaces each pixel's color channels with its luminance; alpha is kept.
pub fn grayscale(image: &mut Image) {
    for px in image.pixels_mut().chunks_exact_mut(4) {
        let gray = luminance(px[0], px[1], px[2]);
        px[0] = gray;
        px[1] = gray;
        px[2] = gray;
    }
}

/// Turns the whole surface gray: reads it back, paints black underneath
/// and writes the converted pixels on top.
///
/// # Errors
///
/// `SurfaceReadRestricted` when the surface cannot be read. Nothing is
/// drawn in that case.
pub fn surface_to_grayscale(surface: &mut dyn Surface) -> EngineResult<()> {
    let mut data = surface.get_image_data()?;
    grayscale(&mut data);

    let full = Rect::new(0.0, 0.0, surface.width() as f64, surface.height() as f64);
    surface.fill_rect(full, Color::BLACK);
    surface.put_image_data(&data);
    Ok(())
}
