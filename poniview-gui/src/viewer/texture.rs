//! Texture generation from the loaded diffraction image.

use egui::ColorImage;

use poniview_core::Frame;

use crate::viewer::Colormap;

/// Convert f64 to f32 with allowed precision loss.
#[allow(clippy::cast_possible_truncation)]
fn f64_to_f32(value: f64) -> f32 {
    value as f32
}

/// Generate a color image for the frame, min/max normalized.
///
/// Texture rows run top to bottom while the plot y axis runs upward, so
/// row `r` takes image row `y_size - 1 - r` and the rendered image lines
/// up with the pixel coordinates reported in the status bar.
#[must_use]
pub fn render_frame(frame: &Frame, colormap: Colormap) -> ColorImage {
    let (min, max) = frame.intensity_range();
    let span = (max - min).max(f64::EPSILON);
    let (x_size, y_size) = (frame.x_size(), frame.y_size());

    let mut pixels = Vec::with_capacity(x_size * y_size * 4);
    for row in 0..y_size {
        let y = y_size - 1 - row;
        for x in 0..x_size {
            let val = f64_to_f32((frame.intensity(x, y) - min) / span);
            pixels.extend_from_slice(&colormap.apply(val));
        }
    }
    ColorImage::from_rgba_unmultiplied([x_size, y_size], &pixels)
}
