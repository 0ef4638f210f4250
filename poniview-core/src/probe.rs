//! Cursor probe: turn a pointer position into the status-bar text.

use std::f64::consts::PI;

use crate::session::Session;

/// Pixel coordinate reported by the display layer, `None` when the pointer
/// sits outside the image area.
pub type CursorPos = Option<(usize, usize)>;

impl Session {
    /// Status line for a pointer position.
    ///
    /// Empty when no image is loaded or the pointer is outside the image.
    /// In-bounds coordinates are the caller's contract; violations are
    /// defects and fail fast rather than clamp.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn probe(&self, cursor: CursorPos) -> String {
        let Some(frame) = self.image() else {
            return String::new();
        };
        let Some((x, y)) = cursor else {
            return String::new();
        };
        debug_assert!(
            x < frame.x_size() && y < frame.y_size(),
            "cursor ({x}, {y}) outside {}x{} image",
            frame.x_size(),
            frame.y_size()
        );
        let i = frame.intensity(x, y);
        let w = self.intensity_digits();
        let Some(poni) = self.calibration() else {
            return format!("({x:4}, {y:4}) | I={i:w$.0}");
        };
        // Geometry rows run along the screen y axis, columns along x
        let tth = poni.two_theta_pixel(y as f64, x as f64);
        let q = 4e-10 * PI / poni.wavelength * (0.5 * tth).sin();
        let tth_deg = tth.to_degrees();
        format!("({x:4}, {y:4}) | 2θ={tth_deg:5.2}deg | q={q:5.2}A^-1 | I={i:w$.0}")
    }
}
