//! Colormap definitions and application logic.

use crate::util::f32_to_u8;

/// Available colormaps for intensity visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Colormap {
    /// Inferno (approximate) - black to purple to red to yellow.
    Inferno,
    /// Viridis (approximate) - blue to teal to green to yellow.
    Viridis,
    /// Plasma (approximate) - blue to purple to orange to yellow.
    Plasma,
    /// Grayscale - black to white.
    Grayscale,
}

impl std::fmt::Display for Colormap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Colormap::Inferno => write!(f, "Inferno"),
            Colormap::Viridis => write!(f, "Viridis"),
            Colormap::Plasma => write!(f, "Plasma"),
            Colormap::Grayscale => write!(f, "Grayscale"),
        }
    }
}

impl Colormap {
    /// Apply the colormap to a normalized value [0, 1] and return RGBA bytes.
    ///
    /// # Arguments
    /// * `val` - Normalized value between 0.0 and 1.0
    ///
    /// # Returns
    /// RGBA color as `[r, g, b, a]` bytes
    #[must_use]
    pub fn apply(self, val: f32) -> [u8; 4] {
        let v = val.clamp(0.0, 1.0);
        match self {
            Colormap::Inferno => {
                let r = f32_to_u8(255.0 * v.powf(0.5));
                let g = f32_to_u8(200.0 * v.powf(1.5));
                let b = f32_to_u8(255.0 * (1.0 - v) * v * 4.0);
                [r, g, b, 255]
            }
            Colormap::Viridis => {
                let r = f32_to_u8(255.0 * v.powf(2.0));
                let g = f32_to_u8(255.0 * v);
                let b = f32_to_u8(255.0 * (1.0 - v));
                [r, g, b, 255]
            }
            Colormap::Plasma => {
                let r = f32_to_u8(255.0 * (0.05 + 0.95 * v));
                let g = f32_to_u8(255.0 * v * v);
                let b = f32_to_u8(255.0 * (1.0 - 0.7 * v));
                [r, g, b, 255]
            }
            Colormap::Grayscale => {
                let v = f32_to_u8(v * 255.0);
                [v, v, v, 255]
            }
        }
    }
}
