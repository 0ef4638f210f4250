//! Visualization modules for the diffraction image display.

mod colormap;
mod texture;

pub use colormap::Colormap;
pub use texture::render_frame;
