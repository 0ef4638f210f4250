//! UI rendering modules.
//!
//! Contains the UI rendering logic split into separate modules:
//! - `main_view`: Central panel with the diffraction image plot
//! - `status_bar`: Bottom bar with the cursor readout
//! - `top_bar`: File pickers and colormap selection
//! - `theme`: Light palette and style configuration

mod main_view;
mod status_bar;
mod top_bar;

pub mod theme;
