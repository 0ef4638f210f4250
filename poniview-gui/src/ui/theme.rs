//! Application theme and color definitions.
//!
//! A single light theme: neutral grey canvas with near-black foreground,
//! and monospace text so the status readout keeps its column alignment.

use eframe::egui::{self, FontFamily, FontId, Stroke, TextStyle, Visuals};

/// Color palette for the application.
pub mod colors {
    use eframe::egui::Color32;

    /// Window and plot canvas background.
    pub const BACKGROUND: Color32 = Color32::from_rgb(240, 240, 240);
    /// Panel fill behind bars and controls.
    pub const PANEL: Color32 = Color32::from_rgb(232, 232, 232);
    /// Input and button background.
    pub const INPUT: Color32 = Color32::from_rgb(224, 224, 224);
    /// Border color for widgets.
    pub const BORDER: Color32 = Color32::from_rgb(200, 200, 200);
    /// Primary foreground text.
    pub const TEXT: Color32 = Color32::from_rgb(20, 20, 20);
    /// Selection accent.
    pub const ACCENT: Color32 = Color32::from_rgb(0x4a, 0x9e, 0xff);
}

/// Configure the egui style: light visuals plus monospace text styles.
pub fn configure_style(ctx: &egui::Context) {
    ctx.set_visuals(build_visuals());
    configure_fonts_and_spacing(ctx);
}

fn build_visuals() -> Visuals {
    let mut visuals = Visuals::light();

    visuals.window_fill = colors::BACKGROUND;
    visuals.panel_fill = colors::BACKGROUND;
    visuals.faint_bg_color = colors::PANEL;
    // egui_plot paints its canvas with extreme_bg_color
    visuals.extreme_bg_color = colors::BACKGROUND;

    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, colors::TEXT);
    visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, colors::BORDER);

    visuals.widgets.inactive.bg_fill = colors::INPUT;
    visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, colors::TEXT);
    visuals.widgets.inactive.bg_stroke = Stroke::new(1.0, colors::BORDER);

    visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, colors::TEXT);
    visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, colors::ACCENT);

    visuals.selection.bg_fill = colors::ACCENT.gamma_multiply(0.2);
    visuals.selection.stroke = Stroke::new(1.0, colors::ACCENT);

    visuals
}

fn configure_fonts_and_spacing(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();

    // Use monospace for everything
    style.text_styles = [
        (TextStyle::Small, FontId::new(10.0, FontFamily::Monospace)),
        (TextStyle::Body, FontId::new(12.0, FontFamily::Monospace)),
        (TextStyle::Button, FontId::new(12.0, FontFamily::Monospace)),
        (TextStyle::Heading, FontId::new(16.0, FontFamily::Monospace)),
        (
            TextStyle::Monospace,
            FontId::new(12.0, FontFamily::Monospace),
        ),
    ]
    .into();

    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.button_padding = egui::vec2(10.0, 6.0);

    ctx.set_style(style);
}
