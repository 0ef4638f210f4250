//! Bottom status bar with the cursor readout.

use eframe::egui;

use crate::app::PoniViewApp;

impl PoniViewApp {
    /// Render the bottom status bar.
    pub(crate) fn render_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            // A single space keeps the bar height stable while empty
            let text = if self.status_text.is_empty() {
                " "
            } else {
                self.status_text.as_str()
            };
            ui.monospace(text);
        });
    }
}
