//! Top bar with file pickers and view options.

use eframe::egui;
use rfd::FileDialog;

use poniview_core::formats::{IMAGE_EXTENSIONS, PONI_EXTENSION};

use crate::app::PoniViewApp;
use crate::viewer::Colormap;

impl PoniViewApp {
    /// Render the top bar: open buttons and colormap selection.
    pub(crate) fn render_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Open image…").clicked() {
                    if let Some(path) = FileDialog::new()
                        .add_filter("Diffraction images", &IMAGE_EXTENSIONS)
                        .pick_file()
                    {
                        self.open_image(&path, ctx);
                    }
                }
                if ui.button("Open poni…").clicked() {
                    if let Some(path) = FileDialog::new()
                        .add_filter("Poni calibration", &[PONI_EXTENSION])
                        .pick_file()
                    {
                        self.open_poni(&path, ctx);
                    }
                }

                ui.separator();

                ui.label("Colormap");
                egui::ComboBox::from_id_salt("colormap_select")
                    .selected_text(self.colormap.to_string())
                    .show_ui(ui, |ui| {
                        for cmap in [
                            Colormap::Inferno,
                            Colormap::Viridis,
                            Colormap::Plasma,
                            Colormap::Grayscale,
                        ] {
                            if ui
                                .selectable_value(&mut self.colormap, cmap, cmap.to_string())
                                .clicked()
                            {
                                self.texture = None;
                            }
                        }
                    });
            });
        });
    }
}
