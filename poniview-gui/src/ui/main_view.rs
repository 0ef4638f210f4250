//! Main view (central panel) rendering.

use eframe::egui;
use egui_plot::{Plot, PlotImage, PlotPoint};

use poniview_core::CursorPos;

use crate::app::PoniViewApp;
use crate::util::{f64_to_usize_bounded, usize_to_f32, usize_to_f64};
use crate::viewer;

impl PoniViewApp {
    /// Render the central panel with the diffraction image plot.
    pub(crate) fn render_main_view(&mut self, ctx: &egui::Context) {
        let sizes = self
            .session
            .image()
            .map(|frame| (frame.x_size(), frame.y_size()));
        self.ensure_texture(ctx);

        let hovered = egui::CentralPanel::default()
            .show(ctx, |ui| {
                let (Some((x_size, y_size)), Some(tex)) = (sizes, &self.texture) else {
                    ui.centered_and_justified(|ui| {
                        ui.label("Drop a diffraction image or a poni file");
                    });
                    return None;
                };
                let width = usize_to_f64(x_size);
                let height = usize_to_f64(y_size);
                Plot::new("image_plot")
                    .data_aspect(1.0)
                    .show_axes(false)
                    .show_grid(false)
                    .show(ui, |plot_ui| {
                        plot_ui.image(PlotImage::new(
                            tex,
                            PlotPoint::new(width / 2.0, height / 2.0),
                            [usize_to_f32(x_size), usize_to_f32(y_size)],
                        ));
                        plot_ui.pointer_coordinate()
                    })
                    .inner
                    .and_then(|pointer| hovered_pixel(pointer, x_size, y_size))
            })
            .inner;

        self.update_probe(hovered, ctx);
    }

    /// Regenerate the texture if the image or colormap changed.
    fn ensure_texture(&mut self, ctx: &egui::Context) {
        if self.texture.is_none() {
            if let Some(frame) = self.session.image() {
                let img = viewer::render_frame(frame, self.colormap);
                self.texture = Some(ctx.load_texture("image", img, egui::TextureOptions::NEAREST));
            }
        }
    }
}

/// Map a pointer plot coordinate to pixel indices, if it is over the image.
fn hovered_pixel(pointer: PlotPoint, x_size: usize, y_size: usize) -> CursorPos {
    let x = f64_to_usize_bounded(pointer.x.floor(), x_size)?;
    let y = f64_to_usize_bounded(pointer.y.floor(), y_size)?;
    Some((x, y))
}
