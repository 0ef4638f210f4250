//! Main application state and logic.
//!
//! `PoniViewApp` owns the core session plus the presentation state derived
//! from it (texture, status line, colormap) and wires file drops, dialog
//! picks, and pointer movement into session operations.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use eframe::egui;

use poniview_core::{CursorPos, Session};

use crate::viewer::Colormap;

/// Minimum interval between pointer probes, roughly 60 per second.
const PROBE_INTERVAL: Duration = Duration::from_millis(16);

/// Main application state.
pub struct PoniViewApp {
    /// Core session: loaded image, calibration, derived display state.
    pub(crate) session: Session,
    /// Current colormap selection.
    pub(crate) colormap: Colormap,
    /// Cached image texture, rebuilt on image load or colormap change.
    pub(crate) texture: Option<egui::TextureHandle>,
    /// Status bar contents, normally the probe output.
    pub(crate) status_text: String,
    /// Last probed cursor position.
    pub(crate) cursor: CursorPos,
    /// Instant of the last probe recomputation.
    last_probe: Instant,
}

impl Default for PoniViewApp {
    fn default() -> Self {
        Self {
            session: Session::new(),
            colormap: Colormap::Inferno,
            texture: None,
            status_text: String::new(),
            cursor: None,
            last_probe: Instant::now(),
        }
    }
}

impl PoniViewApp {
    /// Build the app, loading files handed over on the command line.
    ///
    /// The image loads before the calibration, and a failing path only
    /// logs a warning; the viewer still opens with that slot empty.
    #[must_use]
    pub fn with_startup_files(image: Option<&Path>, poni: Option<&Path>) -> Self {
        let mut app = Self::default();
        if let Some(path) = image {
            if let Err(err) = app.session.load_image(path) {
                log::warn!("{err}");
            }
        }
        if let Some(path) = poni {
            if let Err(err) = app.session.load_poni(path) {
                log::warn!("{err}");
            }
        }
        app
    }

    /// Window title for the current session.
    #[must_use]
    pub fn window_title(&self) -> String {
        self.session.window_title()
    }

    /// Load an image and refresh the dependent presentation state.
    pub(crate) fn open_image(&mut self, path: &Path, ctx: &egui::Context) {
        match self.session.load_image(path) {
            Ok(()) => {
                log::info!("loaded image {}", path.display());
                self.texture = None;
                self.after_successful_load(ctx);
            }
            Err(err) => self.report_load_error(&err),
        }
    }

    /// Load a calibration and refresh the dependent presentation state.
    pub(crate) fn open_poni(&mut self, path: &Path, ctx: &egui::Context) {
        match self.session.load_poni(path) {
            Ok(()) => {
                log::info!("loaded calibration {}", path.display());
                self.after_successful_load(ctx);
            }
            Err(err) => self.report_load_error(&err),
        }
    }

    fn after_successful_load(&mut self, ctx: &egui::Context) {
        self.status_text.clear();
        self.cursor = None;
        ctx.send_viewport_cmd(egui::ViewportCommand::Title(self.session.window_title()));
    }

    fn report_load_error(&mut self, err: &poniview_core::Error) {
        log::warn!("{err}");
        self.status_text.clear();
    }

    /// Pull dropped files out of the input state and apply them.
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|f| f.path.clone())
                .collect()
        });
        if dropped.is_empty() {
            return;
        }

        let report = self.session.handle_dropped_files(&dropped);
        for err in &report.errors {
            log::warn!("{err}");
        }
        if report.image_loaded {
            self.texture = None;
        }
        if report.loads() > 0 {
            log::info!("drop loaded {} file(s)", report.loads());
            self.after_successful_load(ctx);
        } else if !report.errors.is_empty() {
            // Failed loads clear the readout; irrelevant drops leave it alone
            self.status_text.clear();
        }
    }

    /// Recompute the status line for a new cursor position, rate-limited.
    ///
    /// A position arriving inside the rate-limit window is deferred: a
    /// repaint is scheduled and the next frame re-reads the pointer, so the
    /// readout settles on the final position.
    pub(crate) fn update_probe(&mut self, cursor: CursorPos, ctx: &egui::Context) {
        if cursor == self.cursor {
            return;
        }
        if self.last_probe.elapsed() < PROBE_INTERVAL {
            ctx.request_repaint_after(PROBE_INTERVAL);
            return;
        }
        self.cursor = cursor;
        self.status_text = self.session.probe(cursor);
        self.last_probe = Instant::now();
    }

    /// Dim the viewport while files hover over the window.
    fn render_drop_hint(&self, ctx: &egui::Context) {
        let hovering = ctx.input(|i| !i.raw.hovered_files.is_empty());
        if !hovering {
            return;
        }
        let painter = ctx.layer_painter(egui::LayerId::new(
            egui::Order::Foreground,
            egui::Id::new("drop_hint"),
        ));
        let rect = ctx.screen_rect();
        painter.rect_filled(rect, 0.0, egui::Color32::from_black_alpha(96));
        painter.text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            "Drop a diffraction image or a poni file",
            egui::TextStyle::Heading.resolve(&ctx.style()),
            egui::Color32::WHITE,
        );
    }
}

impl eframe::App for PoniViewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_dropped_files(ctx);
        self.render_top_bar(ctx);
        self.render_status_bar(ctx);
        self.render_main_view(ctx);
        self.render_drop_hint(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Backdate the throttle so the next position is applied immediately.
    fn expire_throttle(app: &mut PoniViewApp) {
        app.last_probe = Instant::now().checked_sub(PROBE_INTERVAL).unwrap();
    }

    #[test]
    fn test_update_probe_applies_new_position() {
        let ctx = egui::Context::default();
        let mut app = PoniViewApp::default();
        expire_throttle(&mut app);

        app.update_probe(Some((1, 1)), &ctx);
        assert_eq!(app.cursor, Some((1, 1)));
    }

    #[test]
    fn test_update_probe_defers_then_settles() {
        let ctx = egui::Context::default();
        let mut app = PoniViewApp::default();
        expire_throttle(&mut app);
        app.update_probe(Some((1, 1)), &ctx);

        // Inside the window the position is held back for the scheduled
        // repaint, which re-reads the pointer on the next frame
        app.update_probe(Some((2, 2)), &ctx);
        assert_eq!(app.cursor, Some((1, 1)));

        expire_throttle(&mut app);
        app.update_probe(Some((2, 2)), &ctx);
        assert_eq!(app.cursor, Some((2, 2)));
    }

    #[test]
    fn test_update_probe_skips_repeated_position() {
        let ctx = egui::Context::default();
        let mut app = PoniViewApp::default();
        expire_throttle(&mut app);
        app.update_probe(Some((1, 1)), &ctx);

        let stamp = app.last_probe;
        app.update_probe(Some((1, 1)), &ctx);
        assert_eq!(app.last_probe, stamp);
    }
}
