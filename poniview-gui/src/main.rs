//! PoniView application entry point.

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod ui;
mod util;
mod viewer;

use std::path::PathBuf;

use app::PoniViewApp;
use clap::Parser;
use eframe::egui;

/// Viewer for diffraction images and pyFAI poni calibration files.
#[derive(Parser, Debug)]
#[command(name = "poniview", version, about)]
struct Args {
    /// File containing the diffraction parameter (poni-file).
    #[arg(short = 'p', long = "poni", value_name = "FILE")]
    poni: Option<PathBuf>,

    /// Diffraction image to display.
    #[arg(short = 'i', long = "image", value_name = "FILE")]
    image: Option<PathBuf>,
}

fn main() -> eframe::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let app = PoniViewApp::with_startup_files(args.image.as_deref(), args.poni.as_deref());
    let opts = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 700.0])
            .with_min_inner_size([640.0, 480.0])
            .with_title(app.window_title()),
        ..Default::default()
    };
    eframe::run_native(
        "PoniView",
        opts,
        Box::new(move |cc| {
            ui::theme::configure_style(&cc.egui_ctx);
            Ok(Box::new(app))
        }),
    )
}
