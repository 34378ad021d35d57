mod app;
mod state;
mod ui;

use app::RustyLumenApp;
use eframe::egui;
use rusty_lumen::config::{Config, CONFIG_ENV};

fn main() -> eframe::Result {
    env_logger::init();

    let config = Config::from_env().unwrap_or_else(|e| {
        log::error!("Ignoring {CONFIG_ENV}: {e}");
        Config::default()
    });

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 860.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Rusty Lumen – Photoluminescence Viewer",
        options,
        Box::new(|_cc| Ok(Box::new(RustyLumenApp::new(config)))),
    )
}
