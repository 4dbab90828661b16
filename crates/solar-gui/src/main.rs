//! GUI entry point for Solar Rooftop

mod analyze_panel;
mod app;
mod charts;
mod settings_panel;

use app::SolarApp;
use eframe::egui;
use solar_app::config::Config;
use solar_app::logging::init_logging;

fn main() -> eframe::Result<()> {
    let config = Config::load().unwrap_or_default();
    let log_dir = config.log_to_file.then(|| config.log_dir.clone());
    init_logging(log_dir.as_deref(), false);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 780.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Solar Rooftop Analysis",
        options,
        Box::new(|cc| Ok(Box::new(SolarApp::new(cc, config)))),
    )
}
