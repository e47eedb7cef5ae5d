mod app;
mod state;
mod ui;

use anyhow::Context;
use app::DashboardApp;
use bee_cycle_dashboard::config::DashboardConfig;
use eframe::egui;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config =
        DashboardConfig::resolve(std::env::args()).context("loading dashboard configuration")?;
    log::info!("Starting dashboard with data file {}", config.data_path.display());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };

    let title = config.title.clone();
    eframe::run_native(
        &title,
        options,
        Box::new(|_cc| Ok(Box::new(DashboardApp::new(config)))),
    )
    .map_err(|e| anyhow::anyhow!("running the dashboard window: {e}"))
}
