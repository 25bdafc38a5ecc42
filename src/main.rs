//! Vehicle Insights - Vehicle Listings Dashboard
//!
//! Loads the listings CSV once, fills in missing values and shows a model
//! year scatterplot and a cylinder count bar chart.

mod charts;
mod config;
mod data;
mod export;
mod gui;
mod stats;

use anyhow::Context;
use config::{DashboardConfig, CONFIG_FILE};
use eframe::egui;
use gui::DashboardApp;
use std::path::Path;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = DashboardConfig::load_or_default(Path::new(CONFIG_FILE))
        .context("Failed to load dashboard configuration")?;
    log::info!("Using dataset {}", config.data_path.display());

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 900.0])
            .with_min_inner_size([900.0, 600.0])
            .with_title("Vehicle Insights"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Vehicle Insights",
        options,
        Box::new(|cc| Ok(Box::new(DashboardApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("Dashboard window failed: {}", e))
}
