//! Vehicle Insights Main Application
//! Main window with control panel and chart viewer.
//!
//! The cleaned dataset comes from the process-wide cache. Summaries are
//! recomputed on every render pass: the first frame and each interaction
//! that changes what is shown.

use crate::charts::ChartSelection;
use crate::config::DashboardConfig;
use crate::data::{global_cache, CleanedDataset, DataCleaner, MedianFill};
use crate::export::{export_charts_png, export_summary_json};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction, UserSettings};
use crate::stats::{Aggregator, DashboardSummary};
use egui::SidePanel;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

/// Main application window.
pub struct DashboardApp {
    config: DashboardConfig,
    cleaner: DataCleaner<MedianFill>,
    aggregator: Aggregator,
    rng: StdRng,
    dataset: Option<Arc<CleanedDataset>>,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: DashboardConfig) -> Self {
        let cleaner = DataCleaner::new(MedianFill)
            .with_scope(config.imputation_scope)
            .with_unknown_label(config.unknown_paint_color.clone());
        let settings = UserSettings {
            data_path: config.data_path.clone(),
            show_scatter: config.show_scatter,
            show_bar: config.show_bar,
        };

        let mut app = Self {
            aggregator: Aggregator::new(config.jitter_radius),
            cleaner,
            rng: StdRng::from_entropy(),
            dataset: None,
            control_panel: ControlPanel::new(settings),
            chart_viewer: ChartViewer::new(),
            config,
        };
        app.load_dataset();
        app.render_pass();
        app
    }

    /// Fetch the cleaned dataset from the cache, reading the file on first use.
    fn load_dataset(&mut self) {
        match global_cache().get_or_load(&self.config.data_path, &self.cleaner) {
            Ok(dataset) => {
                self.control_panel.row_count = Some(dataset.len());
                self.control_panel
                    .set_status(&format!("Loaded {} listings", dataset.len()));
                self.dataset = Some(dataset);
            }
            Err(e) => {
                log::error!("Failed to load dataset: {}", e);
                self.dataset = None;
                self.control_panel.row_count = None;
                self.control_panel.set_error(&e.to_string());
                self.chart_viewer.set_error(e.to_string());
            }
        }
    }

    /// Recompute the summaries from the cached dataset.
    fn render_pass(&mut self) {
        let Some(dataset) = &self.dataset else {
            return;
        };
        match self.aggregator.summarize(dataset, &mut self.rng) {
            Ok(summary) => self.chart_viewer.set_summary(summary),
            Err(e) => {
                log::error!("Failed to aggregate dataset: {}", e);
                self.control_panel.set_error(&e.to_string());
                self.chart_viewer.set_error(e.to_string());
            }
        }
    }

    fn handle_reload(&mut self) {
        global_cache().invalidate();
        self.load_dataset();
        self.render_pass();
    }

    fn current_summary(&self) -> Option<&DashboardSummary> {
        self.chart_viewer.summary.as_ref()
    }

    fn handle_export_png(&mut self) {
        let Some(summary) = self.current_summary().cloned() else {
            self.control_panel.set_error("No charts to export");
            return;
        };

        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name("vehicle_charts.png")
            .save_file()
        else {
            return; // User cancelled
        };

        let selection = ChartSelection {
            scatter: self.control_panel.settings.show_scatter,
            bar: self.control_panel.settings.show_bar,
        };
        match export_charts_png(&summary, selection, &path) {
            Ok(()) => {
                self.control_panel
                    .set_status(&format!("Charts saved to {}", path.display()));
                if let Err(e) = open::that(&path) {
                    log::warn!("Could not open {}: {}", path.display(), e);
                }
            }
            Err(e) => {
                log::error!("PNG export failed: {}", e);
                self.control_panel.set_error(&e.to_string());
            }
        }
    }

    fn handle_export_json(&mut self) {
        let Some(summary) = self.current_summary().cloned() else {
            self.control_panel.set_error("No summaries to export");
            return;
        };

        let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .set_file_name("vehicle_summary.json")
            .save_file()
        else {
            return; // User cancelled
        };

        match export_summary_json(&summary, &path) {
            Ok(()) => self
                .control_panel
                .set_status(&format!("Summaries saved to {}", path.display())),
            Err(e) => {
                log::error!("JSON export failed: {}", e);
                self.control_panel.set_error(&e.to_string());
            }
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(260.0)
            .max_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    match self.control_panel.show(ui) {
                        ControlPanelAction::ToggleChanged | ControlPanelAction::Rerender => {
                            self.render_pass()
                        }
                        ControlPanelAction::Reload => self.handle_reload(),
                        ControlPanelAction::ExportPng => self.handle_export_png(),
                        ControlPanelAction::ExportJson => self.handle_export_json(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Chart Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            let settings = &self.control_panel.settings;
            self.chart_viewer
                .show(ui, settings.show_scatter, settings.show_bar);
        });
    }
}
