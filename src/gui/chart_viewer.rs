//! Chart Viewer Widget
//! Central scrollable area with the two dashboard charts.

use crate::charts::{ChartPlotter, BAR_TITLE, SCATTER_TITLE};
use crate::stats::DashboardSummary;
use egui::{Color32, RichText, ScrollArea};

const CHART_HEIGHT: f32 = 360.0;
const CARD_SPACING: f32 = 15.0;

/// Displays the latest summaries, or the error that stopped rendering.
#[derive(Default)]
pub struct ChartViewer {
    pub summary: Option<DashboardSummary>,
    pub error: Option<String>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_summary(&mut self, summary: DashboardSummary) {
        self.summary = Some(summary);
        self.error = None;
    }

    /// Replace the charts with an error message.
    pub fn set_error(&mut self, error: String) {
        self.summary = None;
        self.error = Some(error);
    }

    pub fn show(&self, ui: &mut egui::Ui, show_scatter: bool, show_bar: bool) {
        if let Some(error) = &self.error {
            ui.centered_and_justified(|ui| {
                ui.label(
                    RichText::new(format!("⚠ {}", error))
                        .size(16.0)
                        .color(Color32::from_rgb(220, 53, 69)),
                );
            });
            return;
        }

        let Some(summary) = &self.summary else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        };

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading(RichText::new("Vehicle Data Visualization").size(24.0).strong());
                ui.add_space(CARD_SPACING);

                if show_scatter {
                    Self::chart_card(ui, SCATTER_TITLE, summary.year_points.is_empty(), |ui| {
                        ChartPlotter::draw_year_scatter(ui, &summary.year_points, CHART_HEIGHT)
                    });
                    ui.add_space(CARD_SPACING);
                }

                if show_bar {
                    Self::chart_card(ui, BAR_TITLE, summary.cylinder_bars.is_empty(), |ui| {
                        ChartPlotter::draw_cylinder_bars(ui, &summary.cylinder_bars, CHART_HEIGHT)
                    });
                    ui.add_space(CARD_SPACING);
                }

                ui.heading(
                    RichText::new("Thank you for exploring the vehicle dataset!")
                        .size(20.0)
                        .strong(),
                );
            });
    }

    fn chart_card(ui: &mut egui::Ui, title: &str, empty: bool, draw: impl FnOnce(&mut egui::Ui)) {
        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(1.0, ui.visuals().widgets.noninteractive.bg_stroke.color))
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.label(RichText::new(title).size(18.0).strong());
                ui.add_space(8.0);
                if empty {
                    ui.label(RichText::new("No Data").color(Color32::GRAY));
                } else {
                    draw(ui);
                }
            });
    }
}
