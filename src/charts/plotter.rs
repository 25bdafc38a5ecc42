//! Chart Plotter Module
//! Interactive scatter and bar charts using egui_plot.

use crate::stats::{CylinderCountBar, YearFrequencyPoint};
use egui::{Align2, Color32};
use egui_plot::{Bar, BarChart, Legend, Plot, PlotPoint, PlotPoints, Points, Text};

pub const SCATTER_COLOR: Color32 = Color32::from_rgb(99, 110, 250); // Blue
pub const BAR_COLOR: Color32 = Color32::from_rgb(255, 165, 0); // Orange

pub const SCATTER_TITLE: &str = "Scatterplot of Model Years with Frequency";
pub const BAR_TITLE: &str = "Count of Vehicles by Cylinder Type";

/// Axis label for a cylinder count ("6", not "6.0").
pub fn cylinder_label(cylinders: f64) -> String {
    format!("{}", cylinders)
}

/// Count text anchored on top of each bar, as `(x, y, label)`.
pub fn bar_count_labels(bars: &[CylinderCountBar]) -> Vec<(f64, f64, String)> {
    bars.iter()
        .enumerate()
        .map(|(i, b)| (i as f64, b.count as f64, b.count.to_string()))
        .collect()
}

/// Draws the dashboard charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Scatter of jittered model year against frequency.
    pub fn draw_year_scatter(ui: &mut egui::Ui, points: &[YearFrequencyPoint], height: f32) {
        Plot::new("year_frequency_scatter")
            .height(height)
            .legend(Legend::default())
            .allow_scroll(false)
            .x_axis_label("Model Year")
            .y_axis_label("Frequency")
            .include_y(0.0)
            .show(ui, |plot_ui| {
                let plot_points: PlotPoints = points
                    .iter()
                    .map(|p| [p.jittered_year, p.frequency as f64])
                    .collect();

                plot_ui.points(
                    Points::new(plot_points)
                        .radius(4.0)
                        .filled(true)
                        .color(SCATTER_COLOR.gamma_multiply(0.7))
                        .name("Model Year"),
                );
            });
    }

    /// Bars in value-count order, labelled with the cylinder count.
    pub fn draw_cylinder_bars(ui: &mut egui::Ui, bars: &[CylinderCountBar], height: f32) {
        let x_labels: Vec<String> = bars.iter().map(|b| cylinder_label(b.cylinders)).collect();
        let max_count = bars.iter().map(|b| b.count).max().unwrap_or(0) as f64;

        Plot::new("cylinder_count_bars")
            .height(height)
            .allow_scroll(false)
            .allow_drag(false)
            .x_axis_label("Number of Cylinders")
            .y_axis_label("Vehicle Count")
            .include_y(0.0)
            .include_y(max_count * 1.1)
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if (mark.value - idx).abs() > f64::EPSILON || idx < 0.0 {
                    return String::new();
                }
                x_labels.get(idx as usize).cloned().unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                let chart_bars: Vec<Bar> = bars
                    .iter()
                    .enumerate()
                    .map(|(i, b)| {
                        Bar::new(i as f64, b.count as f64)
                            .width(0.7)
                            .name(format!("{} cylinders", cylinder_label(b.cylinders)))
                            .fill(BAR_COLOR)
                    })
                    .collect();

                plot_ui.bar_chart(BarChart::new(chart_bars).color(BAR_COLOR).name("Count"));

                for (x, y, label) in bar_count_labels(bars) {
                    plot_ui.text(
                        Text::new(PlotPoint::new(x, y), label)
                            .anchor(Align2::CENTER_BOTTOM)
                            .color(Color32::DARK_GRAY),
                    );
                }
            });
    }
}
