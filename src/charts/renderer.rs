//! Static Chart Renderer
//! Draws the dashboard charts into a PNG file with plotters.
//!
//! Layout: the enabled charts side by side, scatter on the left and the
//! cylinder bars on the right. Counts are printed above each bar.

use super::plotter::{cylinder_label, BAR_TITLE, SCATTER_TITLE};
use crate::stats::{CylinderCountBar, DashboardSummary, YearFrequencyPoint};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::ops::Range;
use std::path::Path;
use thiserror::Error;

const SCATTER_RGB: RGBColor = RGBColor(99, 110, 250);
const BAR_RGB: RGBColor = RGBColor(255, 165, 0);
const FONT: &str = "sans-serif";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("No charts selected for rendering")]
    NothingToRender,
    #[error("Chart drawing failed: {0}")]
    Draw(String),
}

/// Which charts to include in a rendered image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartSelection {
    pub scatter: bool,
    pub bar: bool,
}

impl ChartSelection {
    pub fn count(&self) -> usize {
        usize::from(self.scatter) + usize::from(self.bar)
    }
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render the selected charts to a PNG file.
    pub fn render_png(
        summary: &DashboardSummary,
        selection: ChartSelection,
        path: &Path,
        width: u32,
        height: u32,
    ) -> Result<(), RenderError> {
        let panels = selection.count();
        if panels == 0 {
            return Err(RenderError::NothingToRender);
        }

        let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let areas = root.split_evenly((1, panels));
        let mut areas = areas.iter();

        if selection.scatter {
            if let Some(area) = areas.next() {
                Self::draw_scatter(area, &summary.year_points)?;
            }
        }
        if selection.bar {
            if let Some(area) = areas.next() {
                Self::draw_bars(area, &summary.cylinder_bars)?;
            }
        }

        root.present().map_err(draw_err)?;
        log::info!("Rendered {} chart(s) to {}", panels, path.display());
        Ok(())
    }

    fn draw_scatter<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        points: &[YearFrequencyPoint],
    ) -> Result<(), RenderError> {
        let (x_range, y_range) = scatter_ranges(points);

        let mut chart = ChartBuilder::on(area)
            .caption(SCATTER_TITLE, (FONT, 22))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x_range, y_range)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .x_desc("Model Year")
            .y_desc("Frequency")
            .x_label_formatter(&|x| format!("{:.0}", x))
            .draw()
            .map_err(draw_err)?;

        chart
            .draw_series(points.iter().map(|p| {
                Circle::new(
                    (p.jittered_year, p.frequency as f64),
                    4,
                    SCATTER_RGB.mix(0.7).filled(),
                )
            }))
            .map_err(draw_err)?;

        Ok(())
    }

    fn draw_bars<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        bars: &[CylinderCountBar],
    ) -> Result<(), RenderError> {
        let (x_range, y_range) = bar_ranges(bars);
        let labels: Vec<String> = bars.iter().map(|b| cylinder_label(b.cylinders)).collect();

        let mut chart = ChartBuilder::on(area)
            .caption(BAR_TITLE, (FONT, 22))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x_range, y_range)
            .map_err(draw_err)?;

        let label_for = |x: &f64| -> String {
            let idx = x.round();
            if (x - idx).abs() > 1e-6 || idx < 0.0 {
                return String::new();
            }
            labels.get(idx as usize).cloned().unwrap_or_default()
        };

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(bars.len().max(1))
            .x_desc("Number of Cylinders")
            .y_desc("Vehicle Count")
            .x_label_formatter(&label_for)
            .draw()
            .map_err(draw_err)?;

        chart
            .draw_series(bars.iter().enumerate().map(|(i, b)| {
                let x = i as f64;
                Rectangle::new([(x - 0.35, 0.0), (x + 0.35, b.count as f64)], BAR_RGB.filled())
            }))
            .map_err(draw_err)?;

        chart
            .draw_series(bars.iter().enumerate().map(|(i, b)| {
                Text::new(
                    b.count.to_string(),
                    (i as f64 - 0.1, b.count as f64),
                    (FONT, 14).into_font(),
                )
            }))
            .map_err(draw_err)?;

        Ok(())
    }
}

fn draw_err<E: std::error::Error + Send + Sync>(err: DrawingAreaErrorKind<E>) -> RenderError {
    RenderError::Draw(err.to_string())
}

/// Axis ranges for the scatter chart, padded around the data.
fn scatter_ranges(points: &[YearFrequencyPoint]) -> (Range<f64>, Range<f64>) {
    if points.is_empty() {
        return (0.0..1.0, 0.0..1.0);
    }

    let x_min = points
        .iter()
        .map(|p| p.jittered_year)
        .fold(f64::INFINITY, f64::min);
    let x_max = points
        .iter()
        .map(|p| p.jittered_year)
        .fold(f64::NEG_INFINITY, f64::max);
    let y_max = points.iter().map(|p| p.frequency).max().unwrap_or(0) as f64;

    ((x_min - 1.0)..(x_max + 1.0), 0.0..(y_max * 1.1).max(1.0))
}

/// Axis ranges for the bar chart; one slot per bar plus headroom for labels.
fn bar_ranges(bars: &[CylinderCountBar]) -> (Range<f64>, Range<f64>) {
    let y_max = bars.iter().map(|b| b.count).max().unwrap_or(0) as f64;
    (
        -0.5..(bars.len().max(1) as f64 - 0.5),
        0.0..(y_max * 1.15).max(1.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_count() {
        let both = ChartSelection {
            scatter: true,
            bar: true,
        };
        let none = ChartSelection {
            scatter: false,
            bar: false,
        };
        assert_eq!(both.count(), 2);
        assert_eq!(none.count(), 0);
    }

    #[test]
    fn test_nothing_to_render() {
        let dir = tempfile::tempdir().unwrap();
        let err = StaticChartRenderer::render_png(
            &DashboardSummary::default(),
            ChartSelection {
                scatter: false,
                bar: false,
            },
            &dir.path().join("charts.png"),
            800,
            600,
        )
        .unwrap_err();
        assert!(matches!(err, RenderError::NothingToRender));
    }

    #[test]
    fn test_scatter_ranges_pad_data() {
        let points = vec![
            YearFrequencyPoint {
                model_year: 2005.0,
                jittered_year: 2005.2,
                frequency: 10,
            },
            YearFrequencyPoint {
                model_year: 2015.0,
                jittered_year: 2014.9,
                frequency: 40,
            },
        ];
        let (x, y) = scatter_ranges(&points);
        assert!(x.start < 2005.2 && x.end > 2014.9);
        assert_eq!(y.start, 0.0);
        assert!(y.end > 40.0);
    }

    #[test]
    fn test_empty_ranges_are_valid() {
        let (x, y) = scatter_ranges(&[]);
        assert!(x.start < x.end && y.start < y.end);
        let (x, y) = bar_ranges(&[]);
        assert!(x.start < x.end && y.start < y.end);
    }

    #[test]
    fn test_bar_ranges_one_slot_per_bar() {
        let bars = vec![
            CylinderCountBar {
                cylinders: 8.0,
                count: 12,
            },
            CylinderCountBar {
                cylinders: 6.0,
                count: 9,
            },
            CylinderCountBar {
                cylinders: 4.0,
                count: 3,
            },
        ];
        let (x, y) = bar_ranges(&bars);
        assert_eq!(x, -0.5..2.5);
        assert!(y.end > 12.0);
    }
}
