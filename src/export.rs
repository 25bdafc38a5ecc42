//! Export Module
//! Saves the current dashboard summaries as JSON or as a PNG image.

use crate::charts::{ChartSelection, RenderError, StaticChartRenderer};
use crate::stats::DashboardSummary;
use std::path::Path;
use thiserror::Error;

pub const PNG_WIDTH: u32 = 1600;
pub const PNG_HEIGHT: u32 = 700;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}

/// Write both summaries as pretty-printed JSON.
pub fn export_summary_json(summary: &DashboardSummary, path: &Path) -> Result<(), ExportError> {
    let json = serde_json::to_string_pretty(summary)?;
    std::fs::write(path, json)?;
    log::info!(
        "Exported {} year points and {} cylinder bars to {}",
        summary.year_points.len(),
        summary.cylinder_bars.len(),
        path.display()
    );
    Ok(())
}

/// Render the selected charts to a PNG file.
pub fn export_charts_png(
    summary: &DashboardSummary,
    selection: ChartSelection,
    path: &Path,
) -> Result<(), ExportError> {
    let width = if selection.count() > 1 {
        PNG_WIDTH
    } else {
        PNG_WIDTH / 2
    };
    StaticChartRenderer::render_png(summary, selection, path, width, PNG_HEIGHT)?;
    Ok(())
}
