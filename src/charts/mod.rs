//! Charts module - Chart rendering

mod plotter;
mod renderer;

pub use plotter::{ChartPlotter, BAR_TITLE, SCATTER_TITLE};
pub use renderer::{ChartSelection, RenderError, StaticChartRenderer};
