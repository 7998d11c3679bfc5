//! Charts module - chart specs and their renderers
//!
//! `ChartSpec` is always available. Drawing needs the `charts` feature:
//! egui_plot for the desktop popup, plotters for the dashboard SVG.

#[cfg(feature = "charts")]
mod plotter;
mod spec;
#[cfg(feature = "charts")]
mod svg;

#[cfg(feature = "charts")]
pub use plotter::ChartPlotter;
pub use spec::{category_totals, ChartKind, ChartSpec};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Charting is not available in this build")]
    Unavailable,
    #[error("No data to chart")]
    NoData,
    #[error("Failed to render chart: {0}")]
    Render(String),
}

/// Whether this build can draw charts.
pub fn charts_available() -> bool {
    cfg!(feature = "charts")
}

/// Render a chart as an SVG document.
#[cfg(feature = "charts")]
pub fn render_svg(spec: &ChartSpec, width: u32, height: u32) -> Result<String, ChartError> {
    svg::SvgRenderer::render(spec, width, height)
}

#[cfg(not(feature = "charts"))]
pub fn render_svg(_spec: &ChartSpec, _width: u32, _height: u32) -> Result<String, ChartError> {
    Err(ChartError::Unavailable)
}
