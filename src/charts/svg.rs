//! SVG Chart Renderer
//! Renders bar and line charts to an SVG string with plotters.

use crate::charts::{ChartError, ChartKind, ChartSpec};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::fmt::Display;

const BAR_COLOR: RGBColor = RGBColor(52, 152, 219);

/// Most category labels drawn on the x axis.
const MAX_X_LABELS: usize = 12;

pub struct SvgRenderer;

impl SvgRenderer {
    /// Pie specs are drawn as bars; SVG output only serves the dashboard.
    pub fn render(spec: &ChartSpec, width: u32, height: u32) -> Result<String, ChartError> {
        if spec.is_empty() {
            return Err(ChartError::NoData);
        }

        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, (width, height)).into_drawing_area();
            root.fill(&WHITE).map_err(render_error)?;
            match spec.kind {
                ChartKind::Line => Self::draw_line(&root, spec)?,
                ChartKind::Bar | ChartKind::Pie => Self::draw_bars(&root, spec)?,
            }
            root.present().map_err(render_error)?;
        }
        Ok(svg)
    }

    fn draw_bars<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        spec: &ChartSpec,
    ) -> Result<(), ChartError> {
        let labels = spec.labels();
        let (y_min, y_max) = value_range(spec);

        let mut chart = ChartBuilder::on(root)
            .caption(&spec.title, ("sans-serif", 20))
            .margin(16)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d((0..labels.len()).into_segmented(), y_min..y_max)
            .map_err(render_error)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(labels.len().min(MAX_X_LABELS))
            .x_label_formatter(&|v| match v {
                SegmentValue::CenterOf(i) => label_at(&labels, *i),
                _ => String::new(),
            })
            .draw()
            .map_err(render_error)?;

        chart
            .draw_series(
                Histogram::vertical(&chart)
                    .style(BAR_COLOR.filled())
                    .margin(6)
                    .data(spec.points.iter().enumerate().map(|(i, (_, v))| (i, *v))),
            )
            .map_err(render_error)?;
        Ok(())
    }

    fn draw_line<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        spec: &ChartSpec,
    ) -> Result<(), ChartError> {
        let labels = spec.labels();
        let (y_min, y_max) = value_range(spec);
        let x_max = labels.len().saturating_sub(1).max(1);

        let mut chart = ChartBuilder::on(root)
            .caption(&spec.title, ("sans-serif", 20))
            .margin(16)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(0..x_max, y_min..y_max)
            .map_err(render_error)?;

        chart
            .configure_mesh()
            .x_labels(labels.len().min(MAX_X_LABELS))
            .x_label_formatter(&|i: &usize| label_at(&labels, *i))
            .draw()
            .map_err(render_error)?;

        let coords: Vec<(usize, f64)> = spec
            .points
            .iter()
            .enumerate()
            .map(|(i, (_, v))| (i, *v))
            .collect();
        chart
            .draw_series(LineSeries::new(coords.iter().copied(), BAR_COLOR.stroke_width(2)))
            .map_err(render_error)?;
        chart
            .draw_series(
                coords
                    .iter()
                    .map(|&(x, y)| Circle::new((x, y), 3, BAR_COLOR.filled())),
            )
            .map_err(render_error)?;
        Ok(())
    }
}

fn label_at(labels: &[&str], index: usize) -> String {
    labels.get(index).map(|s| s.to_string()).unwrap_or_default()
}

fn render_error(e: impl Display) -> ChartError {
    ChartError::Render(e.to_string())
}

/// Y axis range that always includes zero and is never empty.
fn value_range(spec: &ChartSpec) -> (f64, f64) {
    let min = spec.points.iter().map(|(_, v)| *v).fold(0.0, f64::min);
    let max = spec.points.iter().map(|(_, v)| *v).fold(0.0, f64::max);
    let pad = (max - min).abs() * 0.1;
    let (lo, hi) = (if min < 0.0 { min - pad } else { 0.0 }, max + pad);
    if hi > lo {
        (lo, hi)
    } else {
        (lo, lo + 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(kind: ChartKind) -> ChartSpec {
        ChartSpec::new(
            kind,
            "Sales",
            vec![("2024-01-01".into(), 10.0), ("2024-01-02".into(), 25.0)],
        )
    }

    #[test]
    fn test_bar_svg() {
        let svg = SvgRenderer::render(&spec(ChartKind::Bar), 640, 360).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Sales"));
    }

    #[test]
    fn test_line_svg() {
        let svg = SvgRenderer::render(&spec(ChartKind::Line), 640, 360).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("2024-01-02"));
    }

    #[test]
    fn test_empty_spec_is_no_data() {
        let empty = ChartSpec::new(ChartKind::Bar, "x", Vec::new());
        assert!(matches!(
            SvgRenderer::render(&empty, 100, 100),
            Err(ChartError::NoData)
        ));
    }

    #[test]
    fn test_value_range() {
        let flat = ChartSpec::new(ChartKind::Bar, "", vec![("a".into(), 0.0)]);
        assert_eq!(value_range(&flat), (0.0, 1.0));
        let (lo, hi) = value_range(&spec(ChartKind::Bar));
        assert_eq!(lo, 0.0);
        assert!(hi > 25.0);
    }
}
