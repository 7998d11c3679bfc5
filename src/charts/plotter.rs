//! Chart Plotter Module
//! Draws a `ChartSpec` inside an egui window using egui_plot.

use crate::charts::{ChartKind, ChartSpec};
use egui::{Color32, RichText};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoints, Points, Polygon};
use std::f64::consts::TAU;
use std::ops::RangeInclusive;

pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(52, 152, 219), // Blue
    Color32::from_rgb(231, 76, 60),  // Red
    Color32::from_rgb(46, 204, 113), // Green
    Color32::from_rgb(155, 89, 182), // Purple
    Color32::from_rgb(243, 156, 18), // Orange
    Color32::from_rgb(26, 188, 156), // Teal
    Color32::from_rgb(233, 30, 99),  // Pink
    Color32::from_rgb(0, 188, 212),  // Cyan
    Color32::from_rgb(121, 85, 72),  // Brown
    Color32::from_rgb(96, 125, 139), // Blue Grey
];

/// Segments used to approximate a full circle.
const PIE_SEGMENTS: usize = 96;

/// Draws chart specs with egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn color(index: usize) -> Color32 {
        PALETTE[index % PALETTE.len()]
    }

    /// Draw the chart with a title line above it.
    pub fn draw(ui: &mut egui::Ui, spec: &ChartSpec, height: f32) {
        ui.label(RichText::new(&spec.title).size(16.0).strong());
        ui.add_space(6.0);

        if spec.is_empty() {
            ui.label(RichText::new("No data").color(Color32::GRAY));
            return;
        }

        match spec.kind {
            ChartKind::Pie => Self::draw_pie(ui, spec, height),
            ChartKind::Bar => Self::draw_bar(ui, spec, height),
            ChartKind::Line => Self::draw_line(ui, spec, height),
        }
    }

    /// Category labels on integer x positions.
    fn label_formatter(spec: &ChartSpec) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
        let labels: Vec<String> = spec.points.iter().map(|(l, _)| l.clone()).collect();
        move |mark, _range| {
            let idx = mark.value.round();
            if idx >= 0.0 && (idx - mark.value).abs() < 1e-6 {
                labels.get(idx as usize).cloned().unwrap_or_default()
            } else {
                String::new()
            }
        }
    }

    fn draw_bar(ui: &mut egui::Ui, spec: &ChartSpec, height: f32) {
        let bars: Vec<Bar> = spec
            .points
            .iter()
            .enumerate()
            .map(|(i, (label, value))| {
                Bar::new(i as f64, *value)
                    .width(0.6)
                    .name(label)
                    .fill(Self::color(0))
            })
            .collect();

        Plot::new(format!("bar_{}", spec.title))
            .height(height)
            .allow_scroll(false)
            .x_axis_formatter(Self::label_formatter(spec))
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).color(Self::color(0)));
            });
    }

    fn draw_line(ui: &mut egui::Ui, spec: &ChartSpec, height: f32) {
        let coords: Vec<[f64; 2]> = spec
            .points
            .iter()
            .enumerate()
            .map(|(i, (_, value))| [i as f64, *value])
            .collect();

        Plot::new(format!("line_{}", spec.title))
            .height(height)
            .allow_scroll(false)
            .x_axis_formatter(Self::label_formatter(spec))
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(PlotPoints::from_iter(coords.iter().copied()))
                        .color(Self::color(0))
                        .width(2.0),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from_iter(coords.iter().copied()))
                        .radius(3.0)
                        .color(Self::color(0)),
                );
            });
    }

    /// Pie slices as filled polygons, one legend entry per slice.
    fn draw_pie(ui: &mut egui::Ui, spec: &ChartSpec, height: f32) {
        let slices = Self::pie_slices(spec);

        Plot::new(format!("pie_{}", spec.title))
            .height(height)
            .data_aspect(1.0)
            .show_axes(false)
            .show_grid(false)
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .legend(Legend::default())
            .show(ui, |plot_ui| {
                for (i, (name, outline)) in slices.into_iter().enumerate() {
                    plot_ui.polygon(
                        Polygon::new(PlotPoints::new(outline))
                            .fill_color(Self::color(i).gamma_multiply(0.8))
                            .stroke(egui::Stroke::new(1.0, Color32::WHITE))
                            .name(name),
                    );
                }
            });
    }

    /// Outline of each slice on the unit circle, labelled with its share.
    pub fn pie_slices(spec: &ChartSpec) -> Vec<(String, Vec<[f64; 2]>)> {
        let total: f64 = spec.points.iter().map(|(_, v)| v.max(0.0)).sum();
        if total <= 0.0 {
            return Vec::new();
        }

        let mut start = 0.0;
        spec.points
            .iter()
            .filter(|(_, v)| *v > 0.0)
            .map(|(label, value)| {
                let share = value / total;
                let sweep = share * TAU;
                let steps = ((share * PIE_SEGMENTS as f64).ceil() as usize).max(1);
                let mut outline = vec![[0.0, 0.0]];
                for step in 0..=steps {
                    // Clockwise from 12 o'clock
                    let angle = start + sweep * step as f64 / steps as f64;
                    outline.push([angle.sin(), angle.cos()]);
                }
                start += sweep;
                (format!("{} ({:.1}%)", label, share * 100.0), outline)
            })
            .collect()
    }
}
