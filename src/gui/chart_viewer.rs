//! Chart Viewer Window
//! Floating window holding one chart, used for the expense summary popup.

use crate::charts::ChartSpec;
use egui::Vec2;

const WINDOW_SIZE: Vec2 = Vec2::new(620.0, 460.0);
const CHART_HEIGHT: f32 = 380.0;

/// A closable chart window. Nothing is drawn while no chart is set.
#[derive(Default)]
pub struct ChartViewer {
    chart: Option<ChartSpec>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, chart: ChartSpec) {
        self.chart = Some(chart);
    }

    pub fn is_open(&self) -> bool {
        self.chart.is_some()
    }

    pub fn show(&mut self, ctx: &egui::Context) {
        let Some(chart) = &self.chart else {
            return;
        };

        let mut open = true;
        egui::Window::new("Summary Chart")
            .open(&mut open)
            .default_size(WINDOW_SIZE)
            .collapsible(false)
            .show(ctx, |ui| {
                Self::draw(ui, chart);
            });

        if !open {
            self.chart = None;
        }
    }

    #[cfg(feature = "charts")]
    fn draw(ui: &mut egui::Ui, chart: &ChartSpec) {
        crate::charts::ChartPlotter::draw(ui, chart, CHART_HEIGHT);
    }

    #[cfg(not(feature = "charts"))]
    fn draw(ui: &mut egui::Ui, chart: &ChartSpec) {
        let _ = CHART_HEIGHT;
        ui.label(egui::RichText::new(&chart.title).size(16.0).strong());
        ui.label("Charts are disabled in this build.");
    }
}
