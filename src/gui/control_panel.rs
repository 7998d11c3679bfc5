//! Control Panel Widget
//! Left side panel of the cleaner window: source file, cleaning buttons and status.

use egui::{Color32, RichText};

/// Left side control panel with file selection and cleaning controls.
pub struct ControlPanel {
    pub file_label: String,
    pub status: String,
    pub has_table: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            file_label: "No file loaded".to_string(),
            status: "Ready".to_string(),
            has_table: false,
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🧹 Excel Data Cleaner")
                    .size(20.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Source File Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(&self.file_label).size(12.0).color(
                        if self.has_table {
                            Color32::WHITE
                        } else {
                            Color32::GRAY
                        },
                    ));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Load Excel/CSV").clicked() {
                            action = ControlPanelAction::Load;
                        }
                    });
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Cleaning Section =====
        ui.label(RichText::new("🔧 Cleaning").size(14.0).strong());
        ui.add_space(8.0);

        let size = egui::vec2(260.0, 28.0);
        ui.vertical_centered(|ui| {
            if ui
                .add(egui::Button::new("Auto Clean (strip, drop empty, parse dates)").min_size(size))
                .clicked()
            {
                action = ControlPanelAction::AutoClean;
            }
            ui.add_space(5.0);
            if ui
                .add(egui::Button::new("Fill Missing (numeric mean)").min_size(size))
                .clicked()
            {
                action = ControlPanelAction::FillMean;
            }
            ui.add_space(5.0);
            if ui
                .add(egui::Button::new("Drop Duplicates").min_size(size))
                .clicked()
            {
                action = ControlPanelAction::DropDuplicates;
            }
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Export =====
        ui.vertical_centered(|ui| {
            let button = egui::Button::new(RichText::new("💾 Export Cleaned").size(15.0))
                .min_size(egui::vec2(200.0, 35.0));
            if ui.add(button).clicked() {
                action = ControlPanelAction::Export;
            }
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Status =====
        ui.label(RichText::new("📊 Status").size(14.0).strong());
        ui.add_space(5.0);

        let status_color = if self.status.starts_with("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.starts_with("Saved") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlPanelAction {
    None,
    Load,
    AutoClean,
    FillMean,
    DropDuplicates,
    Export,
}
