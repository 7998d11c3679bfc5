//! Cleaner Main Application
//! Main window with control panel and table preview.

use crate::cleaner::{CleanerError, CleanerSession};
use crate::gui::{ControlPanel, ControlPanelAction, Notice};
use egui::{RichText, ScrollArea, SidePanel};
use tracing::warn;

/// Main cleaner window. All state lives in the session.
pub struct CleanerApp {
    session: CleanerSession,
    control_panel: ControlPanel,
    preview: String,
}

impl Default for CleanerApp {
    fn default() -> Self {
        let session = CleanerSession::new();
        let preview = session.preview();
        Self {
            session,
            control_panel: ControlPanel::new(),
            preview,
        }
    }
}

impl CleanerApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self::default()
    }

    /// Copy session state into the widgets after a handler ran.
    fn sync(&mut self) {
        self.control_panel.file_label = self.session.file_label();
        self.control_panel.status = self.session.status().to_string();
        self.control_panel.has_table = self.session.table().is_some();
        self.preview = self.session.preview();
    }

    fn handle_load(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Excel/CSV", &["xlsx", "xls", "xlsm", "ods", "csv"])
            .add_filter("All files", &["*"])
            .pick_file()
        else {
            return;
        };

        if let Err(e) = self.session.load(&path) {
            Notice::error("Error", &e.to_string());
        }
        self.sync();
    }

    fn handle_clean(&mut self, action: ControlPanelAction) {
        let result = match action {
            ControlPanelAction::AutoClean => self.session.auto_clean(),
            ControlPanelAction::FillMean => self.session.fill_numeric_mean(),
            ControlPanelAction::DropDuplicates => self.session.drop_duplicates(),
            _ => return,
        };
        if let Err(e) = result {
            Self::report(&e);
        }
        self.sync();
    }

    fn handle_export(&mut self) {
        if self.session.table().is_none() {
            Self::report(&CleanerError::NoTable);
            return;
        }

        let Some(path) = rfd::FileDialog::new()
            .add_filter("Excel", &["xlsx"])
            .add_filter("CSV", &["csv"])
            .set_file_name(self.session.default_export_name())
            .save_file()
        else {
            return;
        };

        match self.session.export(&path) {
            Ok(()) => Notice::info(
                "Exported",
                &format!("Cleaned file saved:\n{}", path.display()),
            ),
            Err(e) => Self::report(&e),
        }
        self.sync();
    }

    fn report(error: &CleanerError) {
        match error {
            CleanerError::NoTable => {
                warn!("Cleaning requested without a loaded table");
                Notice::warning("No file", &error.to_string());
            }
            _ => Notice::error("Error", &error.to_string()),
        }
    }
}

impl eframe::App for CleanerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(350.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    match self.control_panel.show(ui) {
                        ControlPanelAction::Load => self.handle_load(),
                        ControlPanelAction::Export => self.handle_export(),
                        ControlPanelAction::None => {}
                        action => self.handle_clean(action),
                    }
                });
            });

        // Central panel - Preview
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.label(RichText::new("Preview (first 10 rows)").size(14.0).strong());
            ui.add_space(6.0);
            ScrollArea::both().show(ui, |ui| {
                ui.label(RichText::new(&self.preview).monospace());
            });
        });
    }
}
