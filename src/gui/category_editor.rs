//! Category Editor Window
//! Edits a working copy of the category list; nothing is persisted until Save.

use crate::expenses::CategoryConfig;
use egui::{RichText, ScrollArea};

#[derive(Default)]
pub struct CategoryEditor {
    open: bool,
    draft: CategoryConfig,
    entry: String,
    selected: Option<usize>,
}

impl CategoryEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the editor on a copy of `current`.
    pub fn open(&mut self, current: &CategoryConfig) {
        self.open = true;
        self.draft = current.clone();
        self.entry.clear();
        self.selected = None;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Draw the window. Returns the edited list when Save was clicked.
    pub fn show(&mut self, ctx: &egui::Context) -> Option<Vec<String>> {
        if !self.open {
            return None;
        }

        let mut save = None;
        let mut open = true;
        egui::Window::new("Edit Categories")
            .open(&mut open)
            .default_size([300.0, 300.0])
            .collapsible(false)
            .show(ctx, |ui| {
                egui::Frame::none()
                    .fill(ui.visuals().widgets.noninteractive.bg_fill)
                    .rounding(5.0)
                    .inner_margin(5.0)
                    .show(ui, |ui| {
                        ScrollArea::vertical().max_height(180.0).show(ui, |ui| {
                            for (idx, label) in self.draft.categories.iter().enumerate() {
                                if ui
                                    .selectable_label(self.selected == Some(idx), label)
                                    .clicked()
                                {
                                    self.selected = Some(idx);
                                }
                            }
                            if self.draft.categories.is_empty() {
                                ui.label(RichText::new("(empty)").italics());
                            }
                        });
                    });

                ui.add_space(6.0);
                ui.text_edit_singleline(&mut self.entry);
                ui.add_space(6.0);

                ui.horizontal(|ui| {
                    if ui.button("Add").clicked() && self.draft.add(&self.entry) {
                        self.entry.clear();
                    }
                    if ui.button("Remove").clicked() {
                        if let Some(idx) = self.selected.take() {
                            self.draft.remove(idx);
                        }
                    }
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Save").clicked() {
                            save = Some(self.draft.categories.clone());
                        }
                    });
                });
            });

        if !open {
            self.open = false;
        }
        save
    }
}
