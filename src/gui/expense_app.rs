//! Expense Tracker Main Application
//! Entry form and actions on the left, searchable sortable table on the right.

use crate::charts::charts_available;
use crate::expenses::{BookError, ExpenseBook, ExpenseColumn, FormError};
use crate::gui::{CategoryEditor, ChartViewer, Notice};
use egui::{ComboBox, Grid, RichText, ScrollArea, SidePanel};
use tracing::error;

/// Form fields as typed.
struct ExpenseForm {
    date: String,
    category: String,
    amount: String,
    note: String,
}

impl ExpenseForm {
    fn new(category: Option<&str>) -> Self {
        Self {
            date: chrono::Local::now().format("%Y-%m-%d").to_string(),
            category: category.unwrap_or_default().to_string(),
            amount: String::new(),
            note: String::new(),
        }
    }
}

/// Main expense tracker window.
pub struct ExpenseApp {
    book: ExpenseBook,
    form: ExpenseForm,
    query: String,
    category_editor: CategoryEditor,
    chart_viewer: ChartViewer,
}

impl ExpenseApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, book: ExpenseBook) -> Self {
        let form = ExpenseForm::new(book.categories().first());
        Self {
            book,
            form,
            query: String::new(),
            category_editor: CategoryEditor::new(),
            chart_viewer: ChartViewer::new(),
        }
    }

    fn handle_add(&mut self) {
        let result = self.book.add(
            &self.form.date,
            &self.form.category,
            &self.form.amount,
            &self.form.note,
        );
        match result {
            Ok(_) => {
                self.form.amount.clear();
                self.form.note.clear();
                Notice::info("Added", "Expense added successfully.");
            }
            Err(BookError::Form(e @ FormError::MissingFields)) => {
                Notice::warning("Missing", &e.to_string())
            }
            Err(BookError::Form(e @ FormError::AmountNotNumeric)) => {
                Notice::error("Invalid", &e.to_string())
            }
            Err(e) => {
                error!("Add failed: {}", e);
                Notice::error("Error", &format!("Couldn't add expense: {}", e));
            }
        }
    }

    fn handle_backup(&mut self) {
        match self.book.backup() {
            Some(path) => Notice::info("Backup", &format!("Backup created:\n{}", path.display())),
            None => Notice::error("Backup", "Backup failed. See log."),
        }
    }

    fn handle_import(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV files", &["csv"])
            .add_filter("All files", &["*"])
            .pick_file()
        else {
            return;
        };

        match self.book.import(&path) {
            Ok(count) => Notice::info(
                "Import",
                &format!("CSV imported successfully ({} rows).", count),
            ),
            Err(e) => {
                error!("Import failed for {}: {}", path.display(), e);
                Notice::error("Import", "Import failed. See log.");
            }
        }
    }

    fn handle_export(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV files", &["csv"])
            .set_file_name("expenses_export.csv")
            .save_file()
        else {
            return;
        };

        match self.book.export(&path) {
            Ok(_) => Notice::info("Exported", &format!("Exported to {}", path.display())),
            Err(e) => {
                error!("Export failed for {}: {}", path.display(), e);
                Notice::error("Export failed", &e.to_string());
            }
        }
    }

    fn handle_summary(&mut self) {
        match self.book.summary_chart() {
            Ok(chart) => self.chart_viewer.open(chart),
            Err(BookError::ChartsUnavailable) => Notice::info(
                "Not available",
                "Charts are disabled because this build has no chart support.",
            ),
            Err(e) => Notice::info("No data", &e.to_string()),
        }
    }

    fn handle_save_categories(&mut self, categories: Vec<String>) {
        match self.book.save_categories(categories) {
            Ok(()) => {
                self.category_editor.close();
                if let Some(first) = self.book.categories().first() {
                    self.form.category = first.to_string();
                }
            }
            Err(e) => Notice::error("Save failed", &e.to_string()),
        }
    }

    /// Entry form and action buttons.
    fn show_form(&mut self, ui: &mut egui::Ui) {
        ui.label(RichText::new("💰 Expense Tracker").size(20.0).strong());
        ui.add_space(10.0);

        let width = 180.0;
        ui.label("Date (YYYY-MM-DD)");
        ui.add(egui::TextEdit::singleline(&mut self.form.date).desired_width(width));

        ui.add_space(6.0);
        ui.label("Category");
        ComboBox::from_id_salt("category")
            .width(width)
            .selected_text(&self.form.category)
            .show_ui(ui, |ui| {
                for label in &self.book.categories().categories {
                    ui.selectable_value(&mut self.form.category, label.clone(), label);
                }
            });

        ui.add_space(6.0);
        ui.label("Amount");
        ui.add(egui::TextEdit::singleline(&mut self.form.amount).desired_width(width));

        ui.add_space(6.0);
        ui.label("Note");
        ui.add(egui::TextEdit::singleline(&mut self.form.note).desired_width(width));

        ui.add_space(12.0);
        let size = egui::vec2(width, 26.0);
        if ui.add(egui::Button::new("Add Expense").min_size(size)).clicked() {
            self.handle_add();
        }
        ui.add_space(4.0);
        if ui.add(egui::Button::new("Backup Data").min_size(size)).clicked() {
            self.handle_backup();
        }
        ui.add_space(4.0);
        if ui.add(egui::Button::new("Import CSV").min_size(size)).clicked() {
            self.handle_import();
        }
        ui.add_space(4.0);
        if ui.add(egui::Button::new("Export CSV").min_size(size)).clicked() {
            self.handle_export();
        }
        ui.add_space(6.0);

        let chart_label = if charts_available() {
            "Show Summary Chart"
        } else {
            "Chart (not available)"
        };
        let chart_button = egui::Button::new(chart_label).min_size(size);
        if ui.add_enabled(charts_available(), chart_button).clicked() {
            self.handle_summary();
        }

        ui.add_space(10.0);
        ui.separator();
        ui.label("Settings:");
        if ui.add(egui::Button::new("Edit Categories").min_size(size)).clicked() {
            self.category_editor.open(self.book.categories());
        }
    }

    /// Search bar and the expense table.
    fn show_table(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Search");
            let response = ui.add(egui::TextEdit::singleline(&mut self.query).desired_width(220.0));
            let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if ui.button("Go").clicked() || submitted {
                self.book.search(&self.query);
            }
            if ui.button("Clear").clicked() {
                self.query.clear();
                self.book.clear_search();
            }
        });
        ui.add_space(6.0);

        let sort = self.book.sort_state();
        let mut clicked = None;
        ScrollArea::vertical().show(ui, |ui| {
            Grid::new("expenses")
                .striped(true)
                .min_col_width(120.0)
                .show(ui, |ui| {
                    for column in ExpenseColumn::ALL {
                        let arrow = match sort {
                            Some(s) if s.column == column && s.descending => " ▼",
                            Some(s) if s.column == column => " ▲",
                            _ => "",
                        };
                        let heading = RichText::new(format!("{}{}", column.title(), arrow)).strong();
                        if ui.button(heading).clicked() {
                            clicked = Some(column);
                        }
                    }
                    ui.end_row();

                    for row in self.book.rows() {
                        for value in row {
                            ui.label(value);
                        }
                        ui.end_row();
                    }
                });
        });

        if let Some(column) = clicked {
            self.book.sort_by(column);
        }
    }
}

impl eframe::App for ExpenseApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        SidePanel::left("expense_form")
            .min_width(220.0)
            .max_width(260.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    self.show_form(ui);
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_table(ui);
        });

        if let Some(categories) = self.category_editor.show(ctx) {
            self.handle_save_categories(categories);
        }
        if self.chart_viewer.is_open() {
            self.chart_viewer.show(ctx);
        }
    }
}
