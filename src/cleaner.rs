//! Cleaner Session
//! State and handlers behind the table cleaner window.

use crate::data::{
    DataExporter, DataLoader, DataProcessor, ExportError, LoadError, Table, TransformReport,
};
use crate::present::{text_preview, PREVIEW_ROWS};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info};

#[derive(Error, Debug)]
pub enum CleanerError {
    #[error("Please load a file first.")]
    NoTable,
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// The loaded table, its source file and the last status line.
///
/// A failed handler leaves the table as it was.
pub struct CleanerSession {
    table: Option<Table>,
    source: Option<PathBuf>,
    status: String,
}

impl Default for CleanerSession {
    fn default() -> Self {
        Self {
            table: None,
            source: None,
            status: "Ready".to_string(),
        }
    }
}

impl CleanerSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(&self) -> Option<&Table> {
        self.table.as_ref()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// File name of the loaded source, for the header label.
    pub fn file_label(&self) -> String {
        self.source
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "No file loaded".to_string())
    }

    pub fn preview(&self) -> String {
        match &self.table {
            Some(table) => text_preview(table, PREVIEW_ROWS),
            None => "No data".to_string(),
        }
    }

    /// Start a session on a table that did not come from a file.
    pub fn from_table(table: Table) -> Self {
        let mut session = Self::new();
        session.replace_table(table);
        session
    }

    /// Load a CSV or spreadsheet file, replacing the current table.
    pub fn load(&mut self, path: &Path) -> Result<(), CleanerError> {
        let table = DataLoader::load_path(path).inspect_err(|e| {
            error!("Load failed for {}: {}", path.display(), e);
        })?;
        self.replace_table(table);
        self.source = Some(path.to_path_buf());
        Ok(())
    }

    fn replace_table(&mut self, table: Table) {
        self.status = format!(
            "Loaded {} rows, {} columns",
            table.height(),
            table.width()
        );
        self.table = Some(table);
    }

    pub fn auto_clean(&mut self) -> Result<TransformReport, CleanerError> {
        self.apply(DataProcessor::auto_clean)
    }

    pub fn fill_numeric_mean(&mut self) -> Result<TransformReport, CleanerError> {
        self.apply(DataProcessor::fill_numeric_missing_with_mean)
    }

    pub fn drop_duplicates(&mut self) -> Result<TransformReport, CleanerError> {
        self.apply(DataProcessor::drop_duplicate_rows)
    }

    fn apply(
        &mut self,
        op: fn(&Table) -> (Table, TransformReport),
    ) -> Result<TransformReport, CleanerError> {
        let table = self.table.as_ref().ok_or(CleanerError::NoTable)?;
        let (cleaned, report) = op(table);
        info!("{}", report);
        self.status = report.to_string();
        self.table = Some(cleaned);
        Ok(report)
    }

    /// Suggested name for the export dialog.
    pub fn default_export_name(&self) -> String {
        DataExporter::cleaned_file_name(self.source.as_deref())
    }

    /// Write the current table; the format follows the extension.
    pub fn export(&mut self, path: &Path) -> Result<(), CleanerError> {
        let table = self.table.as_ref().ok_or(CleanerError::NoTable)?;
        DataExporter::export_path(table, path).inspect_err(|e| {
            error!("Export failed for {}: {}", path.display(), e);
        })?;
        self.status = format!("Saved cleaned file to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Cell, Column, ColumnKind};
    use std::fs;

    fn session_with(csv: &str) -> (CleanerSession, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.csv");
        fs::write(&path, csv).unwrap();
        let mut session = CleanerSession::new();
        session.load(&path).unwrap();
        (session, dir)
    }

    #[test]
    fn test_handlers_need_a_table() {
        let mut session = CleanerSession::new();
        assert!(matches!(session.auto_clean(), Err(CleanerError::NoTable)));
        assert_eq!(session.preview(), "No data");
        assert_eq!(session.file_label(), "No file loaded");
        assert_eq!(session.default_export_name(), "cleaned_data.xlsx");
    }

    #[test]
    fn test_load_sets_status_and_label() {
        let (session, _dir) = session_with("a,b\n1,2\n3,4\n");
        assert_eq!(session.status(), "Loaded 2 rows, 2 columns");
        assert_eq!(session.file_label(), "input.csv");
        assert_eq!(session.default_export_name(), "cleaned_input.csv");
    }

    #[test]
    fn test_failed_load_keeps_table() {
        let (mut session, _dir) = session_with("a\n1\n");
        assert!(session.load(Path::new("/missing/file.csv")).is_err());
        assert_eq!(session.table().unwrap().height(), 1);
        assert_eq!(session.status(), "Loaded 1 rows, 1 columns");
    }

    #[test]
    fn test_clean_then_export_csv() {
        let (mut session, dir) = session_with("name,when\n Ann ,2024-01-05\n Ann ,2024-01-05\n");
        let report = session.auto_clean().unwrap();
        assert_eq!(report.rows_after, 2);
        let report = session.drop_duplicates().unwrap();
        assert_eq!(session.status(), "Dropped duplicates: 1 rows removed");
        assert_eq!(report.rows_after, 1);

        let out = dir.path().join("cleaned.csv");
        session.export(&out).unwrap();
        let text = fs::read_to_string(&out).unwrap();
        assert_eq!(text, "name,when\nAnn,2024-01-05\n");
        assert_eq!(session.table().unwrap().cell(0, "name"), Some(&Cell::Text("Ann".into())));
    }

    fn with_empty_numbers() -> Table {
        Table::new(vec![
            Column::with_kind(
                "name",
                ColumnKind::Text,
                vec![Cell::Text("Ann".into()), Cell::Text("Bob".into())],
            ),
            Column::with_kind("score", ColumnKind::Number, vec![Cell::Missing, Cell::Missing]),
        ])
        .unwrap()
    }

    #[test]
    fn test_auto_clean_drops_empty_number_column() {
        let mut session = CleanerSession::from_table(with_empty_numbers());
        assert_eq!(session.status(), "Loaded 2 rows, 2 columns");
        let report = session.auto_clean().unwrap();
        assert_eq!(report.columns_changed, vec!["score".to_string()]);
        assert_eq!(session.table().unwrap().column_names(), vec!["name"]);
    }

    #[test]
    fn test_fill_mean_skips_empty_number_column() {
        let mut session = CleanerSession::from_table(with_empty_numbers());
        let report = session.fill_numeric_mean().unwrap();
        assert_eq!(report.columns_skipped, vec!["score".to_string()]);
        assert_eq!(report.cells_changed, 0);
        assert_eq!(
            session.status(),
            "Filled 0 missing values with column mean (skipped all-missing: score)"
        );
        let score = session.table().unwrap().column("score").unwrap();
        assert!(score.cells().iter().all(Cell::is_missing));
        assert_eq!(session.default_export_name(), "cleaned_data.xlsx");
    }
}
