//! Data Exporter Module
//! Writes a `Table` to CSV (always available) or spreadsheet (needs the engine).

use crate::data::table::Table;
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Could not save file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to write CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Failed to write spreadsheet: {0}")]
    SpreadsheetError(String),
    #[error("Spreadsheet engine is not available in this build; export as .csv instead")]
    EngineUnavailable,
}

/// Serializes tables; files are overwritten in place.
pub struct DataExporter;

impl DataExporter {
    /// Export by extension: `.csv` as CSV, anything else as a spreadsheet.
    pub fn export_path(table: &Table, path: &Path) -> Result<(), ExportError> {
        let is_csv = path
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
        if is_csv {
            Self::write_csv(table, path)
        } else {
            Self::write_spreadsheet(table, path)
        }
    }

    /// Write the table as CSV with a header row.
    pub fn write_csv(table: &Table, path: &Path) -> Result<(), ExportError> {
        let mut df = Self::to_dataframe(table)?;
        let mut file = File::create(path)?;
        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(&mut df)?;
        info!("Exported {} rows to {}", table.height(), path.display());
        Ok(())
    }

    /// CSV text of the table, for downloads.
    pub fn csv_bytes(table: &Table) -> Result<Vec<u8>, ExportError> {
        let mut df = Self::to_dataframe(table)?;
        let mut buf = Vec::new();
        CsvWriter::new(&mut buf)
            .include_header(true)
            .finish(&mut df)?;
        Ok(buf)
    }

    #[cfg(feature = "spreadsheet")]
    pub fn write_spreadsheet(table: &Table, path: &Path) -> Result<(), ExportError> {
        crate::data::spreadsheet::write_workbook(table, path)?;
        info!("Exported {} rows to {}", table.height(), path.display());
        Ok(())
    }

    #[cfg(not(feature = "spreadsheet"))]
    pub fn write_spreadsheet(_table: &Table, _path: &Path) -> Result<(), ExportError> {
        Err(ExportError::EngineUnavailable)
    }

    /// Default export name: `cleaned_<source file name>`.
    pub fn cleaned_file_name(source: Option<&Path>) -> String {
        let base = source
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "data.xlsx".to_string());
        format!("cleaned_{}", base)
    }

    /// Every column becomes a string column; missing cells are nulls (empty fields).
    fn to_dataframe(table: &Table) -> Result<DataFrame, PolarsError> {
        let columns = table
            .columns()
            .iter()
            .map(|col| {
                let values: Vec<Option<String>> = col
                    .cells()
                    .iter()
                    .map(|c| (!c.is_missing()).then(|| c.to_string()))
                    .collect();
                Column::new(col.name().into(), values)
            })
            .collect();
        DataFrame::new(columns)
    }
}
