//! Data Loader Module
//! Handles CSV/spreadsheet loading into a `Table`, from disk or from an upload blob.

use crate::data::table::{unique_names, Column, Table, ValidationError};
use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;
use polars::prelude::*;
use regex::Regex;
use std::io::Cursor;
use std::path::Path;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::{debug, info, warn};

static DUPLICATED_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*)_duplicated_\d+$").expect("valid duplicated column pattern"));

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Could not read file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Invalid upload encoding: {0}")]
    Base64Error(#[from] base64::DecodeError),
    #[error("Malformed upload: expected '<content type>,<base64 payload>'")]
    MalformedUpload,
    #[error("Failed to read spreadsheet: {0}")]
    SpreadsheetError(String),
    #[error("Spreadsheet support is not available in this build")]
    SpreadsheetUnavailable,
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("No data found")]
    NoData,
}

/// On-disk table formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Spreadsheet,
}

impl FileFormat {
    /// Guess the format from the file extension; unknown extensions are read as CSV.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => FileFormat::Spreadsheet,
            _ => FileFormat::Csv,
        }
    }
}

/// Loads tables using Polars for CSV parsing.
pub struct DataLoader;

impl DataLoader {
    /// Load a CSV or spreadsheet file, choosing the reader by extension.
    pub fn load_path(path: &Path) -> Result<Table, LoadError> {
        let table = match FileFormat::from_path(path) {
            FileFormat::Csv => Self::load_csv(path)?,
            FileFormat::Spreadsheet => Self::load_spreadsheet(path)?,
        };
        info!(
            "Loaded {} ({} rows, {} columns)",
            path.display(),
            table.height(),
            table.width()
        );
        Ok(table)
    }

    /// Load a CSV file.
    pub fn load_csv(path: &Path) -> Result<Table, LoadError> {
        let bytes = std::fs::read(path)?;
        Self::load_csv_bytes(&bytes)
    }

    /// Parse CSV bytes, decoding as UTF-8 with a Latin-1 fallback.
    pub fn load_csv_bytes(bytes: &[u8]) -> Result<Table, LoadError> {
        let text = Self::decode_text(bytes);
        if text.trim().is_empty() {
            return Err(LoadError::NoData);
        }

        // Every column is read as text; kinds are inferred per column afterwards.
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .into_reader_with_file_handle(Cursor::new(text.into_bytes()))
            .finish()?;

        Self::table_from_dataframe(&df)
    }

    /// Decode an upload given as `"<content type>,<base64 payload>"` (a data URL).
    pub fn load_blob(contents: &str) -> Result<Table, LoadError> {
        let (content_type, payload) = contents
            .split_once(',')
            .ok_or(LoadError::MalformedUpload)?;
        debug!("Decoding upload of type '{}'", content_type);
        let bytes = B64.decode(payload.trim())?;
        Self::load_csv_bytes(&bytes)
    }

    /// UTF-8 first, Latin-1 when the bytes are not valid UTF-8.
    pub fn decode_text(bytes: &[u8]) -> String {
        match std::str::from_utf8(bytes) {
            Ok(text) => text.trim_start_matches('\u{feff}').to_string(),
            Err(_) => {
                warn!("Input is not valid UTF-8, decoding as Latin-1");
                bytes.iter().map(|&b| b as char).collect()
            }
        }
    }

    fn table_from_dataframe(df: &DataFrame) -> Result<Table, LoadError> {
        let names = header_names(df);
        let columns = df
            .get_columns()
            .iter()
            .zip(names)
            .map(|(col, name)| {
                let series = col.as_materialized_series().cast(&DataType::String)?;
                let raw: Vec<Option<&str>> = series.str()?.into_iter().collect();
                Ok(Column::from_raw(name, &raw))
            })
            .collect::<Result<Vec<Column>, PolarsError>>()?;

        Ok(Table::new(columns)?)
    }

    #[cfg(feature = "spreadsheet")]
    fn load_spreadsheet(path: &Path) -> Result<Table, LoadError> {
        crate::data::spreadsheet::read_first_sheet(path)
    }

    #[cfg(not(feature = "spreadsheet"))]
    fn load_spreadsheet(_path: &Path) -> Result<Table, LoadError> {
        Err(LoadError::SpreadsheetUnavailable)
    }
}

/// Column names as written in the header, repeats numbered `name.1`, `name.2`.
///
/// The CSV reader renames a repeated header to `name_duplicated_<n>`; that
/// suffix is undone before renumbering.
fn header_names(df: &DataFrame) -> Vec<String> {
    let mut seen: Vec<&str> = Vec::new();
    let written: Vec<String> = df
        .get_column_names()
        .into_iter()
        .map(|name| {
            let name = name.as_str();
            let base = DUPLICATED_SUFFIX
                .captures(name)
                .and_then(|caps| caps.get(1))
                .map(|base| base.as_str())
                .filter(|base| seen.contains(base))
                .unwrap_or(name);
            seen.push(name);
            base.to_string()
        })
        .collect();
    unique_names(&written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::table::{Cell, ColumnKind};

    #[test]
    fn test_load_csv_bytes_infers_kinds() {
        let table = DataLoader::load_csv_bytes(b"a,b\n1, \n2,3\n").unwrap();
        assert_eq!(table.column_names(), vec!["a", "b"]);
        assert_eq!(table.height(), 2);
        let b = table.column("b").unwrap();
        assert_eq!(b.kind(), ColumnKind::Number);
        assert!(b.cells()[0].is_missing());
        assert_eq!(b.cells()[1], Cell::Number(3.0));
    }

    #[test]
    fn test_text_keeps_whitespace() {
        let table = DataLoader::load_csv_bytes(b"name\n  Bob \nAmy\n").unwrap();
        assert_eq!(table.cell(0, "name"), Some(&Cell::Text("  Bob ".into())));
    }

    #[test]
    fn test_latin1_fallback() {
        // "café" with Latin-1 é (0xE9)
        let bytes = b"name\ncaf\xe9\n";
        let table = DataLoader::load_csv_bytes(bytes).unwrap();
        assert_eq!(table.cell(0, "name"), Some(&Cell::Text("café".into())));
    }

    #[test]
    fn test_repeated_header_is_numbered() {
        let table = DataLoader::load_csv_bytes(b"a,b,a,a\n1,2,3,4\n").unwrap();
        assert_eq!(table.column_names(), vec!["a", "b", "a.1", "a.2"]);
        assert_eq!(table.cell(0, "a.1"), Some(&Cell::Number(3.0)));

        let literal = DataLoader::load_csv_bytes(b"x_duplicated_0,y\n1,2\n").unwrap();
        assert_eq!(literal.column_names(), vec!["x_duplicated_0", "y"]);
    }

    #[test]
    fn test_load_blob_latin1() {
        let payload = B64.encode(b"date,region,sales\n2024-01-01,Caf\xe9,1\n");
        let table = DataLoader::load_blob(&format!("data:text/csv;base64,{}", payload)).unwrap();
        assert_eq!(table.cell(0, "region"), Some(&Cell::Text("Café".into())));
        assert_eq!(table.cell(0, "sales"), Some(&Cell::Number(1.0)));
    }

    #[test]
    fn test_load_blob() {
        let payload = B64.encode("date,region,sales\n2024-01-01,North,10\n");
        let table = DataLoader::load_blob(&format!("data:text/csv;base64,{}", payload)).unwrap();
        assert_eq!(table.height(), 1);
        assert_eq!(table.cell(0, "sales"), Some(&Cell::Number(10.0)));
    }

    #[test]
    fn test_blob_errors() {
        assert!(matches!(
            DataLoader::load_blob("no comma here"),
            Err(LoadError::MalformedUpload)
        ));
        assert!(matches!(
            DataLoader::load_blob("data:text/csv;base64,@@@"),
            Err(LoadError::Base64Error(_))
        ));
        assert!(matches!(DataLoader::load_csv_bytes(b"  \n"), Err(LoadError::NoData)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = DataLoader::load_path(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, LoadError::IoError(_)));
        assert!(err.to_string().starts_with("Could not read file"));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(FileFormat::from_path(Path::new("a.XLSX")), FileFormat::Spreadsheet);
        assert_eq!(FileFormat::from_path(Path::new("a.csv")), FileFormat::Csv);
        assert_eq!(FileFormat::from_path(Path::new("a")), FileFormat::Csv);
    }
}
