//! Expense Store Module
//! Append-only CSV log of expenses, with backups, import and export.

use crate::config::{AppPaths, ConfigError};
use crate::expenses::categories::CategoryConfig;
use crate::expenses::record::{ExpenseRecord, LOG_HEADER};
use chrono::Local;
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("{0}")]
    IoError(#[from] io::Error),
    #[error("{0}")]
    CsvError(#[from] csv::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Error, Debug)]
pub enum BackupError {
    #[error("Nothing to back up: {} does not exist", .0.display())]
    MissingLog(PathBuf),
    #[error("Backup failed: {0}")]
    IoError(#[from] io::Error),
}

/// The expense log and its sidecar files.
pub struct ExpenseStore {
    paths: AppPaths,
}

impl ExpenseStore {
    pub fn new(paths: AppPaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &AppPaths {
        &self.paths
    }

    /// Create the log (with header), the backup directory and the default config when absent.
    pub fn ensure_files(&self) -> Result<(), WriteError> {
        if !self.paths.data_file.exists() {
            Self::write_all(&self.paths.data_file, &[])?;
            info!("Created new data file {}", self.paths.data_file.display());
        }
        fs::create_dir_all(&self.paths.backup_dir)?;
        if !self.paths.config_file.exists() {
            CategoryConfig::default().save(&self.paths.config_file)?;
            info!("Created default config file");
        }
        Ok(())
    }

    /// Append one row to the log.
    pub fn append_record(&self, record: &ExpenseRecord) -> Result<(), WriteError> {
        self.append_all(std::slice::from_ref(record))
            .inspect_err(|e| error!("Add failed: {}", e))?;
        info!(
            "Added expense: {}, {}, {}, {}",
            record.date, record.category, record.amount, record.note
        );
        Ok(())
    }

    fn append_all(&self, records: &[ExpenseRecord]) -> Result<(), WriteError> {
        let path = &self.paths.data_file;
        let is_new = !path.exists();
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
        if is_new {
            writer.write_record(LOG_HEADER)?;
        }
        for record in records {
            writer.write_record(record.fields())?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Every row of the log. A missing or unreadable log reads as empty.
    pub fn read_records(&self) -> Vec<ExpenseRecord> {
        let path = &self.paths.data_file;
        if !path.exists() {
            return Vec::new();
        }
        match Self::read_log(path) {
            Ok(records) => records,
            Err(e) => {
                error!("Read expenses failed: {}", e);
                Vec::new()
            }
        }
    }

    fn read_log(path: &Path) -> Result<Vec<ExpenseRecord>, csv::Error> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)?;

        // Fields are looked up by header name; a log without the usual header is read by position.
        let headers = reader.headers()?.clone();
        let positions: Vec<usize> = LOG_HEADER
            .iter()
            .enumerate()
            .map(|(i, name)| {
                headers
                    .iter()
                    .position(|h| h.trim() == *name)
                    .unwrap_or(i)
            })
            .collect();

        let mut records = Vec::new();
        for row in reader.records() {
            let row: StringRecord = row?;
            let fields: Vec<&str> = positions
                .iter()
                .map(|&i| row.get(i).unwrap_or(""))
                .collect();
            records.push(ExpenseRecord::from_fields(&fields));
        }
        Ok(records)
    }

    /// Copy the log into the backup directory; failures are logged and give `None`.
    pub fn backup(&self) -> Option<PathBuf> {
        match self.try_backup() {
            Ok(dest) => Some(dest),
            Err(e) => {
                error!("{}", e);
                None
            }
        }
    }

    pub fn try_backup(&self) -> Result<PathBuf, BackupError> {
        let source = &self.paths.data_file;
        if !source.exists() {
            return Err(BackupError::MissingLog(source.clone()));
        }
        fs::create_dir_all(&self.paths.backup_dir)?;
        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        let dest = self
            .paths
            .backup_dir
            .join(format!("expenses_backup_{}.csv", stamp));
        fs::copy(source, &dest)?;
        info!("Backup created: {}", dest.display());
        Ok(dest)
    }

    /// Append the rows of an external CSV file. Returns the number of rows imported.
    ///
    /// The first row is skipped when its first cell reads "date". Rows with
    /// fewer than three fields are skipped; the rest are padded or cut to four.
    pub fn import_external_csv(&self, path: &Path) -> Result<usize, WriteError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)
            .inspect_err(|e| warn!("Import failed: {}", e))?;

        let mut records = Vec::new();
        for (idx, row) in reader.records().enumerate() {
            let row = row?;
            if idx == 0 && row.get(0).is_some_and(|c| c.trim().to_lowercase() == "date") {
                continue;
            }
            if row.len() < 3 {
                continue;
            }
            let fields: Vec<&str> = row.iter().collect();
            records.push(ExpenseRecord::from_fields(&fields));
        }

        self.append_all(&records)?;
        info!("Imported {} rows from {}", records.len(), path.display());
        Ok(records.len())
    }

    /// Write the header and every record to `path`. Returns the number of rows.
    pub fn export_csv(&self, path: &Path) -> Result<usize, WriteError> {
        let records = self.read_records();
        Self::write_all(path, &records).inspect_err(|e| error!("Export failed: {}", e))?;
        info!("Exported CSV: {}", path.display());
        Ok(records.len())
    }

    fn write_all(path: &Path, records: &[ExpenseRecord]) -> Result<(), WriteError> {
        let mut writer = WriterBuilder::new().from_writer(File::create(path)?);
        writer.write_record(LOG_HEADER)?;
        for record in records {
            writer.write_record(record.fields())?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TRACKER_LOG;

    fn store() -> (ExpenseStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = ExpenseStore::new(AppPaths::in_dir(dir.path(), TRACKER_LOG));
        store.ensure_files().unwrap();
        (store, dir)
    }

    fn record(date: &str, category: &str, amount: &str, note: &str) -> ExpenseRecord {
        ExpenseRecord::from_form(date, category, amount, note).unwrap()
    }

    #[test]
    fn test_ensure_files() {
        let (store, _dir) = store();
        let paths = store.paths();
        assert_eq!(
            fs::read_to_string(&paths.data_file).unwrap(),
            "date,category,amount,note\n"
        );
        assert!(paths.backup_dir.is_dir());
        assert!(paths.config_file.exists());
        // A second call leaves the log alone
        store.append_record(&record("2024-01-05", "Food", "3", "")).unwrap();
        store.ensure_files().unwrap();
        assert_eq!(store.read_records().len(), 1);
    }

    #[test]
    fn test_append_and_read_quoted_note() {
        let (store, _dir) = store();
        let r = record("2024-01-05", "Food", "12.50", "lunch, with \"Sam\"");
        store.append_record(&r).unwrap();
        assert_eq!(store.read_records(), vec![r]);
    }

    #[test]
    fn test_read_pads_short_rows() {
        let (store, _dir) = store();
        fs::write(
            &store.paths().data_file,
            "date,category,amount,note\n2024-01-05,Food,3\n",
        )
        .unwrap();
        let records = store.read_records();
        assert_eq!(records[0].note, "");
        assert_eq!(records[0].amount, "3");
    }

    #[test]
    fn test_backup_copies_log() {
        let (store, _dir) = store();
        store.append_record(&record("2024-01-05", "Food", "3", "")).unwrap();
        let dest = store.backup().unwrap();
        let name = dest.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("expenses_backup_") && name.ends_with(".csv"));
        assert_eq!(
            fs::read(&dest).unwrap(),
            fs::read(&store.paths().data_file).unwrap()
        );
    }

    #[test]
    fn test_backup_without_log_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = ExpenseStore::new(AppPaths::in_dir(dir.path(), TRACKER_LOG));
        assert!(matches!(store.try_backup(), Err(BackupError::MissingLog(_))));
        assert_eq!(store.backup(), None);
    }

    #[test]
    fn test_import_external_csv() {
        let (store, dir) = store();
        let external = dir.path().join("bank.csv");
        fs::write(
            &external,
            " Date ,category,amount\n2024-03-01,Food,4.5\n2024-03-02,Rent\n2024-03-03,Health,20,pills,extra\n",
        )
        .unwrap();
        assert_eq!(store.import_external_csv(&external).unwrap(), 2);

        let records = store.read_records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].fields(), ["2024-03-01", "Food", "4.5", ""]);
        assert_eq!(records[1].fields(), ["2024-03-03", "Health", "20", "pills"]);
    }

    #[test]
    fn test_import_keeps_first_row_without_date_header() {
        let (store, dir) = store();
        let external = dir.path().join("plain.csv");
        fs::write(&external, "2024-03-01,Food,4.5,a\n").unwrap();
        assert_eq!(store.import_external_csv(&external).unwrap(), 1);
        // Importing twice duplicates rows
        assert_eq!(store.import_external_csv(&external).unwrap(), 1);
        assert_eq!(store.read_records().len(), 2);
    }

    #[test]
    fn test_import_missing_file_fails() {
        let (store, dir) = store();
        assert!(store.import_external_csv(&dir.path().join("nope.csv")).is_err());
    }

    #[test]
    fn test_export_csv() {
        let (store, dir) = store();
        store.append_record(&record("2024-01-05", "Food", "3", "x")).unwrap();
        let out = dir.path().join("export.csv");
        assert_eq!(store.export_csv(&out).unwrap(), 1);
        assert_eq!(
            fs::read_to_string(&out).unwrap(),
            "date,category,amount,note\n2024-01-05,Food,3,x\n"
        );
    }
}
