//! Expense Book
//! State and handlers behind the expense tracker window.

use crate::charts::{category_totals, charts_available, ChartSpec};
use crate::config::{AppPaths, ConfigError};
use crate::data::table::parse_number;
use crate::data::{Cell, Column, ColumnKind, DataProcessor, RowPredicate, Table, ValidationError};
use crate::expenses::categories::CategoryConfig;
use crate::expenses::record::{
    records_from_table, records_table, ExpenseColumn, ExpenseRecord, FormError, LOG_HEADER,
};
use crate::expenses::store::{ExpenseStore, WriteError};
use crate::present::widget_rows;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Numeric copy of the sort column while sorting.
const SORT_KEY: &str = "sort key";

#[derive(Error, Debug)]
pub enum BookError {
    #[error(transparent)]
    Form(#[from] FormError),
    #[error(transparent)]
    Write(#[from] WriteError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("No expenses to summarize.")]
    NoData,
    #[error("Charts are disabled in this build.")]
    ChartsUnavailable,
}

/// Current sort column and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub column: ExpenseColumn,
    pub descending: bool,
}

/// The expense log as shown on screen.
pub struct ExpenseBook {
    store: ExpenseStore,
    categories: CategoryConfig,
    visible: Table,
    sort: Option<SortState>,
}

impl ExpenseBook {
    /// Create missing files, read the categories and the log.
    pub fn open(paths: AppPaths) -> Result<Self, BookError> {
        let store = ExpenseStore::new(paths);
        store.ensure_files()?;
        let categories = CategoryConfig::load(&store.paths().config_file);
        let mut book = Self {
            store,
            categories,
            visible: records_table(&[]),
            sort: None,
        };
        book.refresh();
        Ok(book)
    }

    /// Records on screen, in display order.
    pub fn visible(&self) -> Vec<ExpenseRecord> {
        records_from_table(&self.visible)
    }

    /// Displayed text of the visible rows, one entry per log column.
    pub fn rows(&self) -> Vec<Vec<String>> {
        widget_rows(&self.visible, &LOG_HEADER)
    }

    pub fn categories(&self) -> &CategoryConfig {
        &self.categories
    }

    pub fn sort_state(&self) -> Option<SortState> {
        self.sort
    }

    pub fn paths(&self) -> &AppPaths {
        self.store.paths()
    }

    /// Show every record, keeping the current sort.
    pub fn refresh(&mut self) {
        self.visible = records_table(&self.store.read_records());
        self.apply_sort();
    }

    /// Validate and append a form entry, then show the full log.
    pub fn add(
        &mut self,
        date: &str,
        category: &str,
        amount: &str,
        note: &str,
    ) -> Result<ExpenseRecord, BookError> {
        let record = ExpenseRecord::from_form(date, category, amount, note)?;
        self.store.append_record(&record)?;
        self.refresh();
        Ok(record)
    }

    /// Show the records matching `query` in any column; a blank query shows everything.
    pub fn search(&mut self, query: &str) {
        let table = records_table(&self.store.read_records());
        let predicate = RowPredicate::contains_text(&LOG_HEADER, query);
        self.visible = match DataProcessor::filter_rows(&table, &predicate) {
            Ok((found, _)) => found,
            Err(e) => {
                warn!("Search failed: {}", e);
                table
            }
        };
        self.apply_sort();
    }

    pub fn clear_search(&mut self) {
        self.refresh();
    }

    /// Sort the visible rows. Repeating a column flips the direction.
    ///
    /// Values are compared as numbers when every value in the column parses, as text otherwise.
    pub fn sort_by(&mut self, column: ExpenseColumn) -> SortState {
        let descending = match self.sort {
            Some(state) if state.column == column => !state.descending,
            _ => false,
        };
        let state = SortState { column, descending };
        self.sort = Some(state);
        self.apply_sort();
        state
    }

    fn apply_sort(&mut self) {
        let Some(state) = self.sort else {
            return;
        };
        match sorted(&self.visible, state) {
            Ok(table) => self.visible = table,
            Err(e) => warn!("Sort by {} failed: {}", state.column.name(), e),
        }
    }

    /// Append rows from an external CSV file and show the full log.
    pub fn import(&mut self, path: &Path) -> Result<usize, BookError> {
        let count = self.store.import_external_csv(path)?;
        self.refresh();
        Ok(count)
    }

    pub fn export(&self, path: &Path) -> Result<usize, BookError> {
        Ok(self.store.export_csv(path)?)
    }

    /// Path of the new backup, `None` when it failed (details are in the log).
    pub fn backup(&self) -> Option<PathBuf> {
        self.store.backup()
    }

    /// Replace and persist the category list. The old list stays if saving fails.
    pub fn save_categories(&mut self, categories: Vec<String>) -> Result<(), BookError> {
        let config = CategoryConfig { categories };
        config.save(&self.store.paths().config_file)?;
        self.categories = config;
        info!("Updated categories");
        Ok(())
    }

    /// Category share chart over the whole log.
    pub fn summary_chart(&self) -> Result<ChartSpec, BookError> {
        if !charts_available() {
            return Err(BookError::ChartsUnavailable);
        }
        let spec = category_totals(&self.store.read_records());
        if spec.is_empty() {
            return Err(BookError::NoData);
        }
        Ok(spec)
    }
}

fn sorted(table: &Table, state: SortState) -> Result<Table, ValidationError> {
    let name = state.column.name();
    let column = table
        .column(name)
        .ok_or_else(|| ValidationError::MissingColumns(vec![name.to_string()]))?;
    let numbers: Option<Vec<Cell>> = column
        .cells()
        .iter()
        .map(|c| c.as_text().and_then(parse_number).map(Cell::Number))
        .collect();

    match numbers {
        Some(keys) => {
            let keyed = table.with_column(Column::with_kind(SORT_KEY, ColumnKind::Number, keys))?;
            let (out, _) = DataProcessor::sort_by(&keyed, SORT_KEY, state.descending)?;
            Table::new(out.columns()[..table.width()].to_vec())
        }
        None => Ok(DataProcessor::sort_by(table, name, state.descending)?.0),
    }
}
