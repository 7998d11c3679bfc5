//! Data Processor Module
//! Handles data cleaning and transformation of a `Table`.
//!
//! Every operation takes the current table by reference and returns a new one
//! with a `TransformReport`. Row-level problems are coerced (unparsable values
//! become `Missing`); only structural problems surface as `ValidationError`.

use crate::data::dates::{looks_like_date, parse_date};
use crate::data::table::{Cell, Column, ColumnKind, RowView, Table, ValidationError};
use chrono::NaiveDate;
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Number of non-missing values sampled when looking for date columns.
pub const DATE_SAMPLE_SIZE: usize = 5;

/// Which transform produced a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    TrimText,
    DropEmptyColumns,
    ParseDates,
    DropDuplicates,
    FillMean,
    Filter,
    Aggregate,
    Sort,
    DropMissing,
    AutoClean,
}

/// What a transform changed.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformReport {
    pub operation: Operation,
    pub rows_before: usize,
    pub rows_after: usize,
    pub cells_changed: usize,
    /// Columns that were modified, dropped or converted.
    pub columns_changed: Vec<String>,
    /// Date-shaped columns where no value could be parsed (left as text).
    pub columns_unparsed: Vec<String>,
    /// Numeric columns left alone because their mean is undefined.
    pub columns_skipped: Vec<String>,
}

impl TransformReport {
    fn new(operation: Operation, before: &Table, after: &Table) -> Self {
        Self {
            operation,
            rows_before: before.height(),
            rows_after: after.height(),
            cells_changed: 0,
            columns_changed: Vec::new(),
            columns_unparsed: Vec::new(),
            columns_skipped: Vec::new(),
        }
    }

    pub fn rows_removed(&self) -> usize {
        self.rows_before.saturating_sub(self.rows_after)
    }
}

impl fmt::Display for TransformReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.operation {
            Operation::TrimText => write!(f, "Trimmed whitespace in {} cells", self.cells_changed),
            Operation::DropEmptyColumns => write!(
                f,
                "Dropped {} empty columns",
                self.columns_changed.len()
            ),
            Operation::ParseDates => {
                write!(f, "Parsed {} date columns", self.columns_changed.len())?;
                if !self.columns_unparsed.is_empty() {
                    write!(f, " ({} left as text)", self.columns_unparsed.len())?;
                }
                Ok(())
            }
            Operation::DropDuplicates => write!(
                f,
                "Dropped duplicates: {} rows removed",
                self.rows_removed()
            ),
            Operation::FillMean => {
                write!(
                    f,
                    "Filled {} missing values with column mean",
                    self.cells_changed
                )?;
                if !self.columns_skipped.is_empty() {
                    write!(
                        f,
                        " (skipped all-missing: {})",
                        self.columns_skipped.join(", ")
                    )?;
                }
                Ok(())
            }
            Operation::Filter | Operation::DropMissing => write!(
                f,
                "Kept {} of {} rows",
                self.rows_after, self.rows_before
            ),
            Operation::Aggregate => write!(f, "Aggregated into {} groups", self.rows_after),
            Operation::Sort => write!(f, "Sorted {} rows", self.rows_after),
            Operation::AutoClean => write!(
                f,
                "Auto-clean done (rows before: {}, after: {})",
                self.rows_before, self.rows_after
            ),
        }
    }
}

/// Row filter with the columns it needs.
pub struct RowPredicate {
    required: Vec<String>,
    test: Box<dyn Fn(&RowView<'_>) -> bool + Send + Sync>,
}

impl RowPredicate {
    pub fn new<F>(required: &[&str], test: F) -> Self
    where
        F: Fn(&RowView<'_>) -> bool + Send + Sync + 'static,
    {
        Self {
            required: required.iter().map(|s| s.to_string()).collect(),
            test: Box::new(test),
        }
    }

    /// Rows whose `column` equals `value`.
    pub fn column_equals(column: &str, value: Cell) -> Self {
        let name = column.to_string();
        Self::new(&[column], move |row| row.get(&name) == Some(&value))
    }

    /// Rows whose date in `column` lies within the inclusive range.
    ///
    /// With no bounds every row passes; with a bound, rows without a date are dropped.
    pub fn date_between(column: &str, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        let name = column.to_string();
        Self::new(&[column], move |row| {
            if start.is_none() && end.is_none() {
                return true;
            }
            match row.get(&name).and_then(Cell::as_date) {
                Some(date) => {
                    start.map_or(true, |s| date >= s) && end.map_or(true, |e| date <= e)
                }
                None => false,
            }
        })
    }

    /// Case-insensitive substring match across the given columns.
    pub fn contains_text(columns: &[&str], query: &str) -> Self {
        let names: Vec<String> = columns.iter().map(|s| s.to_string()).collect();
        let query = query.trim().to_lowercase();
        Self::new(columns, move |row| {
            names.iter().any(|name| {
                row.get(name)
                    .map(|cell| cell.to_string().to_lowercase().contains(&query))
                    .unwrap_or(false)
            })
        })
    }

    /// Both predicates must hold.
    pub fn and(self, other: RowPredicate) -> Self {
        let mut required = self.required;
        required.extend(other.required);
        let (left, right) = (self.test, other.test);
        Self {
            required,
            test: Box::new(move |row: &RowView<'_>| left(row) && right(row)),
        }
    }

    pub fn matches(&self, row: &RowView<'_>) -> bool {
        (self.test)(row)
    }
}

/// Handles data cleaning and transformation operations.
pub struct DataProcessor;

impl DataProcessor {
    /// Strip leading/trailing whitespace from every text cell of text columns.
    pub fn trim_text_columns(table: &Table) -> (Table, TransformReport) {
        let results: Vec<(Column, usize)> = table
            .columns()
            .par_iter()
            .map(|col| {
                if col.kind() != ColumnKind::Text {
                    return (col.clone(), 0);
                }
                let mut changed = 0;
                let cells = col
                    .cells()
                    .iter()
                    .map(|cell| match cell {
                        Cell::Text(s) => {
                            let trimmed = s.trim();
                            if trimmed.len() != s.len() {
                                changed += 1;
                            }
                            Cell::Text(trimmed.to_string())
                        }
                        other => other.clone(),
                    })
                    .collect();
                (Column::with_kind(col.name(), ColumnKind::Text, cells), changed)
            })
            .collect();

        let mut report_cols = Vec::new();
        let mut cells_changed = 0;
        for (col, changed) in &results {
            if *changed > 0 {
                report_cols.push(col.name().to_string());
                cells_changed += changed;
            }
        }
        let out = Self::rebuild(results.into_iter().map(|(c, _)| c).collect());
        let mut report = TransformReport::new(Operation::TrimText, table, &out);
        report.cells_changed = cells_changed;
        report.columns_changed = report_cols;
        (out, report)
    }

    /// Remove every column in which all cells are missing.
    pub fn drop_all_missing_columns(table: &Table) -> (Table, TransformReport) {
        let (dropped, kept): (Vec<&Column>, Vec<&Column>) = table
            .columns()
            .iter()
            .partition(|col| col.missing_count() == col.len());
        let out = Self::rebuild(kept.into_iter().cloned().collect());
        let mut report = TransformReport::new(Operation::DropEmptyColumns, table, &out);
        report.columns_changed = dropped.iter().map(|c| c.name().to_string()).collect();
        (out, report)
    }

    /// Convert text columns that look like dates into date columns.
    ///
    /// A column qualifies when any of its first `DATE_SAMPLE_SIZE` non-missing
    /// values starts with a date shape. Values that do not parse become
    /// `Missing`; if none parse, the column is kept as text.
    pub fn infer_and_parse_dates(table: &Table) -> (Table, TransformReport) {
        enum Outcome {
            Untouched,
            Parsed(usize),
            Unparsed,
        }

        let results: Vec<(Column, Outcome)> = table
            .columns()
            .par_iter()
            .map(|col| {
                if col.kind() != ColumnKind::Text {
                    return (col.clone(), Outcome::Untouched);
                }
                let sampled = col
                    .cells()
                    .iter()
                    .filter_map(Cell::as_text)
                    .take(DATE_SAMPLE_SIZE)
                    .any(looks_like_date);
                if !sampled {
                    return (col.clone(), Outcome::Untouched);
                }

                let cells: Vec<Cell> = col
                    .cells()
                    .iter()
                    .map(|cell| {
                        cell.as_text()
                            .and_then(parse_date)
                            .map(Cell::Date)
                            .unwrap_or(Cell::Missing)
                    })
                    .collect();
                let parsed = cells.iter().filter(|c| !c.is_missing()).count();
                if parsed == 0 {
                    (col.clone(), Outcome::Unparsed)
                } else {
                    (
                        Column::with_kind(col.name(), ColumnKind::Date, cells),
                        Outcome::Parsed(parsed),
                    )
                }
            })
            .collect();

        let mut changed = Vec::new();
        let mut unparsed = Vec::new();
        let mut cells_changed = 0;
        for (col, outcome) in &results {
            match outcome {
                Outcome::Parsed(n) => {
                    changed.push(col.name().to_string());
                    cells_changed += n;
                }
                Outcome::Unparsed => unparsed.push(col.name().to_string()),
                Outcome::Untouched => {}
            }
        }

        let out = Self::rebuild(results.into_iter().map(|(c, _)| c).collect());
        let mut report = TransformReport::new(Operation::ParseDates, table, &out);
        report.cells_changed = cells_changed;
        report.columns_changed = changed;
        report.columns_unparsed = unparsed;
        (out, report)
    }

    /// Remove rows identical to an earlier row across all columns.
    pub fn drop_duplicate_rows(table: &Table) -> (Table, TransformReport) {
        let mut seen: HashSet<Vec<&Cell>> = HashSet::with_capacity(table.height());
        let keep: Vec<usize> = (0..table.height())
            .filter(|&row| {
                let key: Vec<&Cell> = table.columns().iter().map(|c| &c.cells()[row]).collect();
                seen.insert(key)
            })
            .collect();

        let out = table.take_rows(&keep);
        let report = TransformReport::new(Operation::DropDuplicates, table, &out);
        (out, report)
    }

    /// Replace missing cells of numeric columns with the column mean.
    ///
    /// Columns with no numeric value have no mean; they are left unchanged
    /// and listed in `columns_skipped`.
    pub fn fill_numeric_missing_with_mean(table: &Table) -> (Table, TransformReport) {
        enum Outcome {
            Untouched,
            Filled(usize),
            Skipped,
        }

        let results: Vec<(Column, Outcome)> = table
            .columns()
            .par_iter()
            .map(|col| {
                let missing = col.missing_count();
                if col.kind() != ColumnKind::Number || missing == 0 {
                    return (col.clone(), Outcome::Untouched);
                }
                let values: Vec<f64> = col.cells().iter().filter_map(Cell::as_number).collect();
                if values.is_empty() {
                    return (col.clone(), Outcome::Skipped);
                }
                let mean = values.iter().sum::<f64>() / values.len() as f64;
                let cells = col
                    .cells()
                    .iter()
                    .map(|cell| if cell.is_missing() { Cell::Number(mean) } else { cell.clone() })
                    .collect();
                (
                    Column::with_kind(col.name(), ColumnKind::Number, cells),
                    Outcome::Filled(missing),
                )
            })
            .collect();

        let mut changed = Vec::new();
        let mut skipped = Vec::new();
        let mut cells_changed = 0;
        for (col, outcome) in &results {
            match outcome {
                Outcome::Filled(n) => {
                    changed.push(col.name().to_string());
                    cells_changed += n;
                }
                Outcome::Skipped => skipped.push(col.name().to_string()),
                Outcome::Untouched => {}
            }
        }

        let out = Self::rebuild(results.into_iter().map(|(c, _)| c).collect());
        let mut report = TransformReport::new(Operation::FillMean, table, &out);
        report.cells_changed = cells_changed;
        report.columns_changed = changed;
        report.columns_skipped = skipped;
        (out, report)
    }

    /// Keep only rows satisfying `predicate`.
    pub fn filter_rows(
        table: &Table,
        predicate: &RowPredicate,
    ) -> Result<(Table, TransformReport), ValidationError> {
        let required: Vec<&str> = predicate.required.iter().map(String::as_str).collect();
        table.require_columns(&required)?;

        let keep: Vec<usize> = (0..table.height())
            .filter(|&row| predicate.matches(&table.row_view(row)))
            .collect();
        let out = table.take_rows(&keep);
        let report = TransformReport::new(Operation::Filter, table, &out);
        Ok((out, report))
    }

    /// Sum `value_column` per distinct `group_key`, groups sorted ascending.
    ///
    /// Rows with a missing key are dropped; non-numeric values are skipped.
    /// When both names are the same the sums column is called `<name>_sum`.
    pub fn aggregate_sum(
        table: &Table,
        group_key: &str,
        value_column: &str,
    ) -> Result<(Table, TransformReport), ValidationError> {
        table.require_columns(&[group_key, value_column])?;
        let (Some(keys), Some(values)) = (table.column(group_key), table.column(value_column))
        else {
            return Err(ValidationError::MissingColumns(vec![group_key.to_string()]));
        };

        let mut index: HashMap<&Cell, usize> = HashMap::new();
        let mut groups: Vec<(&Cell, f64)> = Vec::new();
        for (key, value) in keys.cells().iter().zip(values.cells()) {
            if key.is_missing() {
                continue;
            }
            let slot = *index.entry(key).or_insert_with(|| {
                groups.push((key, 0.0));
                groups.len() - 1
            });
            if let Some(v) = value.coerce_number() {
                groups[slot].1 += v;
            }
        }
        groups.sort_by(|a, b| compare_cells(a.0, b.0));

        let key_cells: Vec<Cell> = groups.iter().map(|(k, _)| (*k).clone()).collect();
        let sums: Vec<Cell> = groups.iter().map(|(_, s)| Cell::Number(*s)).collect();
        // Summing the key column itself needs a second name for the sums.
        let sum_name = if group_key == value_column {
            format!("{}_sum", value_column)
        } else {
            value_column.to_string()
        };
        let out = Table::new(vec![
            Column::new(group_key, key_cells),
            Column::with_kind(sum_name, ColumnKind::Number, sums),
        ])?;
        let report = TransformReport::new(Operation::Aggregate, table, &out);
        Ok((out, report))
    }

    /// Stable sort by one column; missing values always go last.
    pub fn sort_by(
        table: &Table,
        column: &str,
        descending: bool,
    ) -> Result<(Table, TransformReport), ValidationError> {
        table.require_columns(&[column])?;
        let Some(col) = table.column(column) else {
            return Err(ValidationError::MissingColumns(vec![column.to_string()]));
        };

        let mut order: Vec<usize> = (0..table.height()).collect();
        order.sort_by(|&a, &b| {
            let (ca, cb) = (&col.cells()[a], &col.cells()[b]);
            match (ca.is_missing(), cb.is_missing()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) if descending => compare_cells(cb, ca),
                (false, false) => compare_cells(ca, cb),
            }
        });

        let out = table.take_rows(&order);
        let report = TransformReport::new(Operation::Sort, table, &out);
        Ok((out, report))
    }

    /// Remove rows with a missing value in any of `columns`.
    pub fn drop_missing_in(
        table: &Table,
        columns: &[&str],
    ) -> Result<(Table, TransformReport), ValidationError> {
        table.require_columns(columns)?;
        let keep: Vec<usize> = (0..table.height())
            .filter(|&row| {
                columns
                    .iter()
                    .all(|name| table.cell(row, name).is_some_and(|c| !c.is_missing()))
            })
            .collect();
        let out = table.take_rows(&keep);
        let report = TransformReport::new(Operation::DropMissing, table, &out);
        Ok((out, report))
    }

    /// Trim and lowercase every column name.
    pub fn normalize_column_names(table: &Table) -> Result<Table, ValidationError> {
        let columns = table
            .columns()
            .iter()
            .map(|col| col.clone().renamed(col.name().trim().to_lowercase()))
            .collect();
        Table::new(columns)
    }

    /// Trim text, drop empty columns, then parse date-like columns.
    pub fn auto_clean(table: &Table) -> (Table, TransformReport) {
        let (trimmed, trim_report) = Self::trim_text_columns(table);
        let (pruned, drop_report) = Self::drop_all_missing_columns(&trimmed);
        let (parsed, date_report) = Self::infer_and_parse_dates(&pruned);

        let mut report = TransformReport::new(Operation::AutoClean, table, &parsed);
        report.cells_changed = trim_report.cells_changed + date_report.cells_changed;
        report.columns_changed = drop_report.columns_changed;
        report.columns_changed.extend(date_report.columns_changed);
        report.columns_unparsed = date_report.columns_unparsed;
        (parsed, report)
    }

    // Columns come from an existing table, so names and lengths already agree.
    fn rebuild(columns: Vec<Column>) -> Table {
        Table::new(columns).unwrap_or_default()
    }
}

/// Ordering used for grouping and sorting: by value within a kind,
/// then numbers < dates < text < missing across kinds.
pub fn compare_cells(a: &Cell, b: &Cell) -> Ordering {
    fn rank(cell: &Cell) -> u8 {
        match cell {
            Cell::Number(_) => 0,
            Cell::Date(_) => 1,
            Cell::Text(_) => 2,
            Cell::Missing => 3,
        }
    }
    match (a, b) {
        (Cell::Number(x), Cell::Number(y)) => x.total_cmp(y),
        (Cell::Date(x), Cell::Date(y)) => x.cmp(y),
        (Cell::Text(x), Cell::Text(y)) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}
