//! Table Module
//! In-memory table of named, equal-length columns of tagged cells.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use thiserror::Error;

/// Raw field values read as "no value present".
pub const NA_TOKENS: [&str; 11] = [
    "NA", "N/A", "n/a", "NaN", "nan", "null", "NULL", "None", "#N/A", "<NA>", "-nan",
];

/// Structural problems with a table or a required column set.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("CSV missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("All values in '{0}' are non-numeric.")]
    NonNumeric(String),
    #[error("Could not parse '{column}' column as dates: {value}")]
    UnparsableDates { column: String, value: String },
    #[error("Duplicate column name: {0}")]
    DuplicateColumn(String),
    #[error("Column '{column}' has {actual} rows, expected {expected}")]
    RaggedColumns {
        column: String,
        expected: usize,
        actual: usize,
    },
}

/// A single cell value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    Number(f64),
    Date(NaiveDate),
    Text(String),
    #[default]
    Missing,
}

impl Cell {
    /// Interpret a raw text field: blank and NA tokens become `Missing`.
    pub fn from_raw(raw: Option<&str>) -> Cell {
        match raw {
            Some(s) if !is_missing_token(s) => Cell::Text(s.to_string()),
            _ => Cell::Missing,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Cell::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Coerce to a number: numbers pass through, text is parsed, anything else is `None`.
    pub fn coerce_number(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            Cell::Text(s) => parse_number(s),
            _ => None,
        }
    }

    /// Kind tag of this cell.
    pub fn kind(&self) -> ColumnKind {
        match self {
            Cell::Number(_) => ColumnKind::Number,
            Cell::Date(_) => ColumnKind::Date,
            Cell::Text(_) => ColumnKind::Text,
            Cell::Missing => ColumnKind::Missing,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Number(v) => write!(f, "{}", v),
            Cell::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Cell::Text(s) => f.write_str(s),
            Cell::Missing => Ok(()),
        }
    }
}

// Missing never appears next to NaN: numbers are always finite.
impl Eq for Cell {}

impl Hash for Cell {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Cell::Number(v) => {
                // 0.0 and -0.0 compare equal, so they must hash equal
                let v = if *v == 0.0 { 0.0 } else { *v };
                v.to_bits().hash(state);
            }
            Cell::Date(d) => d.hash(state),
            Cell::Text(s) => s.hash(state),
            Cell::Missing => {}
        }
    }
}

/// Declared kind of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnKind {
    Text,
    Number,
    Date,
    /// Every cell is missing.
    Missing,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnKind::Text => "text",
            ColumnKind::Number => "number",
            ColumnKind::Date => "date",
            ColumnKind::Missing => "missing",
        };
        f.write_str(name)
    }
}

/// A named column of cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    kind: ColumnKind,
    cells: Vec<Cell>,
}

impl Column {
    /// Create a column with an explicit kind.
    ///
    /// Cells that do not conform to `kind` are replaced with `Missing`.
    pub fn with_kind(name: impl Into<String>, kind: ColumnKind, cells: Vec<Cell>) -> Self {
        let cells = cells
            .into_iter()
            .map(|c| if c.is_missing() || c.kind() == kind { c } else { Cell::Missing })
            .collect();
        Self {
            name: name.into(),
            kind,
            cells,
        }
    }

    /// Create a column, inferring its kind from already typed cells.
    ///
    /// Mixed columns fall back to text.
    pub fn new(name: impl Into<String>, cells: Vec<Cell>) -> Self {
        let mut kinds = cells.iter().filter(|c| !c.is_missing()).map(Cell::kind);
        let kind = match kinds.next() {
            None => ColumnKind::Missing,
            Some(first) if kinds.all(|k| k == first) => first,
            Some(_) => ColumnKind::Text,
        };
        let cells = if kind == ColumnKind::Text {
            cells
                .into_iter()
                .map(|c| match c {
                    Cell::Missing | Cell::Text(_) => c,
                    other => Cell::Text(other.to_string()),
                })
                .collect()
        } else {
            cells
        };
        Self {
            name: name.into(),
            kind,
            cells,
        }
    }

    /// Build a column from raw text fields, inferring number vs text.
    pub fn from_raw<S: AsRef<str>>(name: impl Into<String>, raw: &[Option<S>]) -> Self {
        let cells: Vec<Cell> = raw.iter().map(|s| Cell::from_raw(s.as_ref().map(|s| s.as_ref()))).collect();
        Self::infer_from_text(name, cells)
    }

    /// Promote a column of text/missing cells to numbers when every value parses.
    pub fn infer_from_text(name: impl Into<String>, cells: Vec<Cell>) -> Self {
        let present: Vec<&Cell> = cells.iter().filter(|c| !c.is_missing()).collect();
        if present.is_empty() {
            return Self::with_kind(name, ColumnKind::Missing, cells);
        }
        let all_numeric = present.iter().all(|c| c.coerce_number().is_some());
        if all_numeric {
            let cells = cells
                .into_iter()
                .map(|c| c.coerce_number().map(Cell::Number).unwrap_or(Cell::Missing))
                .collect();
            return Self::with_kind(name, ColumnKind::Number, cells);
        }
        Self::new(name, cells)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ColumnKind {
        self.kind
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, row: usize) -> Option<&Cell> {
        self.cells.get(row)
    }

    pub fn missing_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_missing()).count()
    }

    /// Rename the column, keeping cells and kind.
    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Keep only the given rows, in the given order.
    pub fn take(&self, rows: &[usize]) -> Self {
        Self {
            name: self.name.clone(),
            kind: self.kind,
            cells: rows.iter().map(|&i| self.cells[i].clone()).collect(),
        }
    }

    pub fn into_cells(self) -> Vec<Cell> {
        self.cells
    }
}

/// Ordered, equal-length named columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Build a table, checking unique names and equal column lengths.
    pub fn new(columns: Vec<Column>) -> Result<Self, ValidationError> {
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(ValidationError::DuplicateColumn(column.name.clone()));
            }
        }
        if let Some(first) = columns.first() {
            let expected = first.len();
            if let Some(bad) = columns.iter().find(|c| c.len() != expected) {
                return Err(ValidationError::RaggedColumns {
                    column: bad.name.clone(),
                    expected,
                    actual: bad.len(),
                });
            }
        }
        Ok(Self { columns })
    }

    /// Build a table from a header and raw text rows.
    ///
    /// Short rows are padded with missing cells, long rows are truncated.
    pub fn from_text_rows<S: AsRef<str>>(
        header: &[S],
        rows: &[Vec<Option<String>>],
    ) -> Result<Self, ValidationError> {
        let columns = header
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let raw: Vec<Option<&str>> = rows
                    .iter()
                    .map(|row| row.get(idx).and_then(|v| v.as_deref()))
                    .collect();
                Column::from_raw(name.as_ref(), &raw)
            })
            .collect();
        Self::new(columns)
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn height(&self) -> usize {
        self.columns.first().map(Column::len).unwrap_or(0)
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// True when there is nothing to show: no columns or no rows.
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Fail with the list of `required` names absent from the table.
    pub fn require_columns(&self, required: &[&str]) -> Result<(), ValidationError> {
        let missing: Vec<String> = required
            .iter()
            .filter(|name| self.column(name).is_none())
            .map(|name| name.to_string())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::MissingColumns(missing))
        }
    }

    pub fn cell(&self, row: usize, column: &str) -> Option<&Cell> {
        self.column(column).and_then(|c| c.get(row))
    }

    /// Owned copy of one row, in column order.
    pub fn row(&self, row: usize) -> Vec<Cell> {
        self.columns.iter().map(|c| c.cells[row].clone()).collect()
    }

    /// Borrowed view over one row.
    pub fn row_view(&self, row: usize) -> RowView<'_> {
        RowView { table: self, row }
    }

    /// New table with only the given rows, in the given order.
    pub fn take_rows(&self, rows: &[usize]) -> Table {
        Table {
            columns: self.columns.iter().map(|c| c.take(rows)).collect(),
        }
    }

    /// New table with `column` replacing the column of the same name.
    pub fn with_column(&self, column: Column) -> Result<Table, ValidationError> {
        let mut columns = self.columns.clone();
        match columns.iter().position(|c| c.name == column.name) {
            Some(idx) => columns[idx] = column,
            None => columns.push(column),
        }
        Table::new(columns)
    }
}

/// Read-only access to the cells of one row by column name.
#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    table: &'a Table,
    row: usize,
}

impl<'a> RowView<'a> {
    pub fn index(&self) -> usize {
        self.row
    }

    pub fn get(&self, column: &str) -> Option<&'a Cell> {
        self.table.cell(self.row, column)
    }
}

/// True when a raw field carries no value.
pub fn is_missing_token(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty() || NA_TOKENS.contains(&trimmed)
}

/// Parse a finite number, ignoring surrounding whitespace.
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Header names made unique: repeats become `name.1`, `name.2` and so on.
pub fn unique_names<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::new();
    names
        .iter()
        .map(|name| {
            let name = name.as_ref();
            let mut candidate = name.to_string();
            let mut suffix = 0;
            while taken.contains(&candidate) {
                suffix += 1;
                candidate = format!("{}.{}", name, suffix);
            }
            taken.insert(candidate.clone());
            candidate
        })
        .collect()
}
