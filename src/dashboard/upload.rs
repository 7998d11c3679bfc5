//! Upload parsing: decode, validate and tidy a `date, region, sales` CSV.

use crate::dashboard::DashboardError;
use crate::data::dates::parse_date;
use crate::data::{Cell, Column, ColumnKind, DataLoader, DataProcessor, Table, ValidationError};
use tracing::debug;

pub const REQUIRED_COLUMNS: [&str; 3] = ["date", "region", "sales"];

/// Parse an uploaded data URL into a table sorted by date.
///
/// Column names are trimmed and lowercased. Any present date that does not
/// parse rejects the upload, as does a `sales` column with no numeric value.
/// Rows without a date or region are dropped.
pub fn parse_upload(contents: &str) -> Result<Table, DashboardError> {
    if contents.trim().is_empty() {
        return Err(DashboardError::NoContents);
    }

    let table = DataLoader::load_blob(contents)?;
    let table = DataProcessor::normalize_column_names(&table)?;
    table.require_columns(&REQUIRED_COLUMNS)?;

    let table = table.with_column(parse_date_column(&table)?)?;
    let table = table.with_column(region_as_text(&table))?;
    let table = table.with_column(coerce_sales(&table)?)?;

    let (table, report) = DataProcessor::drop_missing_in(&table, &["date", "region"])?;
    debug!("{}", report);
    let (table, _) = DataProcessor::sort_by(&table, "date", false)?;
    Ok(table)
}

fn required<'a>(table: &'a Table, name: &str) -> Result<&'a Column, ValidationError> {
    table
        .column(name)
        .ok_or_else(|| ValidationError::MissingColumns(vec![name.to_string()]))
}

fn parse_date_column(table: &Table) -> Result<Column, ValidationError> {
    let column = required(table, "date")?;
    let cells = column
        .cells()
        .iter()
        .map(|cell| match cell {
            Cell::Missing => Ok(Cell::Missing),
            Cell::Date(d) => Ok(Cell::Date(*d)),
            other => {
                let text = other.to_string();
                parse_date(&text)
                    .map(Cell::Date)
                    .ok_or(ValidationError::UnparsableDates {
                        column: "date".to_string(),
                        value: text,
                    })
            }
        })
        .collect::<Result<Vec<Cell>, ValidationError>>()?;
    Ok(Column::with_kind("date", ColumnKind::Date, cells))
}

/// Regions are labels, even when they look like numbers.
fn region_as_text(table: &Table) -> Column {
    let cells = table
        .column("region")
        .map(|c| {
            c.cells()
                .iter()
                .map(|cell| match cell {
                    Cell::Missing => Cell::Missing,
                    other => Cell::Text(other.to_string()),
                })
                .collect()
        })
        .unwrap_or_default();
    Column::with_kind("region", ColumnKind::Text, cells)
}

fn coerce_sales(table: &Table) -> Result<Column, ValidationError> {
    let column = required(table, "sales")?;
    let cells: Vec<Cell> = column
        .cells()
        .iter()
        .map(|c| c.coerce_number().map(Cell::Number).unwrap_or(Cell::Missing))
        .collect();
    if cells.iter().all(Cell::is_missing) {
        return Err(ValidationError::NonNumeric("sales".to_string()));
    }
    Ok(Column::with_kind("sales", ColumnKind::Number, cells))
}
