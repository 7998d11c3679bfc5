//! Stored filtered view: `{"columns": [...], "data": [[...]]}` with ISO dates.

use crate::data::{Cell, Column, DataExporter, Table};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::DashboardError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredView {
    pub columns: Vec<String>,
    pub data: Vec<Vec<Value>>,
}

impl StoredView {
    pub fn from_table(table: &Table) -> Self {
        let data = (0..table.height())
            .map(|row| table.row(row).iter().map(cell_value).collect())
            .collect();
        Self {
            columns: table.column_names(),
            data,
        }
    }

    /// Rebuild a table; short rows are padded with missing cells.
    pub fn to_table(&self) -> Result<Table, DashboardError> {
        let columns = self
            .columns
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let cells = self
                    .data
                    .iter()
                    .map(|row| row.get(idx).map(value_cell).unwrap_or(Cell::Missing))
                    .collect();
                Column::new(name.as_str(), cells)
            })
            .collect();
        Ok(Table::new(columns)?)
    }

    pub fn to_json(&self) -> Result<String, DashboardError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, DashboardError> {
        Ok(serde_json::from_str(json)?)
    }
}

fn cell_value(cell: &Cell) -> Value {
    match cell {
        Cell::Number(v) => serde_json::Number::from_f64(*v)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        Cell::Date(d) => Value::String(d.format("%Y-%m-%d").to_string()),
        Cell::Text(s) => Value::String(s.clone()),
        Cell::Missing => Value::Null,
    }
}

fn value_cell(value: &Value) -> Cell {
    match value {
        Value::Null => Cell::Missing,
        Value::Number(n) => n.as_f64().map(Cell::Number).unwrap_or(Cell::Missing),
        Value::String(s) => Cell::Text(s.clone()),
        other => Cell::Text(other.to_string()),
    }
}

/// A file offered to the browser.
#[derive(Debug, Clone, PartialEq)]
pub struct Download {
    pub file_name: &'static str,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// CSV of the stored view, or a placeholder text file when nothing is stored.
pub fn download(stored: Option<&str>) -> Result<Download, DashboardError> {
    let Some(json) = stored.filter(|s| !s.trim().is_empty()) else {
        return Ok(Download {
            file_name: "empty.txt",
            content_type: "text/plain; charset=utf-8",
            bytes: b"No data to download".to_vec(),
        });
    };
    let table = StoredView::from_json(json)?.to_table()?;
    Ok(Download {
        file_name: "filtered_data.csv",
        content_type: "text/csv; charset=utf-8",
        bytes: DataExporter::csv_bytes(&table)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn view_table() -> Table {
        Table::new(vec![
            Column::new(
                "date",
                vec![Cell::Date(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap())],
            ),
            Column::new("region", vec![Cell::Text("North".into())]),
            Column::new("sales", vec![Cell::Missing]),
        ])
        .unwrap()
    }

    #[test]
    fn test_store_json_shape() {
        let json = StoredView::from_table(&view_table()).to_json().unwrap();
        assert_eq!(
            json,
            r#"{"columns":["date","region","sales"],"data":[["2024-01-02","North",null]]}"#
        );
    }

    #[test]
    fn test_download_csv() {
        let json = StoredView::from_table(&view_table()).to_json().unwrap();
        let file = download(Some(&json)).unwrap();
        assert_eq!(file.file_name, "filtered_data.csv");
        assert_eq!(
            String::from_utf8(file.bytes).unwrap(),
            "date,region,sales\n2024-01-02,North,\n"
        );
    }

    #[test]
    fn test_download_placeholder() {
        for stored in [None, Some(""), Some("  ")] {
            let file = download(stored).unwrap();
            assert_eq!(file.file_name, "empty.txt");
            assert_eq!(file.bytes, b"No data to download");
        }
    }

    #[test]
    fn test_download_rejects_garbage() {
        assert!(matches!(
            download(Some("{nope")),
            Err(DashboardError::Store(_))
        ));
    }
}
