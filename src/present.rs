//! Table presentation helpers: plain-text preview and widget rows.

use crate::data::{Cell, Table};

/// Rows shown in a preview.
pub const PREVIEW_ROWS: usize = 10;

/// Shown in place of a missing value in the text preview.
const MISSING_MARK: &str = "NaN";

fn display(cell: &Cell) -> String {
    match cell {
        Cell::Missing => MISSING_MARK.to_string(),
        other => other.to_string(),
    }
}

/// Aligned plain-text view of the first `n` rows, with a row index column.
///
/// A table without columns renders as "No data"; a table without rows shows
/// its header followed by "(no rows)".
pub fn text_preview(table: &Table, n: usize) -> String {
    if table.width() == 0 {
        return "No data".to_string();
    }

    let shown = table.height().min(n);
    let index_width = shown.saturating_sub(1).to_string().len();
    let mut grid: Vec<Vec<String>> = Vec::with_capacity(shown + 1);
    grid.push(table.column_names());
    for row in 0..shown {
        grid.push(table.columns().iter().map(|c| display(&c.cells()[row])).collect());
    }

    let widths: Vec<usize> = (0..table.width())
        .map(|col| {
            grid.iter()
                .map(|line| line[col].chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    for (line_no, line) in grid.iter().enumerate() {
        let index = if line_no == 0 {
            String::new()
        } else {
            (line_no - 1).to_string()
        };
        let mut text = format!("{:>width$}", index, width = index_width);
        for (value, width) in line.iter().zip(&widths) {
            text.push_str("  ");
            text.push_str(&format!("{:>width$}", value, width = *width));
        }
        out.push_str(text.trim_end());
        out.push('\n');
    }
    if shown == 0 {
        out.push_str("(no rows)\n");
    } else if table.height() > shown {
        out.push_str(&format!("... {} more rows\n", table.height() - shown));
    }
    out
}

/// Displayed values for the listed columns, one tuple per row.
///
/// Absent columns and missing cells render as empty text.
pub fn widget_rows(table: &Table, columns: &[&str]) -> Vec<Vec<String>> {
    let selected: Vec<_> = columns.iter().map(|name| table.column(name)).collect();
    (0..table.height())
        .map(|row| {
            selected
                .iter()
                .map(|col| col.map(|c| c.cells()[row].to_string()).unwrap_or_default())
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DataLoader;

    #[test]
    fn test_preview_aligns_columns() {
        let table = DataLoader::load_csv_bytes(b"name,amount\nAnn,5\nBobby,\n").unwrap();
        let preview = text_preview(&table, PREVIEW_ROWS);
        let lines: Vec<&str> = preview.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "    name  amount");
        assert_eq!(lines[1], "0    Ann       5");
        assert_eq!(lines[2], "1  Bobby     NaN");
    }

    #[test]
    fn test_preview_truncates() {
        let mut csv = String::from("n\n");
        for i in 0..12 {
            csv.push_str(&format!("{}\n", i));
        }
        let table = DataLoader::load_csv_bytes(csv.as_bytes()).unwrap();
        let preview = text_preview(&table, PREVIEW_ROWS);
        assert_eq!(preview.lines().count(), 12);
        assert!(preview.ends_with("... 2 more rows\n"));
    }

    #[test]
    fn test_preview_empty_tables() {
        assert_eq!(text_preview(&Table::empty(), PREVIEW_ROWS), "No data");
        let header_only = Table::from_text_rows(&["a", "b"], &[]).unwrap();
        assert_eq!(text_preview(&header_only, PREVIEW_ROWS), "   a  b\n(no rows)\n");
    }

    #[test]
    fn test_widget_rows() {
        let table = DataLoader::load_csv_bytes(b"date,amount\n2024-01-05,3\n").unwrap();
        let rows = widget_rows(&table, &["date", "note", "amount"]);
        assert_eq!(rows, vec![vec!["2024-01-05".to_string(), String::new(), "3".to_string()]]);
    }
}
