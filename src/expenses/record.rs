//! Expense Record Module
//! One row of the expense log, form validation and its table form.

use crate::data::table::parse_number;
use crate::data::{Cell, Column, ColumnKind, Table};
use crate::present::widget_rows;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Header row of the expense log.
pub const LOG_HEADER: [&str; 4] = ["date", "category", "amount", "note"];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Please enter date, category and amount.")]
    MissingFields,
    #[error("Amount must be a number.")]
    AmountNotNumeric,
}

/// A logged expense. Every field is kept as text, exactly as written.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub date: String,
    pub category: String,
    pub amount: String,
    pub note: String,
}

/// Columns of the expense table, in log order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpenseColumn {
    Date,
    Category,
    Amount,
    Note,
}

impl ExpenseColumn {
    pub const ALL: [ExpenseColumn; 4] = [
        ExpenseColumn::Date,
        ExpenseColumn::Category,
        ExpenseColumn::Amount,
        ExpenseColumn::Note,
    ];

    pub fn name(self) -> &'static str {
        LOG_HEADER[self as usize]
    }

    /// Column heading shown in the table.
    pub fn title(self) -> &'static str {
        match self {
            ExpenseColumn::Date => "Date",
            ExpenseColumn::Category => "Category",
            ExpenseColumn::Amount => "Amount",
            ExpenseColumn::Note => "Note",
        }
    }
}

impl ExpenseRecord {
    /// Validate form input. Fields are trimmed; the note may be empty.
    pub fn from_form(
        date: &str,
        category: &str,
        amount: &str,
        note: &str,
    ) -> Result<Self, FormError> {
        let (date, category, amount, note) =
            (date.trim(), category.trim(), amount.trim(), note.trim());
        if date.is_empty() || category.is_empty() || amount.is_empty() {
            return Err(FormError::MissingFields);
        }
        if parse_number(amount).is_none() {
            return Err(FormError::AmountNotNumeric);
        }
        Ok(Self {
            date: date.to_string(),
            category: category.to_string(),
            amount: amount.to_string(),
            note: note.to_string(),
        })
    }

    /// Build from raw CSV fields: short rows are padded with empty text, long rows truncated.
    pub fn from_fields<S: AsRef<str>>(fields: &[S]) -> Self {
        let field = |i: usize| {
            fields
                .get(i)
                .map(|s| s.as_ref().to_string())
                .unwrap_or_default()
        };
        Self {
            date: field(0),
            category: field(1),
            amount: field(2),
            note: field(3),
        }
    }

    /// Fields in log order.
    pub fn fields(&self) -> [&str; 4] {
        [
            self.date.as_str(),
            self.category.as_str(),
            self.amount.as_str(),
            self.note.as_str(),
        ]
    }

    pub fn field(&self, column: ExpenseColumn) -> &str {
        self.fields()[column as usize]
    }

    pub fn amount_value(&self) -> Option<f64> {
        parse_number(&self.amount)
    }
}

/// The records as a table of text columns named after [`LOG_HEADER`].
///
/// Values are kept verbatim, so an empty note stays empty text rather than missing.
pub fn records_table(records: &[ExpenseRecord]) -> Table {
    let columns = ExpenseColumn::ALL
        .iter()
        .map(|&column| {
            let cells = records
                .iter()
                .map(|r| Cell::Text(r.field(column).to_string()))
                .collect();
            Column::with_kind(column.name(), ColumnKind::Text, cells)
        })
        .collect();
    // Fixed header, one cell per record in every column.
    Table::new(columns).unwrap_or_default()
}

/// Records read back from a table laid out like [`records_table`].
pub fn records_from_table(table: &Table) -> Vec<ExpenseRecord> {
    widget_rows(table, &LOG_HEADER)
        .iter()
        .map(|fields| ExpenseRecord::from_fields(fields.as_slice()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str, category: &str, amount: &str, note: &str) -> ExpenseRecord {
        ExpenseRecord::from_form(date, category, amount, note).unwrap()
    }

    #[test]
    fn test_from_form_trims() {
        let r = record(" 2024-01-05 ", "Food ", " 12.50", " lunch ");
        assert_eq!(r.fields(), ["2024-01-05", "Food", "12.50", "lunch"]);
    }

    #[test]
    fn test_from_form_rejects() {
        assert_eq!(
            ExpenseRecord::from_form("2024-01-05", "", "3", ""),
            Err(FormError::MissingFields)
        );
        assert_eq!(
            ExpenseRecord::from_form("  ", "Food", "3", ""),
            Err(FormError::MissingFields)
        );
        let err = ExpenseRecord::from_form("2024-01-05", "Food", "abc", "").unwrap_err();
        assert_eq!(err, FormError::AmountNotNumeric);
        assert_eq!(err.to_string(), "Amount must be a number.");
    }

    #[test]
    fn test_from_fields_pads_and_truncates() {
        let short = ExpenseRecord::from_fields(&["2024-01-05", "Food", "3"]);
        assert_eq!(short.note, "");
        let long = ExpenseRecord::from_fields(&["d", "c", "1", "n", "extra"]);
        assert_eq!(long.fields(), ["d", "c", "1", "n"]);
    }

    #[test]
    fn test_records_table_keeps_text() {
        let records = vec![
            record("2024-01-05", "Food", "12.50", "Lunch with Sam"),
            record("2024-02-01", "Rent", "800", ""),
        ];
        let table = records_table(&records);
        assert_eq!(table.column_names(), LOG_HEADER);
        assert_eq!(table.cell(0, "amount"), Some(&Cell::Text("12.50".into())));
        assert_eq!(table.cell(1, "note"), Some(&Cell::Text(String::new())));
        assert_eq!(records_from_table(&table), records);
    }

    #[test]
    fn test_records_table_empty() {
        let table = records_table(&[]);
        assert_eq!(table.width(), 4);
        assert_eq!(table.height(), 0);
        assert!(records_from_table(&table).is_empty());
    }

    #[test]
    fn test_column_names() {
        let names: Vec<&str> = ExpenseColumn::ALL.iter().map(|c| c.name()).collect();
        assert_eq!(names, LOG_HEADER);
        let r = record("2024-01-05", "Food", "1", "x");
        assert_eq!(r.field(ExpenseColumn::Category), "Food");
    }
}
