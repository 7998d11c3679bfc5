//! Expenses module - append-only expense log, categories and the tracker state

mod book;
mod categories;
mod record;
mod store;

pub use book::{BookError, ExpenseBook, SortState};
pub use categories::{CategoryConfig, DEFAULT_CATEGORIES};
pub use record::{
    records_from_table, records_table, ExpenseColumn, ExpenseRecord, FormError, LOG_HEADER,
};
pub use store::{BackupError, ExpenseStore, WriteError};
