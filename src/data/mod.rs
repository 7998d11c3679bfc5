//! Data module - table model, loading, cleaning and export

pub mod dates;
mod exporter;
mod loader;
mod processor;
#[cfg(feature = "spreadsheet")]
mod spreadsheet;
pub mod table;

pub use exporter::{DataExporter, ExportError};
pub use loader::{DataLoader, FileFormat, LoadError};
pub use processor::{
    compare_cells, DataProcessor, Operation, RowPredicate, TransformReport, DATE_SAMPLE_SIZE,
};
pub use table::{Cell, Column, ColumnKind, RowView, Table, ValidationError};
