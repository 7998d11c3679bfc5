//! Dashboard module - sales upload, filtered view, download and web server

mod server;
mod store;
mod upload;
mod view;

pub use server::{configure, run, DownloadRequest, JSON_LIMIT};
pub use store::{download, Download, StoredView};
pub use upload::{parse_upload, REQUIRED_COLUMNS};
pub use view::{update_dashboard, DashboardInputs, DashboardOutputs};

use crate::data::{ExportError, LoadError, ValidationError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("No file contents provided.")]
    NoContents,
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("Invalid stored view: {0}")]
    Store(#[from] serde_json::Error),
    #[error(transparent)]
    Export(#[from] ExportError),
}
