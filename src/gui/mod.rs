//! GUI module - egui windows for the cleaner and the expense tracker

mod app;
mod category_editor;
mod chart_viewer;
mod control_panel;
mod expense_app;
mod notice;

pub use app::CleanerApp;
pub use category_editor::CategoryEditor;
pub use chart_viewer::ChartViewer;
pub use control_panel::{ControlPanel, ControlPanelAction};
pub use expense_app::ExpenseApp;
pub use notice::Notice;
