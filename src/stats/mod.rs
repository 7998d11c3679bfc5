//! Statistics module - descriptive summaries of numeric columns

mod summary;

pub use summary::SummaryStats;
