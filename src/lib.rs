//! Tidydesk - small desktop and web utilities around a tabular cleaning pipeline.
//!
//! Three apps share this crate: a table cleaner, an expense tracker and a
//! sales dashboard. Each one loads a table, transforms or filters it,
//! renders it and saves it.

pub mod charts;
pub mod cleaner;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod expenses;
pub mod gui;
pub mod logging;
pub mod present;
pub mod stats;
