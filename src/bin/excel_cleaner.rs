//! Excel Data Cleaner - load a CSV or spreadsheet, clean it and export the result.

use anyhow::{anyhow, Result};
use clap::Parser;
use eframe::egui;
use std::path::PathBuf;
use std::process::ExitCode;
use tidydesk::config::CLEANER_LOG;
use tidydesk::gui::{CleanerApp, Notice};
use tidydesk::logging;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "excel-cleaner", about = "Clean CSV and spreadsheet files")]
struct Cli {
    /// Directory for the log file. Defaults to the executable's directory.
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

fn run() -> Result<()> {
    info!("App started.");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 650.0])
            .with_min_inner_size([800.0, 500.0])
            .with_title("Excel Data Cleaner"),
        ..Default::default()
    };
    eframe::run_native(
        "Excel Data Cleaner",
        options,
        Box::new(|cc| Ok(Box::new(CleanerApp::new(cc)))),
    )
    .map_err(|e| anyhow!("window error: {}", e))?;

    info!("App closed.");
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_app_logging(cli.data_dir.as_deref(), CLEANER_LOG);
    logging::install_panic_hook(|message| {
        Notice::error(
            "Unhandled error",
            &format!("An unexpected error occurred. See {}.\n\n{}", CLEANER_LOG, message),
        );
    });
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{:#}", e);
            error!("Unhandled error: {:#}", e);
            Notice::error(
                "Unhandled error",
                &format!("An unexpected error occurred. See {}.\n\n{}", CLEANER_LOG, e),
            );
            ExitCode::FAILURE
        }
    }
}
