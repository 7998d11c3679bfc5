//! Expense Tracker - append-only CSV expense log with categories, backups and a summary chart.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use eframe::egui;
use std::path::PathBuf;
use std::process::ExitCode;
use tidydesk::config::{AppPaths, TRACKER_LOG};
use tidydesk::expenses::ExpenseBook;
use tidydesk::gui::{ExpenseApp, Notice};
use tidydesk::logging;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "expense-tracker", about = "Track expenses in a local CSV log")]
struct Cli {
    /// Directory for the log, backups, config and log file. Defaults to the executable's directory.
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

fn run(cli: &Cli) -> Result<()> {
    info!("App started.");
    let paths = AppPaths::resolve(cli.data_dir.as_deref(), TRACKER_LOG)?;
    std::fs::create_dir_all(&paths.base_dir)
        .with_context(|| format!("creating {}", paths.base_dir.display()))?;

    let book = ExpenseBook::open(paths)?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 520.0])
            .with_title("ExpenseTracker"),
        ..Default::default()
    };
    eframe::run_native(
        "ExpenseTracker",
        options,
        Box::new(|cc| Ok(Box::new(ExpenseApp::new(cc, book)))),
    )
    .map_err(|e| anyhow!("window error: {}", e))?;

    info!("App closed.");
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_app_logging(cli.data_dir.as_deref(), TRACKER_LOG);
    logging::install_panic_hook(|message| {
        Notice::error(
            "Unhandled error",
            &format!("An unexpected error occurred. See {}.\n\n{}", TRACKER_LOG, message),
        );
    });
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{:#}", e);
            error!("Unhandled error: {:#}", e);
            Notice::error(
                "Unhandled error",
                &format!("An unexpected error occurred. See {}.\n\n{}", TRACKER_LOG, e),
            );
            ExitCode::FAILURE
        }
    }
}
