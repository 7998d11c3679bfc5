//! Sales Dashboard - local web page for exploring an uploaded sales CSV.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tidydesk::config::{DashboardSettings, DASHBOARD_LOG};
use tidydesk::{dashboard, logging};

#[derive(Parser)]
#[command(name = "sales-dashboard", about = "Serve the sales dashboard page")]
struct Cli {
    /// Address to bind.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to bind.
    #[arg(long, default_value_t = 8050)]
    port: u16,

    /// Directory for the log file. Defaults to the executable's directory.
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

#[actix_web::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_app_logging(cli.data_dir.as_deref(), DASHBOARD_LOG);
    logging::install_panic_hook(|_| {});

    let settings = DashboardSettings {
        host: cli.host,
        port: cli.port,
    };
    println!("Sales Dashboard running on http://{}:{}/", settings.host, settings.port);

    dashboard::run(settings.clone())
        .await
        .with_context(|| format!("serving on {}:{}", settings.host, settings.port))
}
