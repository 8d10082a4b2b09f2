mod backend;
mod commands;
mod config;
mod errors;
mod fetch;
mod models;
mod render;
mod routes;
mod state;
mod upload;
mod views;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

#[derive(Parser)]
#[command(name = "rfp-portal")]
#[command(about = "Upload RFP documents and review their compliance analysis", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the local analysis backend (upload, result and report endpoints)
    Serve,
    /// Upload a PDF, then wait for and print its compliance report
    Analyze {
        file: PathBuf,
        /// Stop after the upload is acknowledged
        #[arg(long, default_value_t = false)]
        no_wait: bool,
        /// Times to resubmit the file after a network failure
        #[arg(long, default_value_t = 0)]
        upload_retries: u32,
    },
    /// Wait for the current compliance report and print it
    Report {
        /// Print the rendered panels as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
        /// Fresh polling sessions to start if the first one times out
        #[arg(long, default_value_t = 0)]
        retries: u32,
    },
    /// Save the persisted report PDF
    DownloadReport {
        #[arg(long)]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let result = match cli.command {
        Command::Serve => commands::serve(config).await,
        Command::Analyze {
            file,
            no_wait,
            upload_retries,
        } => commands::analyze(&config, &file, no_wait, upload_retries).await,
        Command::Report { json, retries } => commands::report(&config, json, retries).await,
        Command::DownloadReport { out } => commands::download_report(&config, &out).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
