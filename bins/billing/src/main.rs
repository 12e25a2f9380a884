//! Tutorbill billing CLI
//!
//! Runs the month-end billing jobs on demand: professor reports, the monthly
//! tracker snapshot, and balance reconciliation.

mod cli;
mod commands;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Commands};
use commands::{App, CommandError};
use tutorbill_core::reports::{ReportService, ReportSettings};
use tutorbill_db::{BillingRepository, connect};
use tutorbill_shared::AppConfig;

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tutorbill=debug,billing=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(CommandError::App(err)) => {
            error!(code = err.error_code(), status = err.status_code(), "{err}");
            if err.is_client_error() {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
        Err(CommandError::Other(err)) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CommandError> {
    let config = AppConfig::load().map_err(anyhow::Error::from)?;
    let settings = ReportSettings::from_config(&config.billing)?;

    let db = connect(&config.database)
        .await
        .map_err(|e| anyhow::anyhow!("failed to connect to database: {e}"))?;

    let repo = Arc::new(BillingRepository::new(db));
    let app = App {
        reports: ReportService::new(Arc::clone(&repo), settings),
        repo,
    };

    let settings = app.reports.settings();
    info!(
        window = %settings.window_policy,
        special = ?settings.special_professor_id,
        concurrency = settings.concurrency,
        "Connected to database"
    );

    let out = cli.out.as_deref();
    match cli.command {
        Commands::Report { professor, month } => emit(out, &app.report(professor, &month).await?),
        Commands::SpecialReport { month } => emit(out, &app.special_report(&month).await?),
        Commands::GeneralReport { month } => emit(out, &app.general_report(&month).await?),
        Commands::Snapshot {
            month,
            excedents,
            save,
        } => emit(out, &app.snapshot(&month, excedents.as_deref(), save).await?),
        Commands::Reconcile { input, tracker } => emit(
            out,
            &app.reconcile(input.as_deref(), tracker.as_deref()).await?,
        ),
        Commands::Penalize { class, status } => {
            emit(out, &app.penalize(class, status.into()).await?)
        }
    }
}

/// Writes pretty JSON to `out`, or stdout when no file is given.
fn emit<T: Serialize>(out: Option<&std::path::Path>, value: &T) -> Result<(), CommandError> {
    let json = serde_json::to_string_pretty(value).map_err(anyhow::Error::from)?;
    match out {
        Some(path) => {
            std::fs::write(path, json).map_err(anyhow::Error::from)?;
            info!(path = %path.display(), "Output written");
        }
        None => println!("{json}"),
    }
    Ok(())
}
