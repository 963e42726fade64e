// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fetch this year's runs from Strava and overwrite the snapshot file.
//!
//! Meant to run from a scheduled job. Any failure exits non-zero and leaves
//! the previous snapshot untouched.

use chrono::{Local, Utc};
use run_dashboard::{config::IngestConfig, logging::init_logging, services::Ingestor};
use std::process::ExitCode;

fn main() -> ExitCode {
    init_logging();

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to start runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Strava ingest failed");
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    let config = IngestConfig::from_env()?;
    tracing::info!(
        snapshot_path = %config.snapshot_path.display(),
        "Starting Strava ingest"
    );

    let report = Ingestor::new(&config)
        .run(Local::now().naive_local(), Utc::now())
        .await?;

    tracing::info!(
        runs = report.runs_written,
        activities = report.activities_fetched,
        pages = report.pages_fetched,
        "Snapshot updated"
    );
    println!(
        "Wrote {} runs to {}",
        report.runs_written,
        report.snapshot_path.display()
    );
    Ok(())
}
