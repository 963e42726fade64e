// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Render the dashboard into the site's page ahead of time.
//!
//! Writes to `DASHBOARD_OUTPUT` when set, otherwise rewrites the page in
//! place. Rendering is idempotent, so re-running against an already
//! rendered page is safe. A page without the dashboard container is left
//! unchanged.

use chrono::Local;
use run_dashboard::{
    config::DashboardConfig, logging::init_logging, render::DashboardRenderer,
    render::RenderOutcome, services::SnapshotLoader,
};
use std::path::Path;
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    init_logging();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Dashboard render failed");
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    let config = DashboardConfig::from_env()?;
    let page = Path::new(&config.page_name).to_path_buf();
    let renderer = DashboardRenderer::new(SnapshotLoader::new(), config.clone());

    let (html, outcome) = renderer
        .render_file(&page, Local::now().naive_local())
        .await?;

    // `page_name` is never empty, so the page always counts as the dashboard.
    match outcome {
        None | Some(RenderOutcome::MissingContainer) => {
            tracing::warn!(page = %page.display(), "Page left unchanged");
            return Ok(());
        }
        Some(outcome) => tracing::debug!(?outcome, "Render finished"),
    }

    let target = config
        .output_path
        .clone()
        .unwrap_or_else(|| config.site_dir.join(&page));
    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&target, html).await?;

    tracing::info!(output = %target.display(), "Dashboard page written");
    Ok(())
}
