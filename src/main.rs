// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Run-Dashboard Server
//!
//! Serves the static site and renders this year's running stats into the
//! dashboard page on every request.

use run_dashboard::{
    config::DashboardConfig, logging::init_logging, render::DashboardRenderer,
    services::SnapshotLoader, AppState,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let config = DashboardConfig::from_env()?;
    tracing::info!(
        port = config.port,
        site_dir = %config.site_dir.display(),
        page = %config.page_name,
        "Starting Run-Dashboard server"
    );

    let renderer = DashboardRenderer::new(SnapshotLoader::new(), config.clone());
    let state = Arc::new(AppState {
        config: config.clone(),
        renderer,
    });

    let app = run_dashboard::routes::create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}
