// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JSON API routes.

use crate::error::Result;
use crate::models::YearToDateSummary;
use crate::AppState;
use axum::{extract::State, routing::get, Json, Router};
use chrono::Local;
use std::path::Path;
use std::sync::Arc;

/// API routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/summary", get(get_summary))
}

/// Year-to-date summary for the dashboard page's snapshot.
async fn get_summary(State(state): State<Arc<AppState>>) -> Result<Json<YearToDateSummary>> {
    let page = Path::new(&state.config.page_name);
    let snapshot = state.renderer.load_for(page).await?;
    let now = Local::now().naive_local();

    Ok(Json(YearToDateSummary::compute(&snapshot.runs, now)))
}
