// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Static site serving with the dashboard rendered at load time.

use crate::error::{AppError, Result};
use crate::render::{is_dashboard_page, RenderOutcome};
use crate::AppState;
use axum::{
    extract::{Request, State},
    response::{Html, IntoResponse, Response},
};
use chrono::Local;
use std::path::{Component, PathBuf};
use std::sync::Arc;
use tower::ServiceExt;
use tower_http::services::ServeDir;

/// Serve a file from the site directory.
///
/// The dashboard page runs the render pipeline; every other path is served
/// unchanged.
pub async fn serve_site(State(state): State<Arc<AppState>>, req: Request) -> Response {
    let path = req.uri().path().to_string();

    if is_dashboard_page(&path, &state.config.page_name) {
        return render_dashboard(&state, &path).await.into_response();
    }

    match ServeDir::new(&state.config.site_dir).oneshot(req).await {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    }
}

async fn render_dashboard(state: &AppState, path: &str) -> Result<Html<String>> {
    let page = site_relative_path(path)?;
    let now = Local::now().naive_local();

    let (html, outcome) = state.renderer.render_file(&page, now).await?;
    match outcome {
        Some(RenderOutcome::LoadFailed { reason }) => {
            tracing::warn!(page = %page.display(), reason = %reason, "Dashboard rendered with error state");
        }
        Some(outcome) => tracing::debug!(page = %page.display(), ?outcome, "Dashboard page served"),
        None => {}
    }

    Ok(Html(html))
}

/// Convert a request path into a path relative to the site root.
fn site_relative_path(path: &str) -> Result<PathBuf> {
    let relative = PathBuf::from(path.trim_start_matches('/'));

    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_)))
    {
        return Err(AppError::NotFound(path.to_string()));
    }
    Ok(relative)
}
