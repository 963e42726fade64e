// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use crate::config::ConfigError;
use crate::services::snapshot::SnapshotError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type.
///
/// Ingest failures are fatal and surface through `main`; server failures
/// convert to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Token refresh failed: HTTP {status}: {body}")]
    TokenRefresh { status: u16, body: String },

    #[error("Activities fetch failed on page {page}: HTTP {status}: {body}")]
    ActivitiesPage { page: u32, status: u16, body: String },

    #[error("Strava API error: {0}")]
    StravaApi(String),

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// HTTP status returned by Strava, if this error carries one.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            AppError::TokenRefresh { status, .. } | AppError::ActivitiesPage { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", Some(msg.clone())),
            AppError::Snapshot(err) => {
                tracing::error!(error = %err, "Snapshot unavailable");
                (StatusCode::BAD_GATEWAY, "snapshot_unavailable", None)
            }
            AppError::TokenRefresh { .. }
            | AppError::ActivitiesPage { .. }
            | AppError::StravaApi(_) => (
                StatusCode::BAD_GATEWAY,
                "strava_error",
                Some(self.to_string()),
            ),
            AppError::Config(err) => {
                tracing::error!(error = %err, "Configuration error");
                (StatusCode::INTERNAL_SERVER_ERROR, "config_error", None)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers and the ingestor
pub type Result<T> = std::result::Result<T, AppError>;
