// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava API client for the ingestor.
//!
//! Handles:
//! - Refresh-token exchange (form or JSON body)
//! - Paged activity listing

use crate::config::{IngestConfig, TokenEncoding};
use crate::error::AppError;
use crate::models::StravaActivitySummary;
use serde::Deserialize;

/// Upstream page-size ceiling for `/athlete/activities`.
pub const MAX_PER_PAGE: u32 = 200;

/// Strava API client.
#[derive(Clone)]
pub struct StravaClient {
    http: reqwest::Client,
    base_url: String,
    token_url: String,
    client_id: String,
    client_secret: String,
    token_encoding: TokenEncoding,
}

impl StravaClient {
    /// Create a new Strava client with OAuth credentials.
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: crate::config::DEFAULT_STRAVA_API_BASE.to_string(),
            token_url: crate::config::DEFAULT_STRAVA_TOKEN_URL.to_string(),
            client_id,
            client_secret,
            token_encoding: TokenEncoding::default(),
        }
    }

    /// Create a client from ingestor configuration, honoring endpoint overrides.
    pub fn from_config(config: &IngestConfig) -> Self {
        Self {
            base_url: config.api_base.trim_end_matches('/').to_string(),
            token_url: config.token_url.clone(),
            token_encoding: config.token_encoding,
            ..Self::new(config.client_id.clone(), config.client_secret.clone())
        }
    }

    /// Exchange a refresh token for a short-lived access token.
    pub async fn refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<TokenRefreshResponse, AppError> {
        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ];

        let request = self.http.post(&self.token_url);
        let request = match self.token_encoding {
            TokenEncoding::Form => request.form(&params),
            TokenEncoding::Json => {
                let body: serde_json::Map<String, serde_json::Value> = params
                    .iter()
                    .map(|(k, v)| (k.to_string(), serde_json::Value::from(*v)))
                    .collect();
                request.json(&body)
            }
        };

        let response = request
            .send()
            .await
            .map_err(|e| AppError::StravaApi(format!("Token refresh request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::TokenRefresh { status, body });
        }

        response
            .json()
            .await
            .map_err(|e| AppError::StravaApi(format!("Failed to parse token response: {}", e)))
    }

    /// List one page of the athlete's activities, most recent first.
    pub async fn list_activities(
        &self,
        access_token: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<StravaActivitySummary>, AppError> {
        let url = format!("{}/athlete/activities", self.base_url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .query(&[
                ("per_page", per_page.min(MAX_PER_PAGE).to_string()),
                ("page", page.to_string()),
            ])
            .send()
            .await
            .map_err(|e| AppError::StravaApi(format!("Activities request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            if status == 429 {
                tracing::warn!(page, "Strava rate limit hit (429)");
            }
            return Err(AppError::ActivitiesPage { page, status, body });
        }

        response
            .json()
            .await
            .map_err(|e| AppError::StravaApi(format!("JSON parse error on page {}: {}", page, e)))
    }
}

/// Token refresh response from Strava.
///
/// Strava rotates the refresh token on every exchange, but the ingestor
/// reads its refresh token from the environment and never persists the new
/// one.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenRefreshResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_at: Option<i64>,
}
