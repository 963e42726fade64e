// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Configuration loaded from environment variables.
//!
//! The ingestor and the dashboard read disjoint sets of variables, so each
//! gets its own struct. Both are built once at startup and passed down
//! explicitly; nothing below the binaries reads the process environment.

use crate::render::format::DateStyle;
use std::env;
use std::path::PathBuf;

/// Strava API base URL.
pub const DEFAULT_STRAVA_API_BASE: &str = "https://www.strava.com/api/v3";
/// Strava OAuth token endpoint.
pub const DEFAULT_STRAVA_TOKEN_URL: &str = "https://www.strava.com/oauth/token";
/// Where the ingestor writes the snapshot.
pub const DEFAULT_SNAPSHOT_PATH: &str = "data/strava.json";
/// Root-relative snapshot location (GitHub Pages project path).
pub const DEFAULT_SNAPSHOT_PRIMARY: &str = "/portfolio-page/data/strava.json";
/// Page-relative snapshot location.
pub const DEFAULT_SNAPSHOT_SECONDARY: &str = "data/strava.json";
/// The only page the dashboard pipeline renders into.
pub const DEFAULT_DASHBOARD_PAGE: &str = "sport.html";
/// Number of runs shown in the recent list.
pub const DEFAULT_RECENT_RUNS_LIMIT: usize = 12;

/// How the refresh-token exchange body is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenEncoding {
    /// `application/x-www-form-urlencoded` (most compatible)
    #[default]
    Form,
    /// `application/json`
    Json,
}

impl TokenEncoding {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "form" | "form-urlencoded" => Some(Self::Form),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Ingestor configuration.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    // --- Secrets ---
    /// Strava OAuth client ID
    pub client_id: String,
    /// Strava OAuth client secret
    pub client_secret: String,
    /// Long-lived refresh token for the athlete
    pub refresh_token: String,

    // --- Non-sensitive ---
    /// Snapshot output path
    pub snapshot_path: PathBuf,
    /// Strava API base URL (overridable for tests)
    pub api_base: String,
    /// Token endpoint URL (overridable for tests)
    pub token_url: String,
    /// Encoding for the token exchange body
    pub token_encoding: TokenEncoding,
}

impl IngestConfig {
    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// Every required secret is checked before returning, so the error lists
    /// all missing names at once.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = |name: &'static str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let client_id = secret("STRAVA_CLIENT_ID");
        let client_secret = secret("STRAVA_CLIENT_SECRET");
        let refresh_token = secret("STRAVA_REFRESH_TOKEN");

        let (client_id, client_secret, refresh_token) =
            match (client_id, client_secret, refresh_token) {
                (Some(id), Some(secret), Some(refresh)) => (id, secret, refresh),
                (id, secret, refresh) => {
                    let missing = [
                        ("STRAVA_CLIENT_ID", id.is_none()),
                        ("STRAVA_CLIENT_SECRET", secret.is_none()),
                        ("STRAVA_REFRESH_TOKEN", refresh.is_none()),
                    ]
                    .into_iter()
                    .filter_map(|(name, absent)| absent.then_some(name))
                    .collect();
                    return Err(ConfigError::MissingSecrets(missing));
                }
            };

        let token_encoding = match lookup("STRAVA_TOKEN_ENCODING") {
            Some(raw) => TokenEncoding::parse(&raw).ok_or(ConfigError::Invalid {
                name: "STRAVA_TOKEN_ENCODING",
                value: raw,
            })?,
            None => TokenEncoding::default(),
        };

        Ok(Self {
            client_id,
            client_secret,
            refresh_token,
            snapshot_path: lookup("SNAPSHOT_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SNAPSHOT_PATH)),
            api_base: lookup("STRAVA_API_BASE")
                .unwrap_or_else(|| DEFAULT_STRAVA_API_BASE.to_string()),
            token_url: lookup("STRAVA_TOKEN_URL")
                .unwrap_or_else(|| DEFAULT_STRAVA_TOKEN_URL.to_string()),
            token_encoding,
        })
    }

    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            client_id: "test_client_id".to_string(),
            client_secret: "test_secret".to_string(),
            refresh_token: "test_refresh_token".to_string(),
            snapshot_path: PathBuf::from(DEFAULT_SNAPSHOT_PATH),
            api_base: DEFAULT_STRAVA_API_BASE.to_string(),
            token_url: DEFAULT_STRAVA_TOKEN_URL.to_string(),
            token_encoding: TokenEncoding::Form,
        }
    }
}

/// Dashboard (render pipeline) configuration.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Site root directory; root-relative snapshot paths resolve against it
    pub site_dir: PathBuf,
    /// Page name the pipeline activates on
    pub page_name: String,
    /// First snapshot location to try
    pub snapshot_primary: String,
    /// Fallback snapshot location
    pub snapshot_secondary: String,
    /// Regional date convention
    pub date_style: DateStyle,
    /// Maximum number of runs in the recent list
    pub recent_limit: usize,
    /// Server port
    pub port: u16,
    /// Render output path (render binary only; `None` renders in place)
    pub output_path: Option<PathBuf>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            site_dir: PathBuf::from("."),
            page_name: DEFAULT_DASHBOARD_PAGE.to_string(),
            snapshot_primary: DEFAULT_SNAPSHOT_PRIMARY.to_string(),
            snapshot_secondary: DEFAULT_SNAPSHOT_SECONDARY.to_string(),
            date_style: DateStyle::default(),
            recent_limit: DEFAULT_RECENT_RUNS_LIMIT,
            port: 8080,
            output_path: None,
        }
    }
}

impl DashboardConfig {
    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let recent_limit = match lookup("RECENT_RUNS_LIMIT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                name: "RECENT_RUNS_LIMIT",
                value: raw,
            })?,
            None => defaults.recent_limit,
        };

        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value: raw,
            })?,
            None => defaults.port,
        };

        let page_name = match lookup("DASHBOARD_PAGE") {
            Some(raw) if raw.trim().is_empty() => {
                return Err(ConfigError::Invalid {
                    name: "DASHBOARD_PAGE",
                    value: raw,
                })
            }
            Some(raw) => raw.trim().to_string(),
            None => defaults.page_name,
        };

        Ok(Self {
            site_dir: lookup("SITE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.site_dir),
            page_name,
            snapshot_primary: lookup("SNAPSHOT_PRIMARY").unwrap_or(defaults.snapshot_primary),
            snapshot_secondary: lookup("SNAPSHOT_SECONDARY")
                .unwrap_or(defaults.snapshot_secondary),
            date_style: lookup("DATE_LOCALE")
                .map(|tag| DateStyle::for_locale(&tag))
                .unwrap_or(defaults.date_style),
            recent_limit,
            port,
            output_path: lookup("DASHBOARD_OUTPUT").map(PathBuf::from),
        })
    }

    /// Snapshot locations in the order they should be tried.
    pub fn snapshot_locations(&self) -> [&str; 2] {
        [&self.snapshot_primary, &self.snapshot_secondary]
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variables: {}", .0.join(", "))]
    MissingSecrets(Vec<&'static str>),

    #[error("Invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}
