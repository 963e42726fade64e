// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Snapshot persistence and loading.
//!
//! The ingestor overwrites the snapshot file in one step. The dashboard
//! reads it from an ordered list of sources, taking the first one that
//! loads and parses.

use crate::models::Snapshot;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Write a snapshot as pretty-printed JSON, replacing any previous file.
///
/// Parent directories are created as needed. The document goes to a sibling
/// temp file first and is renamed into place, so readers see either the old
/// or the new snapshot.
pub fn write_snapshot<P: AsRef<Path>>(path: P, snapshot: &Snapshot) -> Result<(), SnapshotError> {
    let path = path.as_ref();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| SnapshotError::Io {
            path: parent.to_path_buf(),
            message: e.to_string(),
        })?;
    }

    let mut json = serde_json::to_string_pretty(snapshot)
        .map_err(|e| SnapshotError::Parse(e.to_string()))?;
    json.push('\n');

    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    let io_err = |e: std::io::Error| SnapshotError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    };
    fs::write(&tmp_path, json).map_err(io_err)?;
    fs::rename(&tmp_path, path).map_err(io_err)?;

    tracing::debug!(path = %path.display(), runs = snapshot.runs.len(), "Snapshot written");
    Ok(())
}

/// Read a snapshot file.
pub fn read_snapshot<P: AsRef<Path>>(path: P) -> Result<Snapshot, SnapshotError> {
    let path = path.as_ref();
    let json = fs::read_to_string(path).map_err(|e| SnapshotError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    parse_snapshot(&json)
}

/// Parse snapshot JSON.
pub fn parse_snapshot(json: &str) -> Result<Snapshot, SnapshotError> {
    serde_json::from_str(json).map_err(|e| SnapshotError::Parse(e.to_string()))
}

/// One place a snapshot can be loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotSource {
    Http { url: String },
    File { path: PathBuf },
}

impl SnapshotSource {
    /// Resolve a configured location the way a browser resolves a link on
    /// `page`.
    ///
    /// - `http://` / `https://` URLs are fetched as-is.
    /// - Root-relative paths (`/a/b.json`) resolve against `site_dir`.
    /// - Anything else resolves against the page's directory.
    ///
    /// `page` is the page path relative to the site root.
    pub fn resolve(location: &str, site_dir: &Path, page: &Path) -> Self {
        let location = location.trim();
        if location.starts_with("http://") || location.starts_with("https://") {
            return SnapshotSource::Http {
                url: location.to_string(),
            };
        }

        let path = match location.strip_prefix('/') {
            Some(root_relative) => site_dir.join(root_relative),
            None => {
                let page_dir = page.parent().unwrap_or_else(|| Path::new(""));
                site_dir.join(page_dir).join(location)
            }
        };
        SnapshotSource::File { path }
    }
}

impl fmt::Display for SnapshotSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotSource::Http { url } => f.write_str(url),
            SnapshotSource::File { path } => write!(f, "{}", path.display()),
        }
    }
}

/// Loads snapshots, trying sources in order.
#[derive(Clone, Default)]
pub struct SnapshotLoader {
    http: reqwest::Client,
}

impl SnapshotLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from the first source that yields a parseable snapshot.
    ///
    /// Sources are tried one after another; a later source is only touched
    /// once the previous one has failed.
    pub async fn load(&self, sources: &[SnapshotSource]) -> Result<Snapshot, SnapshotError> {
        let mut failures = Vec::with_capacity(sources.len());

        for source in sources {
            match self.load_one(source).await {
                Ok(snapshot) => {
                    tracing::debug!(source = %source, runs = snapshot.runs.len(), "Snapshot loaded");
                    return Ok(snapshot);
                }
                Err(e) => {
                    tracing::warn!(source = %source, error = %e, "Snapshot source failed");
                    failures.push(format!("{}: {}", source, e));
                }
            }
        }

        Err(SnapshotError::AllSourcesFailed(failures))
    }

    /// Load from a single source, bypassing caches.
    pub async fn load_one(&self, source: &SnapshotSource) -> Result<Snapshot, SnapshotError> {
        match source {
            SnapshotSource::Http { url } => {
                let response = self
                    .http
                    .get(url)
                    .header(CACHE_CONTROL, "no-cache")
                    .header(PRAGMA, "no-cache")
                    .send()
                    .await
                    .map_err(|e| SnapshotError::Transport(e.to_string()))?;

                if !response.status().is_success() {
                    return Err(SnapshotError::Http {
                        status: response.status().as_u16(),
                    });
                }

                let body = response
                    .text()
                    .await
                    .map_err(|e| SnapshotError::Transport(e.to_string()))?;
                parse_snapshot(&body)
            }
            SnapshotSource::File { path } => {
                let json = tokio::fs::read_to_string(path)
                    .await
                    .map_err(|e| SnapshotError::Io {
                        path: path.clone(),
                        message: e.to_string(),
                    })?;
                parse_snapshot(&json)
            }
        }
    }
}

/// Errors from snapshot operations.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("I/O error on {}: {message}", .path.display())]
    Io { path: PathBuf, message: String },

    #[error("HTTP {status}")]
    Http { status: u16 },

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Invalid snapshot JSON: {0}")]
    Parse(String),

    #[error("No snapshot source could be loaded ({})", .0.join("; "))]
    AllSourcesFailed(Vec<String>),
}
