// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Snapshot ingestion.
//!
//! Handles the batch workflow:
//! 1. Exchange the refresh token for an access token
//! 2. Page through this year's activities
//! 3. Filter and normalize runs
//! 4. Overwrite the snapshot file
//!
//! Every failure aborts the run before the snapshot is touched.

use crate::config::IngestConfig;
use crate::error::Result;
use crate::models::{Snapshot, StravaActivitySummary};
use crate::services::activity::normalize_runs;
use crate::services::snapshot::write_snapshot;
use crate::services::strava::{StravaClient, MAX_PER_PAGE};
use crate::time_utils::{format_utc_rfc3339, parse_local_timestamp, year_start};
use chrono::{DateTime, NaiveDateTime, Utc};
use std::path::PathBuf;

/// Hard ceiling on pages fetched in one run.
pub const MAX_PAGES: u32 = 50;

/// Fetches this year's runs and writes the snapshot.
pub struct Ingestor {
    client: StravaClient,
    refresh_token: String,
    snapshot_path: PathBuf,
}

impl Ingestor {
    pub fn new(config: &IngestConfig) -> Self {
        Self {
            client: StravaClient::from_config(config),
            refresh_token: config.refresh_token.clone(),
            snapshot_path: config.snapshot_path.clone(),
        }
    }

    /// Run the whole ingest.
    ///
    /// `now_local` decides the year window; `now_utc` stamps `updatedAt`.
    pub async fn run(
        &self,
        now_local: NaiveDateTime,
        now_utc: DateTime<Utc>,
    ) -> Result<IngestReport> {
        let tokens = self.client.refresh_token(&self.refresh_token).await?;
        tracing::info!("Access token obtained");

        let window_start = year_start(now_local);
        let (activities, pages) = self
            .fetch_since(&tokens.access_token, window_start)
            .await?;

        let runs = normalize_runs(&activities, window_start);
        tracing::info!(
            fetched = activities.len(),
            runs = runs.len(),
            pages,
            "Activities normalized"
        );

        let snapshot = Snapshot {
            updated_at: format_utc_rfc3339(now_utc),
            runs,
        };
        write_snapshot(&self.snapshot_path, &snapshot)?;

        Ok(IngestReport {
            runs_written: snapshot.runs.len(),
            activities_fetched: activities.len(),
            pages_fetched: pages,
            snapshot_path: self.snapshot_path.clone(),
        })
    }

    /// Page through activities until the window is exhausted.
    ///
    /// Stops on an empty page, on a page whose last (oldest) entry predates
    /// `window_start`, or after [`MAX_PAGES`]. Returns every fetched record
    /// and the number of pages requested.
    pub async fn fetch_since(
        &self,
        access_token: &str,
        window_start: NaiveDateTime,
    ) -> Result<(Vec<StravaActivitySummary>, u32)> {
        let mut activities = Vec::new();
        let mut page = 1;

        loop {
            let batch = self
                .client
                .list_activities(access_token, page, MAX_PER_PAGE)
                .await?;
            tracing::debug!(page, count = batch.len(), "Fetched activities page");

            if batch.is_empty() {
                break;
            }

            let reached_window_start = batch
                .last()
                .and_then(|a| parse_local_timestamp(&a.start_date_local))
                .is_some_and(|oldest| oldest < window_start);

            activities.extend(batch);

            if reached_window_start {
                tracing::debug!(page, "Reached activities before the start of the year");
                break;
            }
            if page >= MAX_PAGES {
                tracing::warn!(page, "Page limit reached, stopping pagination");
                break;
            }
            page += 1;
        }

        Ok((activities, page))
    }
}

/// Outcome of a successful ingest.
#[derive(Debug)]
pub struct IngestReport {
    pub runs_written: usize,
    pub activities_fetched: usize,
    pub pages_fetched: u32,
    pub snapshot_path: PathBuf,
}
