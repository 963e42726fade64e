// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Dashboard render pipeline.
//!
//! Loads the snapshot, computes the year-to-date summary, and fills the
//! page slots. Failures never escape: they end up as a visible message in
//! the container slot and a [`RenderOutcome`] for the caller to log.

use crate::config::DashboardConfig;
use crate::error::{AppError, Result};
use crate::models::{derive_pace, derive_seconds, Snapshot, SnapshotRun, YearToDateSummary};
use crate::render::format::{
    format_km, format_meters, sec_per_km_to_pace, seconds_to_hms, DateStyle, PLACEHOLDER,
};
use crate::render::sink::{slots, HtmlPage, RenderSink};
use crate::services::{SnapshotLoader, SnapshotSource};
use crate::time_utils::parse_local_timestamp;
use chrono::{DateTime, Local, NaiveDateTime};
use maud::{html, Markup};
use std::path::Path;

/// Container content when the snapshot has no runs.
pub fn no_data_markup() -> Markup {
    html! { p class="strava-empty" { "No runs found." } }
}

/// Container content when no snapshot could be loaded.
pub fn error_markup() -> Markup {
    html! { p class="strava-error" { "Could not load Strava data." } }
}

/// What a render did.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOutcome {
    /// Summary and recent list rendered.
    Rendered {
        summary: YearToDateSummary,
        runs_shown: usize,
    },
    /// Snapshot loaded but held no runs.
    NoData { summary: YearToDateSummary },
    /// No source produced a snapshot; the error message is shown.
    LoadFailed { reason: String },
    /// The page has no container slot; nothing was loaded.
    MissingContainer,
}

/// Whether `path` is the dashboard page.
pub fn is_dashboard_page(path: &str, page_name: &str) -> bool {
    !page_name.is_empty() && path.trim_end_matches('/').ends_with(page_name)
}

/// Renders the dashboard into pages.
#[derive(Clone)]
pub struct DashboardRenderer {
    loader: SnapshotLoader,
    config: DashboardConfig,
}

impl DashboardRenderer {
    pub fn new(loader: SnapshotLoader, config: DashboardConfig) -> Self {
        Self { loader, config }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Snapshot sources for a page, in fallback order.
    ///
    /// `page` is relative to the site root.
    pub fn sources_for(&self, page: &Path) -> Vec<SnapshotSource> {
        self.config
            .snapshot_locations()
            .iter()
            .map(|location| SnapshotSource::resolve(location, &self.config.site_dir, page))
            .collect()
    }

    /// Load the snapshot for a page.
    pub async fn load_for(&self, page: &Path) -> Result<Snapshot> {
        Ok(self.loader.load(&self.sources_for(page)).await?)
    }

    /// Read a page from the site directory and render the dashboard into it.
    ///
    /// Pages other than the dashboard page are returned unchanged with
    /// `None` as the outcome.
    pub async fn render_file(
        &self,
        page: &Path,
        now: NaiveDateTime,
    ) -> Result<(String, Option<RenderOutcome>)> {
        let file_path = self.config.site_dir.join(page);
        let html = tokio::fs::read_to_string(&file_path)
            .await
            .map_err(|e| AppError::NotFound(format!("{}: {}", file_path.display(), e)))?;

        if !is_dashboard_page(&page.to_string_lossy(), &self.config.page_name) {
            return Ok((html, None));
        }

        let mut sink = HtmlPage::new(html);
        let sources = self.sources_for(page);
        let outcome = self.render(&sources, &mut sink, now).await;
        Ok((sink.into_html(), Some(outcome)))
    }

    /// Load the snapshot from `sources` and render it into `sink`.
    pub async fn render<S: RenderSink>(
        &self,
        sources: &[SnapshotSource],
        sink: &mut S,
        now: NaiveDateTime,
    ) -> RenderOutcome {
        if !sink.has_slot(slots::CONTAINER) {
            tracing::error!(slot = slots::CONTAINER, "Dashboard container missing from page");
            return RenderOutcome::MissingContainer;
        }

        tracing::info!(sources = sources.len(), "Loading Strava data");
        match self.loader.load(sources).await {
            Ok(snapshot) => self.fill(&snapshot, sink, now),
            Err(e) => {
                tracing::error!(error = %e, "Failed to load Strava data");
                sink.set_html(slots::CONTAINER, &error_markup().into_string());
                RenderOutcome::LoadFailed {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Render an already loaded snapshot into `sink`.
    pub fn fill<S: RenderSink>(
        &self,
        snapshot: &Snapshot,
        sink: &mut S,
        now: NaiveDateTime,
    ) -> RenderOutcome {
        let summary = YearToDateSummary::compute(&snapshot.runs, now);
        let style = self.config.date_style;

        sink.set_html(slots::COUNT, &summary.count.to_string());
        sink.set_html(slots::DISTANCE, &format_km(Some(summary.total_distance_km), 1));
        sink.set_html(slots::TIME, &seconds_to_hms(Some(summary.total_seconds)));
        sink.set_html(
            slots::PACE,
            &sec_per_km_to_pace(summary.avg_pace_sec_per_km.map(|p| p as f64)),
        );
        sink.set_html(slots::ELEVATION, &format_meters(Some(summary.total_elevation_m)));
        sink.set_html(slots::LONGEST, &format_km(Some(summary.longest_km), 2));
        sink.set_html(slots::UPDATED, &format_updated_at(&snapshot.updated_at, style));

        if snapshot.runs.is_empty() {
            sink.set_html(slots::CONTAINER, &no_data_markup().into_string());
            tracing::info!("Snapshot has no runs");
            return RenderOutcome::NoData { summary };
        }

        let recent: Vec<&SnapshotRun> = snapshot.runs.iter().take(self.config.recent_limit).collect();
        let list = html! {
            @for run in &recent {
                (run_entry(run, style))
            }
        };
        sink.set_html(slots::CONTAINER, &list.into_string());

        tracing::info!(
            ytd_runs = summary.count,
            runs_shown = recent.len(),
            "Dashboard rendered"
        );
        RenderOutcome::Rendered {
            summary,
            runs_shown: recent.len(),
        }
    }
}

/// One entry of the recent-run list.
fn run_entry(run: &SnapshotRun, style: DateStyle) -> Markup {
    let date = parse_local_timestamp(&run.date)
        .map(|d| style.format(d.date()))
        .unwrap_or_else(|| PLACEHOLDER.to_string());
    let pace = sec_per_km_to_pace(derive_pace(run).map(|p| p as f64));

    html! {
        div class="run" {
            h3 { (run.name) }
            p { strong { (date) } }
            p { (format_km(run.distance_km, 2)) " · Pace " (pace) }
            p { "⛰ " (format_meters(run.elevation_gain_m)) " · 🕒 " (seconds_to_hms(derive_seconds(run))) }
        }
    }
}

/// Format the snapshot's `updatedAt` in local time.
///
/// Text that is not a timestamp is shown as-is, escaped.
fn format_updated_at(updated_at: &str, style: DateStyle) -> String {
    match DateTime::parse_from_rfc3339(updated_at) {
        Ok(dt) => {
            let local = dt.with_timezone(&Local);
            format!("{} {}", style.format(local.date_naive()), local.format("%H:%M"))
        }
        Err(_) => {
            let text = html! { (updated_at) };
            text.into_string()
        }
    }
}
