// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Year-to-date aggregates for the dashboard summary panel.
//!
//! Recomputed on every render against the caller's "now", so the year
//! boundary follows the render time rather than the ingest time.

use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::snapshot::{derive_pace, derive_seconds, SnapshotRun};
use crate::time_utils::parse_local_timestamp;

/// Aggregates over the runs of the current calendar year.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct YearToDateSummary {
    /// Calendar year the summary covers
    pub year: i32,
    /// Number of runs
    pub count: usize,
    /// Total distance (km)
    pub total_distance_km: f64,
    /// Total moving time (seconds)
    pub total_seconds: u64,
    /// Total elevation gain (meters)
    pub total_elevation_m: f64,
    /// Longest single run (km)
    pub longest_km: f64,
    /// Distance-weighted mean pace (s/km); `None` without any paced distance
    pub avg_pace_sec_per_km: Option<u64>,
}

impl YearToDateSummary {
    /// Aggregate `runs` whose date falls in `now`'s calendar year.
    ///
    /// Runs with an unparseable date are left out. Missing distance,
    /// time, and elevation count as zero.
    pub fn compute(runs: &[SnapshotRun], now: NaiveDateTime) -> Self {
        let year = now.year();
        let mut summary = Self {
            year,
            ..Self::default()
        };

        // Weighted pace accumulators
        let mut pace_weighted_sum = 0.0;
        let mut paced_distance = 0.0;

        for run in runs.iter().filter(|r| is_in_year(r, year)) {
            let distance = run
                .distance_km
                .filter(|d| d.is_finite() && *d >= 0.0)
                .unwrap_or(0.0);

            summary.count += 1;
            summary.total_distance_km += distance;
            summary.total_seconds += derive_seconds(run).unwrap_or(0);
            summary.total_elevation_m += run
                .elevation_gain_m
                .filter(|e| e.is_finite())
                .unwrap_or(0.0);
            summary.longest_km = summary.longest_km.max(distance);

            if let Some(pace) = derive_pace(run) {
                if distance > 0.0 {
                    pace_weighted_sum += pace as f64 * distance;
                    paced_distance += distance;
                }
            }
        }

        summary.avg_pace_sec_per_km =
            (paced_distance > 0.0).then(|| (pace_weighted_sum / paced_distance).round() as u64);

        summary
    }
}

/// Whether a run's local start date falls in `year`.
fn is_in_year(run: &SnapshotRun, year: i32) -> bool {
    match parse_local_timestamp(&run.date) {
        Some(date) => date.year() == year,
        None => {
            tracing::debug!(id = %run.id, date = %run.date, "Skipping run with unparseable date");
            false
        }
    }
}
