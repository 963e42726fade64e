// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity filtering and normalization.
//!
//! Turns upstream activity summaries into snapshot runs:
//! 1. Keep only runs that started on or after the start of the year
//! 2. Convert meters to kilometers (two decimals)
//! 3. Derive pace in seconds per kilometer

use crate::models::{SnapshotRun, StravaActivitySummary};
use crate::time_utils::parse_local_timestamp;
use chrono::NaiveDateTime;

/// Whether an activity belongs in this year's snapshot.
///
/// This is the authoritative filter; the pagination stop is only an
/// optimization and may still leave older or non-run entries in the batch.
pub fn is_snapshot_run(activity: &StravaActivitySummary, year_start: NaiveDateTime) -> bool {
    if !activity.is_run() {
        return false;
    }

    match parse_local_timestamp(&activity.start_date_local) {
        Some(start) => start >= year_start,
        None => {
            tracing::warn!(
                activity_id = %activity.id,
                start_date_local = %activity.start_date_local,
                "Skipping run with unparseable start date"
            );
            false
        }
    }
}

/// Normalize one upstream activity into the snapshot shape.
pub fn normalize_run(activity: &StravaActivitySummary) -> SnapshotRun {
    let raw_km = activity.distance.unwrap_or(0.0).max(0.0) / 1000.0;
    let distance_km = round2(raw_km);
    let moving_time_s = activity.moving_time;

    // Pace uses the unrounded distance, but only when the stored distance
    // is non-zero so a zero-distance run never carries a pace.
    let pace_sec_per_km = match moving_time_s {
        Some(seconds) if distance_km > 0.0 => Some((seconds as f64 / raw_km).round() as u64),
        _ => None,
    };

    SnapshotRun {
        id: activity.id.clone(),
        name: activity.name.clone().unwrap_or_default(),
        date: activity.start_date_local.clone(),
        distance_km: Some(distance_km),
        moving_time_s,
        pace_sec_per_km,
        elevation_gain_m: activity.total_elevation_gain.map(|e| e.max(0.0)),
        moving_time_min: None,
        pace_min_per_km: None,
    }
}

/// Filter and normalize a batch, preserving upstream order.
pub fn normalize_runs(
    activities: &[StravaActivitySummary],
    year_start: NaiveDateTime,
) -> Vec<SnapshotRun> {
    activities
        .iter()
        .filter(|a| is_snapshot_run(a, year_start))
        .map(normalize_run)
        .collect()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
