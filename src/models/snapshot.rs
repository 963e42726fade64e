// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Snapshot file model shared by the ingestor and the dashboard.
//!
//! The ingestor writes only the canonical fields. Snapshots written by
//! older ingestors may instead carry whole minutes (`moving_time_min`) and a
//! preformatted pace (`pace_min_per_km`); those are accepted on read and
//! consulted through [`derive_seconds`] and [`derive_pace`].
//!
//! Reading is lenient: a null or missing name or date reads as empty,
//! fractional seconds are rounded, and a run that still cannot be read is
//! skipped with a warning instead of rejecting the whole snapshot.

use crate::models::ActivityId;
use serde::{Deserialize, Deserializer, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Persisted snapshot: `{ updatedAt, runs }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Snapshot {
    /// When the ingestor wrote this snapshot (ISO 8601)
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
    /// Runs, most recent first
    #[serde(default, deserialize_with = "runs_skipping_unreadable")]
    pub runs: Vec<SnapshotRun>,
}

/// One normalized run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SnapshotRun {
    pub id: ActivityId,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub name: String,
    /// Local start time (ISO 8601)
    #[serde(default, deserialize_with = "string_or_empty")]
    pub date: String,
    /// Distance in kilometers, two decimals
    pub distance_km: Option<f64>,
    /// Moving time in seconds
    #[serde(default, deserialize_with = "whole_number")]
    pub moving_time_s: Option<u64>,
    /// Pace in seconds per kilometer; `None` for zero distance
    #[serde(default, deserialize_with = "whole_number")]
    pub pace_sec_per_km: Option<u64>,
    /// Elevation gain in meters
    pub elevation_gain_m: Option<f64>,

    // ─── Legacy fields (read-only) ───────────────────────────────
    /// Moving time in whole minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moving_time_min: Option<f64>,
    /// Pace in minutes per kilometer, either `"m:ss"` or decimal minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pace_min_per_km: Option<LegacyPace>,
}

fn runs_skipping_unreadable<'de, D>(deserializer: D) -> Result<Vec<SnapshotRun>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Option::<Vec<serde_json::Value>>::deserialize(deserializer)?.unwrap_or_default();

    Ok(values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match SnapshotRun::deserialize(value) {
            Ok(run) => Some(run),
            Err(e) => {
                tracing::warn!(index, error = %e, "Skipping unreadable run in snapshot");
                None
            }
        })
        .collect())
}

fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Any JSON number, rounded; negative and non-finite values read as absent.
fn whole_number<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?
        .filter(|v| v.is_finite() && *v >= 0.0)
        .map(|v| v.round() as u64))
}

/// Legacy pace representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[serde(untagged)]
pub enum LegacyPace {
    /// Decimal minutes, e.g. `5.5`
    Minutes(f64),
    /// Clock notation, e.g. `"5:25"`
    Text(String),
}

impl LegacyPace {
    /// Convert to whole seconds per kilometer.
    pub fn seconds_per_km(&self) -> Option<u64> {
        let seconds = match self {
            LegacyPace::Minutes(minutes) => minutes * 60.0,
            LegacyPace::Text(text) => {
                let text = text.trim();
                match text.split_once(':') {
                    Some((m, s)) => {
                        let minutes: u64 = m.trim().parse().ok()?;
                        let secs: f64 = s.trim().parse().ok()?;
                        minutes as f64 * 60.0 + secs
                    }
                    None => text.parse::<f64>().ok()? * 60.0,
                }
            }
        };
        (seconds.is_finite() && seconds > 0.0).then(|| seconds.round() as u64)
    }
}

/// Moving time in seconds: `moving_time_s`, else `moving_time_min * 60`.
pub fn derive_seconds(run: &SnapshotRun) -> Option<u64> {
    run.moving_time_s.or_else(|| {
        run.moving_time_min
            .filter(|m| m.is_finite() && *m >= 0.0)
            .map(|m| (m * 60.0).round() as u64)
    })
}

/// Pace in seconds per kilometer.
///
/// Never present for a missing or non-positive distance. Otherwise the
/// stored `pace_sec_per_km` wins, then the pace computed from
/// [`derive_seconds`], then the legacy `pace_min_per_km`.
pub fn derive_pace(run: &SnapshotRun) -> Option<u64> {
    let distance_km = run.distance_km.filter(|d| d.is_finite() && *d > 0.0)?;

    if let Some(pace) = run.pace_sec_per_km {
        return Some(pace);
    }
    if let Some(seconds) = derive_seconds(run) {
        return Some((seconds as f64 / distance_km).round() as u64);
    }
    run.pace_min_per_km
        .as_ref()
        .and_then(LegacyPace::seconds_per_km)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(distance_km: Option<f64>) -> SnapshotRun {
        SnapshotRun {
            id: ActivityId::Numeric(1),
            name: "Test Run".to_string(),
            date: "2026-03-01T08:00:00Z".to_string(),
            distance_km,
            moving_time_s: None,
            pace_sec_per_km: None,
            elevation_gain_m: None,
            moving_time_min: None,
            pace_min_per_km: None,
        }
    }

    #[test]
    fn test_derive_seconds_prefers_canonical_field() {
        let mut r = run(Some(5.0));
        r.moving_time_s = Some(1505);
        r.moving_time_min = Some(25.0);
        assert_eq!(derive_seconds(&r), Some(1505));

        r.moving_time_s = None;
        assert_eq!(derive_seconds(&r), Some(1500));

        r.moving_time_min = None;
        assert_eq!(derive_seconds(&r), None);
    }

    #[test]
    fn test_derive_pace_never_divides_by_zero() {
        let mut r = run(Some(0.0));
        r.moving_time_s = Some(600);
        r.pace_sec_per_km = Some(300);
        r.pace_min_per_km = Some(LegacyPace::Text("5:00".to_string()));
        assert_eq!(derive_pace(&r), None);

        r.distance_km = None;
        assert_eq!(derive_pace(&r), None);
    }

    #[test]
    fn test_derive_pace_prefers_stored_value() {
        let mut r = run(Some(10.0));
        r.moving_time_s = Some(3000); // would derive 300
        r.pace_sec_per_km = Some(301);
        assert_eq!(derive_pace(&r), Some(301));
    }

    #[test]
    fn test_derive_pace_from_seconds_and_minutes() {
        let mut r = run(Some(4.2));
        r.moving_time_s = Some(1365);
        assert_eq!(derive_pace(&r), Some(325));

        let mut legacy = run(Some(5.0));
        legacy.moving_time_min = Some(27.0);
        assert_eq!(derive_pace(&legacy), Some(324));
    }

    #[test]
    fn test_derive_pace_falls_back_to_legacy_pace() {
        let mut r = run(Some(8.0));
        r.pace_min_per_km = Some(LegacyPace::Text("5:25".to_string()));
        assert_eq!(derive_pace(&r), Some(325));

        r.pace_min_per_km = Some(LegacyPace::Minutes(5.5));
        assert_eq!(derive_pace(&r), Some(330));

        r.pace_min_per_km = Some(LegacyPace::Text("n/a".to_string()));
        assert_eq!(derive_pace(&r), None);
    }

    #[test]
    fn test_legacy_snapshot_parses() {
        let json = r#"{
            "updatedAt": "2025-06-01T05:00:00.000Z",
            "runs": [{
                "id": 987,
                "name": "Abendlauf",
                "date": "2025-05-30T18:10:00Z",
                "distance_km": 7.31,
                "moving_time_min": 38,
                "pace_min_per_km": "5:12",
                "elevation_gain_m": 64
            }]
        }"#;

        let snapshot: Snapshot = serde_json::from_str(json).unwrap();
        let r = &snapshot.runs[0];

        assert_eq!(r.moving_time_s, None);
        assert_eq!(derive_seconds(r), Some(2280));
        // Seconds-derived pace outranks the legacy string.
        assert_eq!(derive_pace(r), Some(312));
        assert_eq!(r.elevation_gain_m, Some(64.0));
    }

    #[test]
    fn test_snapshot_without_runs_is_empty() {
        let snapshot: Snapshot = serde_json::from_str(r#"{"updatedAt": "x"}"#).unwrap();
        assert!(snapshot.runs.is_empty());
    }

    #[test]
    fn test_null_or_missing_text_fields_read_as_empty() {
        let json = r#"{
            "updatedAt": "2026-06-01T05:00:00.000Z",
            "runs": [
                { "id": 1, "name": null, "date": "2026-05-30T18:10:00Z", "distance_km": 5.0 },
                { "id": 2, "name": "No date", "distance_km": 6.0 }
            ]
        }"#;

        let snapshot: Snapshot = serde_json::from_str(json).unwrap();

        assert_eq!(snapshot.runs.len(), 2);
        assert_eq!(snapshot.runs[0].name, "");
        assert_eq!(snapshot.runs[1].date, "");
        assert_eq!(snapshot.runs[1].name, "No date");
    }

    #[test]
    fn test_fractional_seconds_are_rounded() {
        let json = r#"{
            "updatedAt": "x",
            "runs": [{
                "id": 1, "date": "2026-05-30T18:10:00Z", "distance_km": 5.0,
                "moving_time_s": 1500.6, "pace_sec_per_km": 300.4
            }]
        }"#;

        let snapshot: Snapshot = serde_json::from_str(json).unwrap();
        let r = &snapshot.runs[0];

        assert_eq!(r.moving_time_s, Some(1501));
        assert_eq!(r.pace_sec_per_km, Some(300));
        assert_eq!(derive_pace(r), Some(300));
    }

    #[test]
    fn test_unreadable_run_is_skipped() {
        let json = r#"{
            "updatedAt": "x",
            "runs": [
                { "id": 1, "date": "2026-05-30T18:10:00Z", "distance_km": 5.0 },
                { "name": "no id" },
                { "id": 3, "date": "2026-05-28T18:10:00Z", "distance_km": "ten" },
                { "id": 4, "date": "2026-05-27T18:10:00Z", "distance_km": 4.0 }
            ]
        }"#;

        let snapshot: Snapshot = serde_json::from_str(json).unwrap();

        let ids: Vec<_> = snapshot.runs.iter().map(|r| r.id.clone()).collect();
        assert_eq!(ids, vec![ActivityId::Numeric(1), ActivityId::Numeric(4)]);
    }

    #[test]
    fn test_canonical_run_serializes_null_pace_and_omits_legacy() {
        let r = run(Some(0.0));
        let value = serde_json::to_value(&r).unwrap();

        assert!(value["pace_sec_per_km"].is_null());
        assert!(value.get("pace_sec_per_km").is_some());
        assert!(value.get("moving_time_min").is_none());
        assert!(value.get("pace_min_per_km").is_none());
    }
}
