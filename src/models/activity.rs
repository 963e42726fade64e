// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Strava activity model as returned by the list endpoint.

use serde::{Deserialize, Serialize};
use std::fmt;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Activity identifier.
///
/// Strava ids are numeric, but the snapshot treats ids as opaque and
/// round-trips text ids unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(untagged)]
pub enum ActivityId {
    Numeric(u64),
    Text(String),
}

impl fmt::Display for ActivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivityId::Numeric(id) => write!(f, "{id}"),
            ActivityId::Text(id) => f.write_str(id),
        }
    }
}

impl From<u64> for ActivityId {
    fn from(id: u64) -> Self {
        ActivityId::Numeric(id)
    }
}

/// Summary activity from `GET /athlete/activities`.
///
/// Only the fields the ingestor needs are modelled; everything else in the
/// upstream payload is ignored.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StravaActivitySummary {
    pub id: ActivityId,
    #[serde(default)]
    pub name: Option<String>,
    /// Legacy activity category ("Run", "Ride", ...)
    #[serde(rename = "type", default)]
    pub activity_type: String,
    /// Local wall-clock start time (ISO 8601, misleading `Z` suffix)
    #[serde(default)]
    pub start_date_local: String,
    /// Distance in meters
    #[serde(default)]
    pub distance: Option<f64>,
    /// Moving time in seconds
    #[serde(default)]
    pub moving_time: Option<u64>,
    /// Elevation gain in meters
    #[serde(default)]
    pub total_elevation_gain: Option<f64>,
}

impl StravaActivitySummary {
    /// Whether this activity is a run.
    pub fn is_run(&self) -> bool {
        self.activity_type == "Run"
    }
}
