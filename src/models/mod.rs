// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod activity;
pub mod snapshot;
pub mod stats;

pub use activity::{ActivityId, StravaActivitySummary};
pub use snapshot::{derive_pace, derive_seconds, LegacyPace, Snapshot, SnapshotRun};
pub use stats::YearToDateSummary;
