// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod activity;
pub mod ingest;
pub mod snapshot;
pub mod strava;

pub use ingest::{IngestReport, Ingestor};
pub use snapshot::{SnapshotError, SnapshotLoader, SnapshotSource};
pub use strava::StravaClient;
