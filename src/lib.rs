// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Run-Dashboard: year-to-date running stats from Strava.
//!
//! This crate provides the ingestor that snapshots this year's Strava runs
//! and the pipeline that aggregates a snapshot and renders it into the
//! dashboard page.

pub mod config;
pub mod error;
pub mod logging;
pub mod middleware;
pub mod models;
pub mod render;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::DashboardConfig;
use render::DashboardRenderer;

/// Shared application state for the dashboard server.
pub struct AppState {
    pub config: DashboardConfig,
    pub renderer: DashboardRenderer,
}
