// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Dashboard rendering: formatting, page slots, and the render pipeline.

pub mod dashboard;
pub mod format;
pub mod sink;

pub use dashboard::{is_dashboard_page, DashboardRenderer, RenderOutcome};
pub use sink::{HtmlPage, RenderSink, SlotMap};
