// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Display formatting for durations, paces, and dates.
//!
//! All functions are pure and total: unknown or nonsensical inputs produce
//! [`PLACEHOLDER`] rather than an error.

use chrono::{Datelike, NaiveDate};

/// Shown in place of any value that is missing or cannot be displayed.
pub const PLACEHOLDER: &str = "-";

/// Format seconds as zero-padded `HH:MM:SS`; hours do not roll over into days.
pub fn seconds_to_hms(seconds: Option<u64>) -> String {
    match seconds {
        Some(s) => format!("{:02}:{:02}:{:02}", s / 3600, (s % 3600) / 60, s % 60),
        None => PLACEHOLDER.to_string(),
    }
}

/// Format a pace in seconds per kilometer as `MM:SS min/km`.
///
/// Minutes are floored and seconds rounded; a rounded 60 carries over.
pub fn sec_per_km_to_pace(sec_per_km: Option<f64>) -> String {
    let s = match sec_per_km {
        Some(s) if s.is_finite() && s > 0.0 => s,
        _ => return PLACEHOLDER.to_string(),
    };

    let mut minutes = (s / 60.0).floor() as u64;
    let mut seconds = (s - minutes as f64 * 60.0).round() as u64;
    if seconds == 60 {
        minutes += 1;
        seconds = 0;
    }
    format!("{:02}:{:02} min/km", minutes, seconds)
}

/// Format kilometers with a fixed number of decimals.
pub fn format_km(km: Option<f64>, decimals: usize) -> String {
    match km.filter(|k| k.is_finite()) {
        Some(k) => format!("{:.*} km", decimals, k),
        None => PLACEHOLDER.to_string(),
    }
}

/// Format meters rounded to a whole number.
pub fn format_meters(meters: Option<f64>) -> String {
    match meters.filter(|m| m.is_finite()) {
        Some(m) => format!("{} m", m.round() as i64),
        None => PLACEHOLDER.to_string(),
    }
}

/// Regional calendar-date convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateStyle {
    /// `19.10.2026` (de, de-CH, ...)
    #[default]
    DayMonthYearDots,
    /// `19/10/2026` (en-GB, fr, it, es, ...)
    DayMonthYearSlashes,
    /// `10/19/2026` (en-US)
    MonthDayYear,
}

impl DateStyle {
    /// Pick the convention for a BCP 47 locale tag such as `de-CH`.
    pub fn for_locale(tag: &str) -> Self {
        let tag = tag.trim().replace('_', "-").to_ascii_lowercase();
        let language = tag.split('-').next().unwrap_or("");

        match (language, tag.as_str()) {
            (_, "en-us") => DateStyle::MonthDayYear,
            ("de" | "ru" | "pl" | "cs" | "fi" | "nb" | "da" | "tr", _) => {
                DateStyle::DayMonthYearDots
            }
            ("en" | "fr" | "it" | "es" | "pt" | "nl" | "el", _) => DateStyle::DayMonthYearSlashes,
            _ => {
                tracing::debug!(locale = %tag, "Unknown locale, using default date style");
                DateStyle::default()
            }
        }
    }

    /// Format a calendar date.
    pub fn format(self, date: NaiveDate) -> String {
        let (d, m, y) = (date.day(), date.month(), date.year());
        match self {
            DateStyle::DayMonthYearDots => format!("{:02}.{:02}.{}", d, m, y),
            DateStyle::DayMonthYearSlashes => format!("{:02}/{:02}/{}", d, m, y),
            DateStyle::MonthDayYear => format!("{:02}/{:02}/{}", m, d, y),
        }
    }
}
