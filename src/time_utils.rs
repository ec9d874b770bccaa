// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for calendar date parsing and formatting.

use chrono::{DateTime, NaiveDate, Utc};

/// Display form used in API responses, e.g. `Mon Jan 01 2024`.
const DISPLAY_FORMAT: &str = "%a %b %d %Y";
const ISO_FORMAT: &str = "%Y-%m-%d";

/// Today's date in UTC.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Parse a calendar date.
///
/// Accepts `YYYY-MM-DD`, an RFC3339 datetime (date part only), or the
/// display form produced by [`format_display_date`].
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    NaiveDate::parse_from_str(raw, ISO_FORMAT)
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.with_timezone(&Utc).date_naive())
        })
        .or_else(|| NaiveDate::parse_from_str(raw, DISPLAY_FORMAT).ok())
}

/// Format a date for API responses.
pub fn format_display_date(date: NaiveDate) -> String {
    date.format(DISPLAY_FORMAT).to_string()
}

/// Format a date as stored (`YYYY-MM-DD`).
pub fn format_iso_date(date: NaiveDate) -> String {
    date.format(ISO_FORMAT).to_string()
}
