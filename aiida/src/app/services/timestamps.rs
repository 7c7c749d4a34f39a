// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use time::macros::format_description;
use time::{Duration, OffsetDateTime};

use crate::app::errors::{AppError, AppResult};

/// Same shape the store writes via `strftime('%Y-%m-%dT%H:%M:%fZ','now')`,
/// so stored values compare correctly as strings.
pub fn format_stored(at: OffsetDateTime) -> AppResult<String> {
    let format =
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z");
    at.to_offset(time::UtcOffset::UTC)
        .format(&format)
        .map_err(|e| AppError::internal(format!("format timestamp: {e}")))
}

/// Lower bound for "created in the past `days` days".
pub fn past_days_cutoff(now: OffsetDateTime, days: u32) -> AppResult<String> {
    let cutoff = now
        .checked_sub(Duration::days(i64::from(days)))
        .ok_or_else(|| AppError::validation(format!("past days out of range: {days}")))?;
    format_stored(cutoff)
}
