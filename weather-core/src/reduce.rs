//! Collapse the 3-hourly forecast list into one sample per calendar day.

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use std::collections::HashSet;
use tracing::warn;

use crate::provider::openweather::OwForecastEntry;

/// Upstream list cap (5 days x 8 samples).
pub const MAX_UPSTREAM_ENTRIES: usize = 40;

/// Maximum number of days in a response.
pub const MAX_FORECAST_DAYS: usize = 5;

/// An entry picked to represent its calendar day.
#[derive(Debug, Clone, Copy)]
pub struct DailySample<'a> {
    pub date: NaiveDate,
    pub entry: &'a OwForecastEntry,
}

/// Keep the first entry of each calendar date, in first-seen order, at most
/// [`MAX_FORECAST_DAYS`] of them.
///
/// Dates are taken in the location's calendar, `utc_offset_secs` east of UTC. Entries without
/// a usable timestamp are skipped.
pub fn daily_samples(entries: &[OwForecastEntry], utc_offset_secs: i64) -> Vec<DailySample<'_>> {
    let offset = i32::try_from(utc_offset_secs)
        .ok()
        .and_then(FixedOffset::east_opt)
        .unwrap_or_else(|| {
            warn!(utc_offset_secs, "ignoring invalid UTC offset");
            Utc.fix()
        });

    let mut seen = HashSet::new();
    let mut days = Vec::with_capacity(MAX_FORECAST_DAYS);

    for entry in entries.iter().take(MAX_UPSTREAM_ENTRIES) {
        if days.len() == MAX_FORECAST_DAYS {
            break;
        }

        let Some(local) = entry.dt.and_then(|dt| local_time(dt, offset)) else {
            warn!(dt = ?entry.dt, "skipping forecast entry without a usable timestamp");
            continue;
        };

        let date = local.date_naive();
        if seen.insert(date) {
            days.push(DailySample { date, entry });
        }
    }

    days
}

fn local_time(timestamp: i64, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    DateTime::from_timestamp(timestamp, 0).map(|utc| utc.with_timezone(&offset))
}
