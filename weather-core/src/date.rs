//! Calendar-date parsing and the timestamps sent upstream.
//!
//! Supplied dates are anchored at midnight UTC unless a caller passes an
//! explicit offset; the host's local timezone is never consulted.

use chrono::{DateTime, Days, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::error::{Result, WeatherError};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// How far back the historical endpoint serves data.
pub const HISTORY_DAYS: u64 = 5;

/// Parse a `YYYY-MM-DD` date.
///
/// Anything that does not format back to the exact same string is rejected,
/// so `2020-8-26` or `2020-08-26T00:00` are errors.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let date = NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|_| WeatherError::InvalidDateFormat(s.to_string()))?;

    if format_date(date) != s {
        return Err(WeatherError::InvalidDateFormat(s.to_string()));
    }

    Ok(date)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Epoch seconds of 00:00 UTC on `date`.
pub fn utc_midnight_timestamp(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

/// Epoch seconds of local midnight on `date` at a fixed UTC offset.
pub fn timestamp_at_offset(date: NaiveDate, offset: FixedOffset) -> i64 {
    let local = date.and_time(NaiveTime::MIN);
    // A fixed offset maps every local time to exactly one instant.
    match offset.from_local_datetime(&local).single() {
        Some(dt) => dt.timestamp(),
        None => local.and_utc().timestamp() - i64::from(offset.local_minus_utc()),
    }
}

/// Convert epoch seconds into wall-clock time at `offset_secs` east of UTC.
pub fn local_time(epoch_secs: i64, offset_secs: i32) -> Option<DateTime<FixedOffset>> {
    let offset = FixedOffset::east_opt(offset_secs)?;
    let utc = DateTime::<Utc>::from_timestamp(epoch_secs, 0)?;
    Some(utc.with_timezone(&offset))
}

/// Inclusive `[earliest, latest]` range of dates the history form offers.
pub fn history_window(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let earliest = today.checked_sub_days(Days::new(HISTORY_DAYS)).unwrap_or(today);
    (earliest, today)
}
