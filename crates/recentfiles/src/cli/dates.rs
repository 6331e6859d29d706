//! Parsing of `--from` / `--to` values.
//!
//! A bare date expands to the start (lower bound) or the end (upper bound)
//! of that day, so `--from 2024-03-01 --to 2024-03-01` covers the whole day.

use chrono::{DateTime, Local, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

/// Which end of a date range a value bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Start,
    End,
}

/// Parse `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS` or RFC 3339 into local time.
pub fn parse_bound(value: &str, bound: Bound) -> Result<DateTime<Local>, String> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Local));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return to_local(naive, bound);
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        let time = match bound {
            Bound::Start => NaiveTime::MIN,
            Bound::End => NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999)
                .ok_or_else(|| "invalid end-of-day time".to_string())?,
        };
        return to_local(date.and_time(time), bound);
    }

    Err("expected YYYY-MM-DD, YYYY-MM-DD HH:MM:SS or an RFC 3339 timestamp".to_string())
}

/// Resolve a wall-clock time; ambiguous times (DST fold) take the widest reading.
fn to_local(naive: NaiveDateTime, bound: Bound) -> Result<DateTime<Local>, String> {
    match Local.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt),
        LocalResult::Ambiguous(earliest, latest) => Ok(match bound {
            Bound::Start => earliest,
            Bound::End => latest,
        }),
        LocalResult::None => Err(format!("{} does not exist in the local time zone", naive)),
    }
}
