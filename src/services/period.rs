//! Calendar-day bucketing and summary window resolution.
//!
//! Every write and lookup keys on the calendar day, so the truncation lives
//! here as a pure function instead of being scattered through handlers.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};

/// Parse a caller-supplied date. Accepts RFC 3339 (`2026-08-30T14:05:00Z`),
/// a naive datetime (`2026-08-30T14:05:00`), or a bare date (`2026-08-30`).
pub fn parse_timestamp(input: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S") {
        return Ok(dt.and_utc());
    }
    if let Ok(d) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(d.and_time(NaiveTime::MIN).and_utc());
    }
    Err(format!("Invalid date: {input}"))
}

/// Truncate a timestamp to the start of its calendar day. This is the
/// bucketing key: one health record exists per (user, day).
pub fn normalize_day(ts: DateTime<Utc>) -> NaiveDate {
    ts.date_naive()
}

pub fn start_of_day(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}

/// 23:59:59.999 of the given day, the inclusive upper bound of range queries.
pub fn end_of_day(day: NaiveDate) -> DateTime<Utc> {
    let t = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap();
    day.and_time(t).and_utc()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Daily,
    Weekly,
    Monthly,
}

impl Period {
    /// Lenient: anything other than "weekly"/"monthly" (including absent)
    /// falls back to daily.
    pub fn parse(label: Option<&str>) -> Self {
        match label {
            Some("weekly") => Period::Weekly,
            Some("monthly") => Period::Monthly,
            _ => Period::Daily,
        }
    }

    fn lookback_days(self) -> i64 {
        match self {
            Period::Daily => 1,
            Period::Weekly => 7,
            Period::Monthly => 30,
        }
    }
}

/// Resolve a period label into concrete window bounds: day-start of
/// `now - lookback` through end-of-day of `now`. Pure function of its inputs.
pub fn resolve_window(period: Period, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = start_of_day(normalize_day(now - Duration::days(period.lookback_days())));
    let end = end_of_day(normalize_day(now));
    (start, end)
}
