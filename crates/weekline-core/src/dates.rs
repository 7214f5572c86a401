//! Date and week arithmetic
//!
//! Everything here works on UTC calendar days. Weeks start on Monday and are
//! exactly seven days long, so month and year rollovers need no special
//! handling and daylight-saving shifts never enter the picture.

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

/// Number of days in a timeline week
pub const DAYS_PER_WEEK: i64 = 7;

/// Naive datetime layouts accepted in addition to plain dates and RFC 3339
const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Truncate a timestamp to midnight of its UTC calendar day.
///
/// Normalizing an already normalized value returns it unchanged.
pub fn normalize_to_utc_day<Tz: TimeZone>(date: &DateTime<Tz>) -> DateTime<Utc> {
    Utc.from_utc_datetime(&utc_day(date).and_time(NaiveTime::MIN))
}

/// The UTC calendar day a timestamp falls on
pub fn utc_day<Tz: TimeZone>(date: &DateTime<Tz>) -> NaiveDate {
    date.with_timezone(&Utc).date_naive()
}

/// Monday of the week containing `date`
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    let back = u64::from(date.weekday().num_days_from_monday());
    date.checked_sub_days(Days::new(back)).unwrap_or(date)
}

/// Sunday of the week containing `date`
pub fn end_of_week(date: NaiveDate) -> NaiveDate {
    let start = start_of_week(date);
    start.checked_add_days(Days::new(6)).unwrap_or(start)
}

/// Parse an ISO-ish date string into a UTC calendar day.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps (converted to UTC first),
/// naive datetimes (read as UTC), `YYYY-MM` and `YYYY`. Anything else,
/// including blank input, yields `None`.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }

    if let Ok(stamp) = DateTime::parse_from_rfc3339(s) {
        return Some(utc_day(&stamp));
    }

    for format in DATETIME_FORMATS {
        if let Ok(stamp) = NaiveDateTime::parse_from_str(s, format) {
            return Some(stamp.date());
        }
    }

    // Month precision: "2024-03"
    if s.len() == 7 {
        if let Ok(date) = NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d") {
            return Some(date);
        }
    }

    // Year precision: "2024"
    if s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit()) {
        return s
            .parse::<i32>()
            .ok()
            .and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1));
    }

    None
}

/// [`parse_date`] over an optional field
pub fn parse_date_opt(input: Option<&str>) -> Option<NaiveDate> {
    input.and_then(parse_date)
}

/// Fractional number of weeks from `origin` to `date` (negative before origin)
pub fn weeks_between(origin: NaiveDate, date: NaiveDate) -> f64 {
    (date - origin).num_days() as f64 / DAYS_PER_WEEK as f64
}

/// Whole weeks needed so that the week holding `latest` is covered,
/// counting from `origin`. Never less than one.
pub fn total_weeks_spanned(origin: NaiveDate, latest: NaiveDate) -> u32 {
    let days = (end_of_week(latest) - origin).num_days();
    let weeks = days.div_euclid(DAYS_PER_WEEK) + 1;
    u32::try_from(weeks.max(1)).unwrap_or(u32::MAX)
}

/// Monday of the 1-based `week` counted from `origin`
pub fn week_start_date(origin: NaiveDate, week: u32) -> NaiveDate {
    let days = u64::from(week.saturating_sub(1)) * DAYS_PER_WEEK as u64;
    origin.checked_add_days(Days::new(days)).unwrap_or(origin)
}

/// Clamp into `[min, max]`; NaN becomes `min`.
pub fn clamp_number(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        return min;
    }
    max.min(min.max(value))
}
