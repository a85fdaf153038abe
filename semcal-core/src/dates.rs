//! Date helpers for Monday-first calendar grids.
//!
//! Also contains the lenient timestamp parsing used at the input boundary,
//! since the API serves dates in several shapes (`2024-03-05`,
//! `2024-03-05T10:00`, full RFC 3339 with an offset).

use chrono::{DateTime, Datelike, Duration, Local, Months, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{CalError, CalResult};

/// Weekday index with Monday as the first day of the week (Monday = 0, Sunday = 6).
pub fn weekday_index_monday_first(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_monday()
}

/// The Monday at or before `date`.
pub fn monday_of_week(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(weekday_index_monday_first(date)))
}

/// True if both values fall on the same calendar day (time of day is ignored).
pub fn is_same_calendar_day<A: Datelike, B: Datelike>(a: &A, b: &B) -> bool {
    a.year() == b.year() && a.month() == b.month() && a.day() == b.day()
}

/// ISO-8601 week number. Week 1 is the week containing the year's first Thursday,
/// so early January can belong to week 52/53 of the previous year.
pub fn iso_week_number(date: NaiveDate) -> u32 {
    date.iso_week().week()
}

/// First day of the month containing `date`.
pub fn first_day_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Number of days in the month containing `date`.
pub fn days_in_month(date: NaiveDate) -> u32 {
    let first = first_day_of_month(date);
    match first.checked_add_months(Months::new(1)) {
        Some(next) => (next - first).num_days() as u32,
        // Only reachable at the very end of chrono's supported range
        None => 31,
    }
}

/// Move `date` by `delta` months. The day is clamped to the length of the
/// target month (Jan 31 + 1 month = Feb 29 in a leap year).
pub fn add_months(date: NaiveDate, delta: i32) -> NaiveDate {
    let months = Months::new(delta.unsigned_abs());
    let moved = if delta >= 0 {
        date.checked_add_months(months)
    } else {
        date.checked_sub_months(months)
    };
    moved.unwrap_or(date)
}

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a timestamp into local wall-clock time.
///
/// Accepts:
/// - `YYYY-MM-DD` (midnight)
/// - `YYYY-MM-DDTHH:MM[:SS[.fff]]` (taken as local time)
/// - RFC 3339 with `Z` or an offset (converted to the local time zone)
pub fn parse_timestamp(s: &str) -> CalResult<NaiveDateTime> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Local).naive_local());
    }

    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(dt);
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(|d| d.and_time(NaiveTime::MIN))
        .map_err(|_| CalError::InvalidTimestamp(s.to_string()))
}

/// Parse a calendar date. Full timestamps are accepted and truncated to their date.
pub fn parse_date(s: &str) -> CalResult<NaiveDate> {
    match NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d") {
        Ok(date) => Ok(date),
        Err(_) => parse_timestamp(s).map(|dt| dt.date()),
    }
}

/// Serde adapter for `NaiveDateTime` fields using [`parse_timestamp`].
pub(crate) mod timestamp_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer, de};

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

    pub fn serialize<S: Serializer>(dt: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&dt.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        super::parse_timestamp(&s).map_err(de::Error::custom)
    }
}

/// Serde adapter for `NaiveDate` fields using [`parse_date`].
pub(crate) mod date_format {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format("%Y-%m-%d").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let s = String::deserialize(deserializer)?;
        super::parse_date(&s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_weekday_index_is_monday_first() {
        assert_eq!(weekday_index_monday_first(date(2024, 3, 4)), 0); // Monday
        assert_eq!(weekday_index_monday_first(date(2024, 3, 7)), 3); // Thursday
        assert_eq!(weekday_index_monday_first(date(2024, 3, 10)), 6); // Sunday
    }

    #[test]
    fn test_monday_of_week() {
        assert_eq!(monday_of_week(date(2024, 3, 4)), date(2024, 3, 4));
        assert_eq!(monday_of_week(date(2024, 3, 10)), date(2024, 3, 4));
        // Crosses a month boundary
        assert_eq!(monday_of_week(date(2024, 3, 1)), date(2024, 2, 26));
    }

    #[test]
    fn test_is_same_calendar_day_ignores_time() {
        let morning = date(2024, 3, 5).and_hms_opt(8, 0, 0).unwrap();
        let evening = date(2024, 3, 5).and_hms_opt(23, 59, 59).unwrap();
        assert!(is_same_calendar_day(&morning, &evening));
        assert!(is_same_calendar_day(&morning, &date(2024, 3, 5)));
        assert!(!is_same_calendar_day(&morning, &date(2024, 3, 6)));
        assert!(!is_same_calendar_day(&date(2023, 3, 5), &date(2024, 3, 5)));
    }

    #[test]
    fn test_iso_week_number() {
        assert_eq!(iso_week_number(date(2024, 3, 4)), 10);
        assert_eq!(iso_week_number(date(2024, 1, 1)), 1);
        // Belongs to the last week of 2020
        assert_eq!(iso_week_number(date(2021, 1, 1)), 53);
        // Belongs to the first week of 2025
        assert_eq!(iso_week_number(date(2024, 12, 30)), 1);
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(date(2024, 2, 10)), 29);
        assert_eq!(days_in_month(date(2023, 2, 10)), 28);
        assert_eq!(days_in_month(date(2024, 4, 30)), 30);
        assert_eq!(days_in_month(date(2024, 12, 1)), 31);
    }

    #[test]
    fn test_add_months_clamps_day() {
        assert_eq!(add_months(date(2024, 1, 31), 1), date(2024, 2, 29));
        assert_eq!(add_months(date(2024, 3, 31), -1), date(2024, 2, 29));
        assert_eq!(add_months(date(2024, 12, 15), 1), date(2025, 1, 15));
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = date(2024, 3, 5).and_hms_opt(10, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2024-03-05T10:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-03-05T10:00:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-03-05 10:00").unwrap(), expected);
        assert_eq!(
            parse_timestamp("2024-03-05").unwrap(),
            date(2024, 3, 5).and_hms_opt(0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        let err = parse_timestamp("next tuesday").unwrap_err();
        assert!(matches!(err, CalError::InvalidTimestamp(_)));
    }

    #[test]
    fn test_parse_date_truncates_timestamps() {
        assert_eq!(parse_date("2024-03-05").unwrap(), date(2024, 3, 5));
        assert_eq!(parse_date("2024-03-05T18:30").unwrap(), date(2024, 3, 5));
    }
}
