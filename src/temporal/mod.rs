//! Calendar helpers: date parsing, inclusive date ranges and the day/week/month
//! buckets derived from an order date

pub mod date_range;
pub mod de;

pub use self::date_range::DateRange;

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{Error, Result};

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// Parse a date or date-time cell
///
/// Date-only values land at midnight. Fractional seconds and RFC 3339 offsets
/// are accepted; an offset is dropped and the wall-clock time kept.
pub fn parse_datetime(value: &str) -> Result<NaiveDateTime> {
    let value = value.trim();

    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(parsed);
        }
    }

    // Fractional seconds
    if let Ok(parsed) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f") {
        return Ok(parsed);
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.naive_local());
    }

    parse_date(value).map(|date| date.and_time(NaiveTime::MIN))
}

/// Parse a calendar date (`YYYY-MM-DD` or `YYYY/MM/DD`)
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    let value = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .ok_or_else(|| Error::InvalidDate(format!("unrecognized date '{}'", value)))
}

/// Monday of the ISO week containing `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = date.weekday().num_days_from_monday() as u64;
    date.checked_sub_days(Days::new(offset)).unwrap_or(date)
}

/// First day of the month containing `date`
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// `YYYY-MM` label for the month containing `date`
pub fn month_label(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_common_layouts() {
        let expected = ymd(2024, 2, 1).and_hms_opt(10, 30, 0).unwrap();
        assert_eq!(parse_datetime("2024-02-01 10:30:00").unwrap(), expected);
        assert_eq!(parse_datetime("2024-02-01T10:30:00").unwrap(), expected);
        assert_eq!(parse_datetime("2024-02-01 10:30").unwrap(), expected);
        assert_eq!(parse_datetime("2024-02-01T10:30:00+04:00").unwrap(), expected);
        assert_eq!(
            parse_datetime(" 2024-02-01 ").unwrap(),
            ymd(2024, 2, 1).and_time(NaiveTime::MIN)
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(parse_datetime("yesterday"), Err(Error::InvalidDate(_))));
        assert!(parse_date("2024-13-01").is_err());
    }

    #[test]
    fn buckets() {
        // 2024-02-07 is a Wednesday
        let date = ymd(2024, 2, 7);
        assert_eq!(week_start(date), ymd(2024, 2, 5));
        assert_eq!(week_start(ymd(2024, 2, 5)), ymd(2024, 2, 5));
        // ISO week starting in the previous year
        assert_eq!(week_start(ymd(2024, 1, 1)), ymd(2024, 1, 1));
        assert_eq!(week_start(ymd(2023, 1, 1)), ymd(2022, 12, 26));
        assert_eq!(month_start(date), ymd(2024, 2, 1));
        assert_eq!(month_label(date), "2024-02");
    }
}
