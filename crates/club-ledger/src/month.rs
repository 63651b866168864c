//! Calendar year-month values, contiguous month spans, and entry timestamps

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::constants::MONTH_LABELS;

/// A calendar month in a specific year (month is 1-12)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid month '{0}', expected YYYY-MM")]
pub struct ParseYearMonthError(String);

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Zero-based slot within the year (January = 0)
    pub fn index(&self) -> usize {
        (self.month - 1) as usize
    }

    /// Months elapsed since January of year 0
    pub fn ordinal(&self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month) - 1
    }

    pub fn from_ordinal(ordinal: i64) -> Self {
        Self {
            year: ordinal.div_euclid(12) as i32,
            month: ordinal.rem_euclid(12) as u32 + 1,
        }
    }

    /// The month `offset` months after this one, rolling over year boundaries
    pub fn plus_months(self, offset: u32) -> Self {
        Self::from_ordinal(self.ordinal() + i64::from(offset))
    }

    /// `count` consecutive months starting with this one
    pub fn span(self, count: u32) -> impl Iterator<Item = YearMonth> {
        (0..count).map(move |offset| self.plus_months(offset))
    }

    /// Short label such as "Nov 2023"
    pub fn label(&self) -> String {
        format!("{} {}", MONTH_LABELS[self.index()], self.year)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = ParseYearMonthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseYearMonthError(s.to_string());
        let trimmed = s.trim();
        let (year, month) = trimmed.split_once('-').ok_or_else(err)?;

        if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
            return Err(err());
        }
        if month.is_empty() || month.len() > 2 || !month.bytes().all(|b| b.is_ascii_digit()) {
            return Err(err());
        }

        let year: i32 = year.parse().map_err(|_| err())?;
        let month: u32 = month.parse().map_err(|_| err())?;
        YearMonth::new(year, month).ok_or_else(err)
    }
}

/// Parse an entry timestamp as written by clients.
///
/// Accepts RFC 3339 (`2024-03-15T10:20:30.000Z`), a naive date-time, or a bare
/// `YYYY-MM-DD` date. The wall-clock value as written is kept; offsets are not
/// converted to local time.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }
    value
        .get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Calendar date of an entry timestamp
pub fn parse_entry_date(value: &str) -> Option<NaiveDate> {
    parse_timestamp(value).map(|dt| dt.date())
}

/// Format an entry timestamp the way clients write them
pub fn format_timestamp(entered_at: NaiveDateTime) -> String {
    entered_at.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Current wall-clock time, used as the entry timestamp of new records
pub fn now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ym(year: i32, month: u32) -> YearMonth {
        YearMonth::new(year, month).unwrap()
    }

    #[test]
    fn test_parse_year_month() {
        assert_eq!("2023-11".parse::<YearMonth>(), Ok(ym(2023, 11)));
        assert_eq!(" 2024-1 ".parse::<YearMonth>(), Ok(ym(2024, 1)));
        assert!("2023-13".parse::<YearMonth>().is_err());
        assert!("2023-00".parse::<YearMonth>().is_err());
        assert!("2023-11-05".parse::<YearMonth>().is_err());
        assert!("Nov 2023".parse::<YearMonth>().is_err());
        assert!("".parse::<YearMonth>().is_err());
    }

    #[test]
    fn test_span_crosses_year_boundary() {
        let months: Vec<_> = ym(2023, 11).span(4).collect();
        assert_eq!(
            months,
            vec![ym(2023, 11), ym(2023, 12), ym(2024, 1), ym(2024, 2)]
        );
    }

    #[test]
    fn test_plus_months_many_years() {
        assert_eq!(ym(2023, 1).plus_months(25), ym(2025, 2));
        assert_eq!(ym(2023, 12).plus_months(0), ym(2023, 12));
    }

    #[test]
    fn test_ordinal_round_trip_negative_year() {
        let month = ym(-1, 12);
        assert_eq!(YearMonth::from_ordinal(month.ordinal()), month);
    }

    #[test]
    fn test_display_and_label() {
        assert_eq!(ym(2024, 3).to_string(), "2024-03");
        assert_eq!(ym(2024, 3).label(), "Mar 2024");
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(parse_entry_date("2024-03-15T10:20:30.000Z"), Some(expected));
        assert_eq!(parse_entry_date("2024-03-15T10:20:30"), Some(expected));
        assert_eq!(parse_entry_date("2024-03-15"), Some(expected));
        assert_eq!(parse_entry_date("not a date"), None);
        assert_eq!(parse_entry_date(""), None);
    }

    #[test]
    fn test_parse_timestamp_keeps_written_wall_clock() {
        let dt = parse_timestamp("2023-12-31T23:30:00+06:00").unwrap();
        assert_eq!(dt.date(), NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
    }
}
