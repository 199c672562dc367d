use crate::utils::error::{GanttError, Result};
use chrono::{Datelike, NaiveDate};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

fn month_year_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(\d{2})-(\d{4})$").expect("static regex is valid"))
}

/// A calendar month, stored as the first day of that month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthYear(NaiveDate);

impl MonthYear {
    /// Parses `MM-YYYY`, e.g. `03-2021`.
    pub fn parse(value: &str) -> Result<Self> {
        let format_error = || GanttError::FormatError {
            value: value.to_string(),
        };

        let caps = month_year_pattern()
            .captures(value)
            .ok_or_else(format_error)?;
        let month: u32 = caps[1].parse().map_err(|_| format_error())?;
        let year: i32 = caps[2].parse().map_err(|_| format_error())?;

        if year < 1 {
            return Err(format_error());
        }

        NaiveDate::from_ymd_opt(year, month, 1)
            .map(MonthYear)
            .ok_or_else(format_error)
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Day number in the proleptic Gregorian calendar, 0001-01-01 being day 1.
    pub fn ordinal(&self) -> i64 {
        i64::from(self.0.num_days_from_ce())
    }

    /// Whole days from `self` to `later`; negative when `later` is earlier.
    pub fn days_until(&self, later: &MonthYear) -> i64 {
        (later.0 - self.0).num_days()
    }
}

impl fmt::Display for MonthYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:04}", self.month(), self.year())
    }
}

impl std::str::FromStr for MonthYear {
    type Err = GanttError;

    fn from_str(s: &str) -> Result<Self> {
        MonthYear::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_format_round_trip() {
        for value in ["01-2021", "12-1999", "07-0001", "02-2024"] {
            let date = MonthYear::parse(value).unwrap();
            assert_eq!(date.to_string(), value);
        }
    }

    #[test]
    fn test_parse_rejects_wrong_layout() {
        for value in ["2020-01", "1-2020", "01/2020", "01-20", " 01-2020", "01-2020x", ""] {
            let err = MonthYear::parse(value).unwrap_err();
            assert!(
                matches!(&err, GanttError::FormatError { value: v } if v == value),
                "unexpected error for {:?}: {}",
                value,
                err
            );
        }
    }

    #[test]
    fn test_parse_rejects_month_out_of_range() {
        assert!(MonthYear::parse("00-2020").is_err());
        assert!(MonthYear::parse("13-2020").is_err());
        assert!(MonthYear::parse("01-0000").is_err());
    }

    #[test]
    fn test_ordinal_matches_calendar() {
        let first = MonthYear::parse("01-0001").unwrap();
        assert_eq!(first.ordinal(), 1);

        let jan = MonthYear::parse("01-2021").unwrap();
        let mar = MonthYear::parse("03-2021").unwrap();
        assert_eq!(jan.ordinal(), 737791);
        assert_eq!(mar.ordinal() - jan.ordinal(), 59);
        assert_eq!(jan.days_until(&mar), 59);
    }

    #[test]
    fn test_leap_year_february() {
        let feb = MonthYear::parse("02-2024").unwrap();
        let mar = MonthYear::parse("03-2024").unwrap();
        assert_eq!(feb.days_until(&mar), 29);
    }

    #[test]
    fn test_ordering_follows_time() {
        let a = MonthYear::parse("12-2020").unwrap();
        let b = MonthYear::parse("01-2021").unwrap();
        assert!(a < b);
        assert!(a.ordinal() < b.ordinal());
    }
}
