//! Pay period model.
//!
//! This module contains the [`PayPeriod`] type: one calendar month, written
//! `"YYYY-MM"` on the wire and in stored payroll records.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Represents a monthly pay period with its inclusive date range.
///
/// # Example
///
/// ```
/// use payroll_engine::models::PayPeriod;
/// use chrono::NaiveDate;
///
/// let period: PayPeriod = "2025-04".parse().unwrap();
///
/// assert_eq!(period.start_date, NaiveDate::from_ymd_opt(2025, 4, 1).unwrap());
/// assert_eq!(period.end_date, NaiveDate::from_ymd_opt(2025, 4, 30).unwrap());
/// assert!(period.contains_date(NaiveDate::from_ymd_opt(2025, 4, 15).unwrap()));
/// assert_eq!(period.to_string(), "2025-04");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PayPeriod {
    /// The first day of the month.
    pub start_date: NaiveDate,
    /// The last day of the month.
    pub end_date: NaiveDate,
}

impl PayPeriod {
    /// Creates the pay period covering `year`-`month`.
    pub fn from_month(year: i32, month: u32) -> EngineResult<Self> {
        let invalid = || EngineError::InvalidPayPeriod {
            value: format!("{:04}-{:02}", year, month),
            message: "no such calendar month".to_string(),
        };

        let start_date = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        let next_month = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        };
        let end_date = next_month.and_then(|d| d.pred_opt()).ok_or_else(invalid)?;

        Ok(Self {
            start_date,
            end_date,
        })
    }

    /// The calendar year of the period.
    pub fn year(&self) -> i32 {
        self.start_date.year()
    }

    /// The calendar month of the period, 1-based.
    pub fn month(&self) -> u32 {
        self.start_date.month()
    }

    /// Checks if a given date falls within this pay period.
    ///
    /// The check is inclusive of both start and end dates.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}

impl FromStr for PayPeriod {
    type Err = EngineError;

    /// Parses exactly `YYYY-MM`: four digit year, two digit month.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |message: &str| EngineError::InvalidPayPeriod {
            value: s.to_string(),
            message: message.to_string(),
        };

        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| invalid("expected the format YYYY-MM"))?;

        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if year.len() != 4 || month.len() != 2 || !all_digits(year) || !all_digits(month) {
            return Err(invalid("expected the format YYYY-MM"));
        }

        let year: i32 = year.parse().map_err(|_| invalid("year is not a number"))?;
        let month: u32 = month.parse().map_err(|_| invalid("month is not a number"))?;
        if !(1..=12).contains(&month) {
            return Err(invalid("month must be between 01 and 12"));
        }

        Self::from_month(year, month)
    }
}

impl fmt::Display for PayPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl TryFrom<String> for PayPeriod {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PayPeriod> for String {
    fn from(period: PayPeriod) -> Self {
        period.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// PP-001: contains_date within period
    #[test]
    fn test_contains_date_within_period() {
        let period = PayPeriod::from_month(2025, 4).unwrap();
        assert!(period.contains_date(date(2025, 4, 15)));
    }

    /// PP-002: contains_date outside period
    #[test]
    fn test_contains_date_outside_period() {
        let period = PayPeriod::from_month(2025, 4).unwrap();
        assert!(!period.contains_date(date(2025, 5, 1)));
        assert!(!period.contains_date(date(2025, 3, 31)));
    }

    #[test]
    fn test_contains_date_on_boundaries() {
        let period = PayPeriod::from_month(2025, 4).unwrap();
        assert!(period.contains_date(period.start_date));
        assert!(period.contains_date(period.end_date));
    }

    #[test]
    fn test_december_ends_on_the_31st() {
        let period = PayPeriod::from_month(2025, 12).unwrap();
        assert_eq!(period.end_date, date(2025, 12, 31));
    }

    #[test]
    fn test_february_in_leap_year() {
        let period = PayPeriod::from_month(2024, 2).unwrap();
        assert_eq!(period.end_date, date(2024, 2, 29));

        let period = PayPeriod::from_month(2025, 2).unwrap();
        assert_eq!(period.end_date, date(2025, 2, 28));
    }

    #[test]
    fn test_parse_valid_period() {
        let period: PayPeriod = "2025-01".parse().unwrap();
        assert_eq!(period.year(), 2025);
        assert_eq!(period.month(), 1);
        assert_eq!(period.start_date, date(2025, 1, 1));
        assert_eq!(period.end_date, date(2025, 1, 31));
    }

    #[test]
    fn test_parse_rejects_malformed_input() {
        let inputs = [
            "2025-4", "2025/04", "25-04", "2025-13", "2025-00", "abcd-ef", "", "2025-04-01",
        ];
        for input in inputs {
            match input.parse::<PayPeriod>() {
                Err(EngineError::InvalidPayPeriod { value, .. }) => assert_eq!(value, input),
                other => panic!("Expected InvalidPayPeriod for {:?}, got {:?}", input, other),
            }
        }
    }

    #[test]
    fn test_from_month_rejects_invalid_month() {
        assert!(PayPeriod::from_month(2025, 0).is_err());
        assert!(PayPeriod::from_month(2025, 13).is_err());
    }

    #[test]
    fn test_display_pads_month() {
        let period = PayPeriod::from_month(2025, 3).unwrap();
        assert_eq!(period.to_string(), "2025-03");
    }

    #[test]
    fn test_serialize_as_string() {
        let period = PayPeriod::from_month(2025, 4).unwrap();
        assert_eq!(serde_json::to_string(&period).unwrap(), "\"2025-04\"");
    }

    #[test]
    fn test_deserialize_from_string() {
        let period: PayPeriod = serde_json::from_str("\"2024-02\"").unwrap();
        assert_eq!(period.end_date, date(2024, 2, 29));

        assert!(serde_json::from_str::<PayPeriod>("\"2024-2\"").is_err());
    }

    #[test]
    fn test_periods_order_chronologically() {
        let earlier: PayPeriod = "2024-12".parse().unwrap();
        let later: PayPeriod = "2025-01".parse().unwrap();
        assert!(earlier < later);
    }
}
