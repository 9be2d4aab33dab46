//! Workday counting.
//!
//! The number of weekdays in a month is the divisor for daily and hourly
//! wage figures. When the count cannot be produced the engine degrades to
//! [`DEFAULT_WORKDAYS`] and says so in the returned [`WorkdayCount`].

use chrono::{Datelike, Weekday};
use tracing::warn;

use crate::models::{PayPeriod, WorkdaySource};

/// Workdays assumed when a month's count cannot be computed.
pub const DEFAULT_WORKDAYS: u32 = 22;

/// A workday count tagged with how it was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkdayCount {
    /// Number of workdays.
    pub days: u32,
    /// Whether `days` was counted or defaulted.
    pub source: WorkdaySource,
}

impl WorkdayCount {
    /// A count taken from the calendar.
    pub fn computed(days: u32) -> Self {
        Self {
            days,
            source: WorkdaySource::Computed,
        }
    }

    /// The default count.
    pub fn fallback() -> Self {
        Self {
            days: DEFAULT_WORKDAYS,
            source: WorkdaySource::Fallback,
        }
    }

    /// Returns true if the default was applied.
    pub fn is_fallback(&self) -> bool {
        self.source == WorkdaySource::Fallback
    }
}

/// Counts the weekdays (Monday to Friday) in `year`-`month`.
///
/// An impossible month, or one that somehow has no weekdays, yields
/// [`WorkdayCount::fallback`] and a warning.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::{workdays_in_month, DEFAULT_WORKDAYS};
/// use payroll_engine::models::WorkdaySource;
///
/// let april = workdays_in_month(2025, 4);
/// assert_eq!(april.days, 22);
/// assert_eq!(april.source, WorkdaySource::Computed);
///
/// let invalid = workdays_in_month(2025, 13);
/// assert_eq!(invalid.days, DEFAULT_WORKDAYS);
/// assert!(invalid.is_fallback());
/// ```
pub fn workdays_in_month(year: i32, month: u32) -> WorkdayCount {
    let period = match PayPeriod::from_month(year, month) {
        Ok(period) => period,
        Err(err) => {
            warn!(year, month, error = %err, "Cannot count workdays, using default");
            return WorkdayCount::fallback();
        }
    };

    workdays_in_period(&period)
}

/// Counts the weekdays in a pay period.
pub fn workdays_in_period(period: &PayPeriod) -> WorkdayCount {
    let days = period
        .start_date
        .iter_days()
        .take_while(|d| *d <= period.end_date)
        .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
        .count() as u32;

    if days == 0 {
        warn!(period = %period, "Month has no workdays, using default");
        return WorkdayCount::fallback();
    }

    WorkdayCount::computed(days)
}
