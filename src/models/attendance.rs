//! Attendance models.
//!
//! This module contains the [`AttendanceRecord`] type, its
//! [`AttendanceStatus`] tag, and the [`AttendanceSource`] trait through
//! which the engine fetches a month of records.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineResult;

/// Unpaid lunch break subtracted from clocked time.
const LUNCH_BREAK_MINUTES: i64 = 60;

/// The closed set of daily attendance outcomes.
///
/// Stored records may carry the labels used by the HR front end; those are
/// accepted as aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    /// A regular working day.
    #[serde(alias = "정상")]
    Normal,
    /// Clocked in after the standard start time.
    #[serde(alias = "지각")]
    Late,
    /// Left before completing a standard day.
    #[serde(alias = "조퇴")]
    EarlyLeave,
    /// A day of annual leave.
    #[serde(alias = "연차")]
    AnnualLeave,
    /// Absent without leave.
    #[serde(alias = "결근")]
    Absent,
    /// Paid leave other than annual leave.
    #[serde(alias = "휴가")]
    PaidLeave,
    /// Unpaid leave; deducted from salary.
    #[serde(alias = "무급휴가")]
    UnpaidLeave,
}

impl AttendanceStatus {
    /// Returns true for statuses on which the employee actually worked.
    pub fn is_worked(self) -> bool {
        matches!(self, Self::Normal | Self::Late | Self::EarlyLeave)
    }
}

/// One employee's attendance for one calendar day.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{AttendanceRecord, AttendanceStatus};
/// use chrono::{NaiveDate, NaiveTime};
/// use rust_decimal::Decimal;
///
/// let record = AttendanceRecord {
///     employee_id: "emp_001".to_string(),
///     date: NaiveDate::from_ymd_opt(2025, 4, 7).unwrap(),
///     clock_in: NaiveTime::from_hms_opt(9, 0, 0),
///     clock_out: NaiveTime::from_hms_opt(18, 0, 0),
///     actual_hours: None,
///     status: AttendanceStatus::Normal,
/// };
///
/// assert_eq!(record.worked_hours(), Some(Decimal::new(8, 0)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// The employee the record belongs to.
    pub employee_id: String,
    /// The calendar day.
    pub date: NaiveDate,
    /// Clock-in time, absent for non-worked days.
    #[serde(default)]
    pub clock_in: Option<NaiveTime>,
    /// Clock-out time, absent for non-worked days.
    #[serde(default)]
    pub clock_out: Option<NaiveTime>,
    /// Hours worked as recorded. Derived from the clock times when absent.
    #[serde(default)]
    pub actual_hours: Option<Decimal>,
    /// The attendance outcome for the day.
    pub status: AttendanceStatus,
}

impl AttendanceRecord {
    /// Returns the hours worked on this day.
    ///
    /// Recorded `actual_hours` wins. Otherwise worked statuses derive
    /// `clock_out - clock_in - 1h`, floored at zero, and zero when the
    /// clock-out is not after the clock-in. Non-worked statuses are zero.
    /// Returns `None` for negative recorded hours and for a worked status
    /// missing a clock time.
    pub fn worked_hours(&self) -> Option<Decimal> {
        if let Some(hours) = self.actual_hours {
            return (hours >= Decimal::ZERO).then_some(hours);
        }

        if !self.status.is_worked() {
            return Some(Decimal::ZERO);
        }

        let (clock_in, clock_out) = (self.clock_in?, self.clock_out?);
        if clock_out <= clock_in {
            return Some(Decimal::ZERO);
        }

        let minutes = (clock_out - clock_in).num_minutes() - LUNCH_BREAK_MINUTES;
        Some((Decimal::from(minutes) / Decimal::from(60)).max(Decimal::ZERO))
    }
}

/// Parses a clock time as stored by the HR front end.
///
/// Accepts `HH:MM:SS` and `HH:MM` (fractional seconds allowed). Returns
/// `None` for anything else so the caller can treat the time as missing.
///
/// # Example
///
/// ```
/// use payroll_engine::models::parse_clock_time;
/// use chrono::NaiveTime;
///
/// assert_eq!(parse_clock_time("09:45:00"), NaiveTime::from_hms_opt(9, 45, 0));
/// assert_eq!(parse_clock_time("09:45"), NaiveTime::from_hms_opt(9, 45, 0));
/// assert_eq!(parse_clock_time("late"), None);
/// ```
pub fn parse_clock_time(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .ok()
}

/// Supplies attendance records for one employee over a date range.
///
/// Implementations are called once per employee per pay period and are
/// expected to return every record with `start <= date <= end`. The engine
/// never retries a failed call.
pub trait AttendanceSource {
    /// Returns the employee's records in the inclusive date range.
    fn attendance(
        &self,
        employee_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Vec<AttendanceRecord>>;
}

impl AttendanceSource for [AttendanceRecord] {
    fn attendance(
        &self,
        employee_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Vec<AttendanceRecord>> {
        Ok(self
            .iter()
            .filter(|r| r.employee_id == employee_id && r.date >= start && r.date <= end)
            .cloned()
            .collect())
    }
}

impl AttendanceSource for Vec<AttendanceRecord> {
    fn attendance(
        &self,
        employee_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Vec<AttendanceRecord>> {
        self.as_slice().attendance(employee_id, start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn time(h: u32, m: u32) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(h, m, 0)
    }

    fn create_test_record(
        day: u32,
        status: AttendanceStatus,
        clock_in: Option<NaiveTime>,
        clock_out: Option<NaiveTime>,
    ) -> AttendanceRecord {
        AttendanceRecord {
            employee_id: "emp_001".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 4, day).unwrap(),
            clock_in,
            clock_out,
            actual_hours: None,
            status,
        }
    }

    /// AT-001: a standard 09:00-18:00 day is eight hours after lunch
    #[test]
    fn test_worked_hours_standard_day() {
        let record = create_test_record(1, AttendanceStatus::Normal, time(9, 0), time(18, 0));
        assert_eq!(record.worked_hours(), Some(dec("8")));
    }

    /// AT-002: recorded hours take precedence over clock times
    #[test]
    fn test_worked_hours_prefers_recorded_value() {
        let mut record =
            create_test_record(1, AttendanceStatus::EarlyLeave, time(9, 0), time(18, 0));
        record.actual_hours = Some(dec("5.5"));
        assert_eq!(record.worked_hours(), Some(dec("5.5")));
    }

    #[test]
    fn test_worked_hours_rejects_negative_recorded_value() {
        let mut record =
            create_test_record(1, AttendanceStatus::EarlyLeave, time(9, 0), time(18, 0));
        record.actual_hours = Some(dec("-5"));
        assert_eq!(record.worked_hours(), None);

        record.actual_hours = Some(Decimal::ZERO);
        assert_eq!(record.worked_hours(), Some(Decimal::ZERO));
    }

    #[test]
    fn test_worked_hours_partial_hour() {
        let record = create_test_record(1, AttendanceStatus::EarlyLeave, time(9, 0), time(15, 30));
        assert_eq!(record.worked_hours(), Some(dec("5.5")));
    }

    #[test]
    fn test_worked_hours_short_day_floors_at_zero() {
        let record = create_test_record(1, AttendanceStatus::EarlyLeave, time(9, 0), time(9, 40));
        assert_eq!(record.worked_hours(), Some(Decimal::ZERO));
    }

    #[test]
    fn test_worked_hours_clock_out_before_clock_in() {
        let record = create_test_record(1, AttendanceStatus::Normal, time(18, 0), time(9, 0));
        assert_eq!(record.worked_hours(), Some(Decimal::ZERO));
    }

    #[test]
    fn test_worked_hours_missing_clock_time() {
        let record = create_test_record(1, AttendanceStatus::EarlyLeave, time(9, 0), None);
        assert_eq!(record.worked_hours(), None);
    }

    #[test]
    fn test_non_worked_status_has_zero_hours() {
        let record = create_test_record(1, AttendanceStatus::UnpaidLeave, time(9, 0), time(18, 0));
        assert_eq!(record.worked_hours(), Some(Decimal::ZERO));
    }

    #[test]
    fn test_is_worked() {
        assert!(AttendanceStatus::Late.is_worked());
        assert!(AttendanceStatus::EarlyLeave.is_worked());
        assert!(!AttendanceStatus::AnnualLeave.is_worked());
        assert!(!AttendanceStatus::Absent.is_worked());
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&AttendanceStatus::EarlyLeave).unwrap(),
            "\"early_leave\""
        );
        assert_eq!(
            serde_json::to_string(&AttendanceStatus::UnpaidLeave).unwrap(),
            "\"unpaid_leave\""
        );
    }

    #[test]
    fn test_status_accepts_stored_labels() {
        let status: AttendanceStatus = serde_json::from_str("\"무급휴가\"").unwrap();
        assert_eq!(status, AttendanceStatus::UnpaidLeave);
        let status: AttendanceStatus = serde_json::from_str("\"지각\"").unwrap();
        assert_eq!(status, AttendanceStatus::Late);
    }

    #[test]
    fn test_deserialize_record() {
        let json = r#"{
            "employee_id": "emp_001",
            "date": "2025-04-07",
            "clock_in": "09:45:00",
            "clock_out": "18:00:00",
            "status": "late"
        }"#;

        let record: AttendanceRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.clock_in, time(9, 45));
        assert_eq!(record.actual_hours, None);
        assert_eq!(record.status, AttendanceStatus::Late);
    }

    #[test]
    fn test_parse_clock_time_formats() {
        assert_eq!(parse_clock_time("09:30:00"), time(9, 30));
        assert_eq!(parse_clock_time(" 09:30 "), time(9, 30));
        assert_eq!(parse_clock_time("09:30:00.000"), time(9, 30));
        assert_eq!(parse_clock_time("25:00"), None);
        assert_eq!(parse_clock_time(""), None);
    }

    #[test]
    fn test_slice_source_filters_by_employee_and_range() {
        let mut other = create_test_record(2, AttendanceStatus::Normal, time(9, 0), time(18, 0));
        other.employee_id = "emp_002".to_string();

        let records = vec![
            create_test_record(1, AttendanceStatus::Normal, time(9, 0), time(18, 0)),
            create_test_record(15, AttendanceStatus::Late, time(9, 40), time(18, 0)),
            create_test_record(30, AttendanceStatus::UnpaidLeave, None, None),
            other,
        ];

        let fetched = records
            .attendance(
                "emp_001",
                NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
                NaiveDate::from_ymd_opt(2025, 4, 15).unwrap(),
            )
            .unwrap();

        assert_eq!(fetched.len(), 2);
        assert!(fetched.iter().all(|r| r.employee_id == "emp_001"));
    }
}
