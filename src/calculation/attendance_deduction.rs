//! Attendance deduction calculation.
//!
//! This module converts a month of attendance records into the unpaid-leave
//! and lateness deductions taken from an employee's salary. Both are prorated
//! from the base salary: unpaid leave per workday, lateness and early leave
//! per working hour.

use chrono::{NaiveTime, Timelike};
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::models::{
    AttendanceDeductions, AttendanceRecord, AttendanceStatus, AuditStep, AuditWarning, PayPeriod,
};

use super::workdays::{WorkdayCount, workdays_in_period};

/// Minutes late below which an arrival is not deducted.
pub const LATE_THRESHOLD_MINUTES: i64 = 30;

/// Length of a standard working day in hours.
pub const STANDARD_DAY_HOURS: u32 = 8;

/// Clock-in time after which an arrival counts as late.
pub const STANDARD_START: NaiveTime = match NaiveTime::from_hms_opt(9, 0, 0) {
    Some(time) => time,
    None => NaiveTime::MIN,
};

/// Clause reference recorded on attendance audit steps.
pub const ATTENDANCE_CLAUSE: &str = "attendance_policy";

/// The result of an attendance deduction calculation.
#[derive(Debug, Clone)]
pub struct AttendanceDeductionResult {
    /// The computed deductions.
    pub deductions: AttendanceDeductions,
    /// Records skipped or defaults applied along the way.
    pub warnings: Vec<AuditWarning>,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Converts attendance records into salary deductions.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::AttendanceDeductionCalculator;
/// use payroll_engine::models::{AttendanceRecord, AttendanceStatus, PayPeriod};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let period: PayPeriod = "2025-03".parse().unwrap();
/// let records = vec![AttendanceRecord {
///     employee_id: "emp_001".to_string(),
///     date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
///     clock_in: None,
///     clock_out: None,
///     actual_hours: None,
///     status: AttendanceStatus::UnpaidLeave,
/// }];
///
/// let calculator = AttendanceDeductionCalculator::default();
/// let result = calculator.calculate(Decimal::new(3_000_000, 0), &period, &records, 1);
///
/// // 3,000,000 / 21 workdays, truncated
/// assert_eq!(result.deductions.unpaid_deduction, Decimal::new(142_857, 0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttendanceDeductionCalculator {
    standard_start: NaiveTime,
}

impl Default for AttendanceDeductionCalculator {
    fn default() -> Self {
        Self {
            standard_start: STANDARD_START,
        }
    }
}

impl AttendanceDeductionCalculator {
    /// Creates a calculator with a custom standard start time.
    pub fn with_standard_start(standard_start: NaiveTime) -> Self {
        Self { standard_start }
    }

    /// The time after which a clock-in counts as late.
    pub fn standard_start(&self) -> NaiveTime {
        self.standard_start
    }

    /// Calculates the deductions for `period` against `base_salary`.
    ///
    /// Records dated outside the period are ignored. A late record without a
    /// clock-in, or an early-leave record with negative recorded hours or
    /// hours that cannot be determined, is skipped and reported as a warning.
    pub fn calculate(
        &self,
        base_salary: Decimal,
        period: &PayPeriod,
        records: &[AttendanceRecord],
        step_number: u32,
    ) -> AttendanceDeductionResult {
        let workdays = workdays_in_period(period);
        self.calculate_with_workdays(base_salary, period, records, workdays, step_number)
    }

    /// Calculates the deductions with an explicit workday count.
    pub fn calculate_with_workdays(
        &self,
        base_salary: Decimal,
        period: &PayPeriod,
        records: &[AttendanceRecord],
        workdays: WorkdayCount,
        step_number: u32,
    ) -> AttendanceDeductionResult {
        let mut warnings = Vec::new();
        let workdays = if workdays.days == 0 {
            warn!(period = %period, "Zero workdays supplied, using default");
            WorkdayCount::fallback()
        } else {
            workdays
        };

        if workdays.is_fallback() {
            warnings.push(AuditWarning::new(
                "WORKDAY_FALLBACK",
                format!(
                    "Workdays for {} could not be counted; {} assumed",
                    period, workdays.days
                ),
                "medium",
            ));
        }

        let in_period: Vec<&AttendanceRecord> = records
            .iter()
            .filter(|r| period.contains_date(r.date))
            .collect();

        let unpaid_days = in_period
            .iter()
            .filter(|r| r.status == AttendanceStatus::UnpaidLeave)
            .count() as u32;

        let mut late_hours = Decimal::ZERO;
        for record in &in_period {
            match record.status {
                AttendanceStatus::Late => match self.late_hours(record) {
                    Some(hours) => late_hours += hours,
                    None => {
                        warn!(
                            employee_id = %record.employee_id,
                            date = %record.date,
                            "Late record has no clock-in, skipped"
                        );
                        warnings.push(AuditWarning::new(
                            "LATE_WITHOUT_CLOCK_IN",
                            format!(
                                "Late record on {} has no clock-in and was skipped",
                                record.date
                            ),
                            "low",
                        ));
                    }
                },
                AttendanceStatus::EarlyLeave
                    if record.actual_hours.is_some_and(|h| h < Decimal::ZERO) =>
                {
                    warn!(
                        employee_id = %record.employee_id,
                        date = %record.date,
                        actual_hours = ?record.actual_hours,
                        "Early-leave record has negative hours, skipped"
                    );
                    warnings.push(AuditWarning::new(
                        "NEGATIVE_RECORDED_HOURS",
                        format!(
                            "Early-leave record on {} has negative recorded hours and was skipped",
                            record.date
                        ),
                        "medium",
                    ));
                }
                AttendanceStatus::EarlyLeave => match record.worked_hours() {
                    Some(hours) => late_hours += shortfall(hours),
                    None => {
                        warn!(
                            employee_id = %record.employee_id,
                            date = %record.date,
                            "Early-leave record has no worked hours, skipped"
                        );
                        warnings.push(AuditWarning::new(
                            "EARLY_LEAVE_WITHOUT_HOURS",
                            format!(
                                "Early-leave record on {} has no worked hours and was skipped",
                                record.date
                            ),
                            "low",
                        ));
                    }
                },
                _ => {}
            }
        }
        let late_hours = late_hours.round_dp(2);

        let base = base_salary.max(Decimal::ZERO);
        let days = Decimal::from(workdays.days);
        let unpaid_deduction = (base * Decimal::from(unpaid_days) / days).floor();
        let lateness_deduction =
            (base * late_hours / (days * Decimal::from(STANDARD_DAY_HOURS))).floor();

        debug!(
            period = %period,
            records = in_period.len(),
            unpaid_days,
            late_hours = %late_hours,
            unpaid_deduction = %unpaid_deduction,
            lateness_deduction = %lateness_deduction,
            "Attendance deductions calculated"
        );

        let deductions = AttendanceDeductions {
            unpaid_days,
            unpaid_deduction,
            late_hours,
            lateness_deduction,
            workdays: workdays.days,
            workday_source: workdays.source,
        };

        let audit_step = AuditStep {
            step_number,
            rule_id: "attendance_deduction".to_string(),
            rule_name: "Attendance Deductions".to_string(),
            clause_ref: ATTENDANCE_CLAUSE.to_string(),
            input: serde_json::json!({
                "base_salary": base_salary.normalize().to_string(),
                "pay_period": period.to_string(),
                "records_in_period": in_period.len(),
                "workdays": workdays.days,
            }),
            output: serde_json::json!({
                "unpaid_days": unpaid_days,
                "unpaid_deduction": unpaid_deduction.normalize().to_string(),
                "late_hours": late_hours.normalize().to_string(),
                "lateness_deduction": lateness_deduction.normalize().to_string(),
            }),
            reasoning: format!(
                "Unpaid leave: {} × {} day(s) / {} workdays = {}; lateness: {} × {}h / ({} × {}h) = {}",
                base.normalize(),
                unpaid_days,
                workdays.days,
                unpaid_deduction.normalize(),
                base.normalize(),
                late_hours.normalize(),
                workdays.days,
                STANDARD_DAY_HOURS,
                lateness_deduction.normalize()
            ),
        };

        AttendanceDeductionResult {
            deductions,
            warnings,
            audit_step,
        }
    }

    /// Deductible late hours for one record, or `None` without a clock-in.
    ///
    /// Only hour and minute count. Arrivals less than
    /// [`LATE_THRESHOLD_MINUTES`] after the standard start contribute zero.
    fn late_hours(&self, record: &AttendanceRecord) -> Option<Decimal> {
        let clock_in = record.clock_in?;
        let minutes = |t: NaiveTime| i64::from(t.hour()) * 60 + i64::from(t.minute());
        let late_minutes = minutes(clock_in) - minutes(self.standard_start);

        if late_minutes < LATE_THRESHOLD_MINUTES {
            return Some(Decimal::ZERO);
        }
        Some(Decimal::from(late_minutes) / Decimal::from(60))
    }
}

/// Hours short of a standard day.
fn shortfall(worked: Decimal) -> Decimal {
    (Decimal::from(STANDARD_DAY_HOURS) - worked).max(Decimal::ZERO)
}
