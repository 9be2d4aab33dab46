//! Annual leave entitlement.
//!
//! Employees in their first year accrue one day per calendar month elapsed.
//! From the first anniversary they receive [`BASE_ANNUAL_LEAVE_DAYS`], plus
//! one day for every two further years of service, capped at
//! [`MAX_ADDITIONAL_LEAVE_DAYS`].
//!
//! Tenure is measured in days and converted to years at 365.25 days per
//! year. The comparisons are done on integers (`4 × days` against `1461`)
//! so the year boundaries are exact.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{AuditStep, LeaveBalance};

/// Days granted from the first anniversary.
pub const BASE_ANNUAL_LEAVE_DAYS: u32 = 15;

/// Cap on the seniority days added to the base grant.
pub const MAX_ADDITIONAL_LEAVE_DAYS: u32 = 10;

/// Days in four years, one of them a leap year.
pub(crate) const DAYS_PER_FOUR_YEARS: i64 = 1461;

/// Tenure in years at 365.25 days per year, to two decimal places.
pub(crate) fn tenure_years(tenure_days: i64) -> Decimal {
    (Decimal::from(tenure_days) * Decimal::from(4) / Decimal::from(DAYS_PER_FOUR_YEARS)).round_dp(2)
}

/// Whole years of tenure at 365.25 days per year.
pub(crate) fn completed_years(tenure_days: i64) -> i64 {
    (4 * tenure_days).div_euclid(DAYS_PER_FOUR_YEARS)
}

/// How an entitlement was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccrualBasis {
    /// First year: one day per calendar month elapsed.
    Monthly,
    /// From the first anniversary: base grant plus seniority days.
    Annual,
}

/// The annual leave entitlement on an evaluation date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnualLeaveResult {
    /// Hire date.
    pub hire_date: NaiveDate,
    /// Date the entitlement was evaluated on.
    pub evaluation_date: NaiveDate,
    /// Days between hire and evaluation.
    pub tenure_days: i64,
    /// Tenure in years, to two decimal places.
    pub tenure_years: Decimal,
    /// Which accrual rule applied.
    pub basis: AccrualBasis,
    /// Entitled leave days.
    pub entitlement_days: u32,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

impl AnnualLeaveResult {
    /// Returns `balance` refreshed with this entitlement.
    pub fn apply_to(&self, balance: LeaveBalance) -> LeaveBalance {
        balance.with_entitlement(self.entitlement_days)
    }
}

/// Calculates the annual leave entitlement of an employee hired on
/// `hire_date`, as of `evaluation_date`.
///
/// An evaluation date before the hire date yields zero days.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::{calculate_annual_leave, AccrualBasis};
/// use chrono::NaiveDate;
///
/// let hired = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
///
/// let mid_2020 = NaiveDate::from_ymd_opt(2020, 7, 15).unwrap();
/// let first_year = calculate_annual_leave(hired, mid_2020);
/// assert_eq!(first_year.basis, AccrualBasis::Monthly);
/// assert_eq!(first_year.entitlement_days, 6);
///
/// let start_2023 = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
/// let third_anniversary = calculate_annual_leave(hired, start_2023);
/// assert_eq!(third_anniversary.entitlement_days, 16);
/// ```
pub fn calculate_annual_leave(
    hire_date: NaiveDate,
    evaluation_date: NaiveDate,
) -> AnnualLeaveResult {
    let tenure_days = (evaluation_date - hire_date).num_days();
    let years = tenure_years(tenure_days);

    let (basis, entitlement_days) = if 4 * tenure_days < DAYS_PER_FOUR_YEARS {
        (AccrualBasis::Monthly, months_elapsed(hire_date, evaluation_date))
    } else {
        let additional = ((4 * tenure_days - DAYS_PER_FOUR_YEARS) / (2 * DAYS_PER_FOUR_YEARS))
            .min(i64::from(MAX_ADDITIONAL_LEAVE_DAYS));
        (AccrualBasis::Annual, BASE_ANNUAL_LEAVE_DAYS + additional as u32)
    };

    debug!(
        hire_date = %hire_date,
        evaluation_date = %evaluation_date,
        tenure_days,
        ?basis,
        entitlement_days,
        "Annual leave calculated"
    );

    let reasoning = match basis {
        AccrualBasis::Monthly => format!(
            "{} year(s) of tenure is under one year: {} month(s) elapsed = {} day(s)",
            years.normalize(),
            entitlement_days,
            entitlement_days
        ),
        AccrualBasis::Annual => format!(
            "{} year(s) of tenure: {} base + {} seniority = {} day(s)",
            years.normalize(),
            BASE_ANNUAL_LEAVE_DAYS,
            entitlement_days - BASE_ANNUAL_LEAVE_DAYS,
            entitlement_days
        ),
    };

    let audit_step = AuditStep {
        step_number: 1,
        rule_id: "annual_leave".to_string(),
        rule_name: "Annual Leave Entitlement".to_string(),
        clause_ref: "leave_policy".to_string(),
        input: serde_json::json!({
            "hire_date": hire_date.to_string(),
            "evaluation_date": evaluation_date.to_string(),
        }),
        output: serde_json::json!({
            "tenure_days": tenure_days,
            "tenure_years": years.normalize().to_string(),
            "entitlement_days": entitlement_days,
        }),
        reasoning,
    };

    AnnualLeaveResult {
        hire_date,
        evaluation_date,
        tenure_days,
        tenure_years: years,
        basis,
        entitlement_days,
        audit_step,
    }
}

/// Calendar months between two dates ignoring the day of month, floored at zero.
fn months_elapsed(from: NaiveDate, to: NaiveDate) -> u32 {
    let months = (i64::from(to.year()) - i64::from(from.year())) * 12
        + (i64::from(to.month()) - i64::from(from.month()));
    months.max(0) as u32
}
