//! Severance pay calculation.
//!
//! Employees with at least one year of service receive thirty days of
//! average wage for every completed year. The average monthly wage is the
//! mean of the most recent monthly salaries; the daily wage is a thirtieth
//! of it. A partial final year is not prorated.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, MAX_MONTHLY_AMOUNT, PayrollFigures};

use super::annual_leave::{DAYS_PER_FOUR_YEARS, completed_years, tenure_years};

/// Days of average wage paid per completed year.
pub const SEVERANCE_DAYS_PER_YEAR: u32 = 30;

/// Months of salary history averaged by default.
pub const DEFAULT_SALARY_WINDOW: usize = 3;

/// The outcome of a severance calculation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeveranceResult {
    /// Days between hire and termination.
    pub tenure_days: i64,
    /// Tenure in years, to two decimal places.
    pub tenure_years: Decimal,
    /// Whole years of service counted towards severance.
    pub completed_years: u32,
    /// Whether the employee qualifies for severance.
    pub eligible: bool,
    /// Mean of the supplied monthly salaries, zero when not eligible.
    pub average_monthly_wage: Decimal,
    /// Average daily wage to two decimal places, zero when not eligible.
    pub daily_average_wage: Decimal,
    /// Severance in whole currency units.
    pub severance_pay: Decimal,
    /// A human-readable summary.
    pub message: String,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates severance for service from `hire_date` to `termination_date`
/// with the given recent monthly salaries.
///
/// Fails if `recent_salaries` is empty, contains an amount that is negative
/// or above [`MAX_MONTHLY_AMOUNT`], or the termination date precedes the
/// hire date. Service under one year is not an
/// error: the result is ineligible with zero pay.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_severance;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let salaries = [Decimal::new(3_000_000, 0); 3];
/// let result = calculate_severance(
///     NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
///     &salaries,
/// )
/// .unwrap();
///
/// assert_eq!(result.completed_years, 3);
/// assert_eq!(result.severance_pay, Decimal::new(9_000_000, 0));
/// ```
pub fn calculate_severance(
    hire_date: NaiveDate,
    termination_date: NaiveDate,
    recent_salaries: &[Decimal],
) -> EngineResult<SeveranceResult> {
    if recent_salaries.is_empty() {
        return Err(EngineError::InvalidSeveranceInput {
            message: "at least one recent monthly salary is required".to_string(),
        });
    }
    if let Some(negative) = recent_salaries.iter().find(|s| **s < Decimal::ZERO) {
        return Err(EngineError::InvalidSeveranceInput {
            message: format!("monthly salary must not be negative, got {}", negative),
        });
    }
    if let Some(excessive) = recent_salaries.iter().find(|s| **s > MAX_MONTHLY_AMOUNT) {
        return Err(EngineError::InvalidSeveranceInput {
            message: format!("monthly salary {} exceeds {}", excessive, MAX_MONTHLY_AMOUNT),
        });
    }
    if termination_date < hire_date {
        return Err(EngineError::InvalidSeveranceInput {
            message: format!(
                "termination date {} precedes hire date {}",
                termination_date, hire_date
            ),
        });
    }

    let tenure_days = (termination_date - hire_date).num_days();
    let years = tenure_years(tenure_days);

    if 4 * tenure_days < DAYS_PER_FOUR_YEARS {
        debug!(tenure_days, "Service under one year, no severance");

        let message = format!(
            "Service of {} days is under one year; not eligible for severance",
            tenure_days
        );
        let audit_step = severance_step(
            hire_date,
            termination_date,
            recent_salaries.len(),
            serde_json::json!({
                "eligible": false,
                "severance_pay": "0",
            }),
            message.clone(),
        );

        return Ok(SeveranceResult {
            tenure_days,
            tenure_years: years,
            completed_years: 0,
            eligible: false,
            average_monthly_wage: Decimal::ZERO,
            daily_average_wage: Decimal::ZERO,
            severance_pay: Decimal::ZERO,
            message,
            audit_step,
        });
    }

    let completed = u32::try_from(completed_years(tenure_days)).map_err(|_| {
        EngineError::CalculationError {
            message: format!("tenure of {} days is out of range", tenure_days),
        }
    })?;

    let total: Decimal = recent_salaries.iter().sum();
    let months = Decimal::from(recent_salaries.len() as u64);
    let average_monthly_wage = total / months;
    let daily_average_wage =
        (average_monthly_wage / Decimal::from(SEVERANCE_DAYS_PER_YEAR)).round_dp(2);

    // completed × 30 × (total / months / 30), multiplied before dividing
    let severance_pay = (Decimal::from(completed) * total / months).floor();

    debug!(
        tenure_days,
        completed_years = completed,
        average_monthly_wage = %average_monthly_wage,
        severance_pay = %severance_pay,
        "Severance calculated"
    );

    let message = format!(
        "{} year(s) of service, severance {}",
        years.round_dp(1).normalize(),
        severance_pay.normalize()
    );
    let audit_step = severance_step(
        hire_date,
        termination_date,
        recent_salaries.len(),
        serde_json::json!({
            "eligible": true,
            "completed_years": completed,
            "average_monthly_wage": average_monthly_wage.round_dp(2).normalize().to_string(),
            "daily_average_wage": daily_average_wage.normalize().to_string(),
            "severance_pay": severance_pay.normalize().to_string(),
        }),
        format!(
            "{} completed year(s) × {} days × {} daily average = {}",
            completed,
            SEVERANCE_DAYS_PER_YEAR,
            daily_average_wage.normalize(),
            severance_pay.normalize()
        ),
    );

    Ok(SeveranceResult {
        tenure_days,
        tenure_years: years,
        completed_years: completed,
        eligible: true,
        average_monthly_wage,
        daily_average_wage,
        severance_pay,
        message,
        audit_step,
    })
}

fn severance_step(
    hire_date: NaiveDate,
    termination_date: NaiveDate,
    salary_months: usize,
    output: serde_json::Value,
    reasoning: String,
) -> AuditStep {
    AuditStep {
        step_number: 1,
        rule_id: "severance_pay".to_string(),
        rule_name: "Severance Pay".to_string(),
        clause_ref: "labor_standards.severance".to_string(),
        input: serde_json::json!({
            "hire_date": hire_date.to_string(),
            "termination_date": termination_date.to_string(),
            "salary_months": salary_months,
        }),
        output,
        reasoning,
    }
}

/// Picks the base salaries of the `months` most recent pay periods in
/// `history`, most recent first.
///
/// Without any history the current base salary stands in for every month.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::trailing_base_salaries;
/// use rust_decimal::Decimal;
///
/// let current = Decimal::new(2_800_000, 0);
/// assert_eq!(trailing_base_salaries(&[], current, 3), vec![current; 3]);
/// ```
pub fn trailing_base_salaries(
    history: &[PayrollFigures],
    current_base: Decimal,
    months: usize,
) -> Vec<Decimal> {
    if history.is_empty() {
        if months > 0 {
            warn!(months, "No payroll history, using current base salary");
        }
        return vec![current_base; months];
    }

    let mut recent: Vec<&PayrollFigures> = history.iter().collect();
    recent.sort_by(|a, b| b.pay_period.cmp(&a.pay_period));
    recent.dedup_by_key(|f| f.pay_period);

    recent
        .into_iter()
        .take(months)
        .map(|f| f.base_salary)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PayPeriod, WorkdaySource};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn create_test_figures(period: &str, base_salary: &str) -> PayrollFigures {
        let pay_period: PayPeriod = period.parse().unwrap();
        let mut figures = PayrollFigures::zero(
            "emp_001".to_string(),
            pay_period,
            22,
            WorkdaySource::Computed,
        );
        figures.base_salary = dec(base_salary);
        figures
    }

    /// SV-001: 364 days of service is not eligible
    #[test]
    fn test_under_one_year_is_ineligible() {
        let salaries = [dec("3000000")];
        let result =
            calculate_severance(date("2023-01-01"), date("2023-12-31"), &salaries).unwrap();

        assert_eq!(result.tenure_days, 364);
        assert!(!result.eligible);
        assert_eq!(result.severance_pay, Decimal::ZERO);
        assert_eq!(result.average_monthly_wage, Decimal::ZERO);
        assert!(result.message.contains("not eligible"));
    }

    /// SV-002: 366 days with a constant salary pays one month
    #[test]
    fn test_just_over_one_year_pays_one_month() {
        let salaries = [dec("3000000"); 3];
        let result =
            calculate_severance(date("2023-01-01"), date("2024-01-02"), &salaries).unwrap();

        assert_eq!(result.tenure_days, 366);
        assert!(result.eligible);
        assert_eq!(result.completed_years, 1);
        assert_eq!(result.daily_average_wage, dec("100000"));
        assert_eq!(result.severance_pay, dec("3000000"));
    }

    /// SV-003: partial years are not prorated
    #[test]
    fn test_partial_year_is_not_prorated() {
        let salaries = [dec("3000000")];
        let result =
            calculate_severance(date("2020-01-01"), date("2022-12-01"), &salaries).unwrap();

        assert_eq!(result.completed_years, 2);
        assert_eq!(result.severance_pay, dec("6000000"));
    }

    #[test]
    fn test_average_of_uneven_salaries() {
        let salaries = [dec("3000000"), dec("3100000"), dec("3250000")];
        let result =
            calculate_severance(date("2020-01-01"), date("2023-01-01"), &salaries).unwrap();

        // mean 3,116,666.66..., daily 103,888.89, three years
        assert_eq!(result.average_monthly_wage.round_dp(2), dec("3116666.67"));
        assert_eq!(result.daily_average_wage, dec("103888.89"));
        assert_eq!(result.severance_pay, dec("9350000"));
    }

    #[test]
    fn test_empty_salaries_rejected() {
        let result = calculate_severance(date("2020-01-01"), date("2023-01-01"), &[]);
        assert!(matches!(result, Err(EngineError::InvalidSeveranceInput { .. })));
    }

    #[test]
    fn test_negative_salary_rejected() {
        let salaries = [dec("3000000"), dec("-1")];
        let result = calculate_severance(date("2020-01-01"), date("2023-01-01"), &salaries);
        assert!(matches!(result, Err(EngineError::InvalidSeveranceInput { .. })));
    }

    #[test]
    fn test_salary_above_ceiling_rejected() {
        let salaries = [dec("3000000"), dec("10000000000000000000000000000")];
        let result = calculate_severance(date("1990-01-01"), date("2023-01-01"), &salaries);
        assert!(matches!(result, Err(EngineError::InvalidSeveranceInput { .. })));
    }

    #[test]
    fn test_salary_at_ceiling_over_long_service() {
        let salaries = [MAX_MONTHLY_AMOUNT; 3];
        let result =
            calculate_severance(date("1923-01-01"), date("2023-01-01"), &salaries).unwrap();

        assert_eq!(result.completed_years, 100);
        assert_eq!(result.severance_pay, MAX_MONTHLY_AMOUNT * Decimal::from(100));
    }

    #[test]
    fn test_termination_before_hire_rejected() {
        let salaries = [dec("3000000")];
        let result = calculate_severance(date("2023-01-01"), date("2022-01-01"), &salaries);
        assert!(matches!(result, Err(EngineError::InvalidSeveranceInput { .. })));
    }

    #[test]
    fn test_severance_is_whole_units() {
        let salaries = [dec("2333333"), dec("2333334")];
        let result =
            calculate_severance(date("2015-03-02"), date("2025-03-31"), &salaries).unwrap();

        assert_eq!(result.severance_pay, result.severance_pay.trunc());
    }

    #[test]
    fn test_trailing_salaries_fall_back_to_current() {
        let current = dec("2800000");
        assert_eq!(trailing_base_salaries(&[], current, 3), vec![current; 3]);
        assert!(trailing_base_salaries(&[], current, 0).is_empty());
    }

    #[test]
    fn test_trailing_salaries_most_recent_first() {
        let history = [
            create_test_figures("2025-01", "2900000"),
            create_test_figures("2025-04", "3200000"),
            create_test_figures("2025-02", "3000000"),
            create_test_figures("2025-03", "3100000"),
        ];

        assert_eq!(
            trailing_base_salaries(&history, dec("3300000"), 3),
            vec![dec("3200000"), dec("3100000"), dec("3000000")]
        );
    }

    #[test]
    fn test_trailing_salaries_short_history() {
        let history = [create_test_figures("2025-04", "3200000")];
        assert_eq!(trailing_base_salaries(&history, dec("3300000"), 3), vec![dec("3200000")]);
    }

    #[test]
    fn test_audit_step() {
        let salaries = [dec("3000000"); 3];
        let result =
            calculate_severance(date("2023-01-01"), date("2024-01-02"), &salaries).unwrap();

        assert_eq!(result.audit_step.rule_id, "severance_pay");
        assert_eq!(result.audit_step.output["severance_pay"], "3000000");
        assert_eq!(result.audit_step.input["salary_months"], 3);
    }
}
