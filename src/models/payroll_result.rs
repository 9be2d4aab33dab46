//! Payroll result models for the payroll engine.
//!
//! This module contains the [`PayrollResult`] type and the structures it is
//! assembled from. The financial figures live in [`PayrollFigures`], a pure
//! function of the calculation inputs; the per-run [`CalculationMetadata`]
//! sits beside it so recomputing a month never changes the figures.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Allowances, PayPeriod};

/// Whether the workday divisor was computed or fell back to the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkdaySource {
    /// Counted from the calendar.
    Computed,
    /// The calendar count was unusable and the default was applied.
    Fallback,
}

/// Attendance-based deductions for one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceDeductions {
    /// Number of unpaid-leave days.
    pub unpaid_days: u32,
    /// Amount deducted for unpaid leave.
    pub unpaid_deduction: Decimal,
    /// Late and early-leave hours, rounded to two decimals.
    pub late_hours: Decimal,
    /// Amount deducted for lateness and early leave.
    pub lateness_deduction: Decimal,
    /// Workdays used as the divisor.
    pub workdays: u32,
    /// How `workdays` was obtained.
    pub workday_source: WorkdaySource,
}

impl AttendanceDeductions {
    /// A month with nothing to deduct.
    pub fn none(workdays: u32, workday_source: WorkdaySource) -> Self {
        Self {
            unpaid_days: 0,
            unpaid_deduction: Decimal::ZERO,
            late_hours: Decimal::ZERO,
            lateness_deduction: Decimal::ZERO,
            workdays,
            workday_source,
        }
    }

    /// Sum of both deductions.
    pub fn total(&self) -> Decimal {
        self.unpaid_deduction + self.lateness_deduction
    }
}

/// The four statutory insurance withholdings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsuranceWithholdings {
    /// National pension contribution.
    pub national_pension: Decimal,
    /// Health insurance premium.
    pub health_insurance: Decimal,
    /// Long-term care premium.
    pub long_term_care: Decimal,
    /// Employment insurance premium.
    pub employment_insurance: Decimal,
}

impl InsuranceWithholdings {
    /// Sum of the four withholdings.
    pub fn total(&self) -> Decimal {
        self.national_pension
            + self.health_insurance
            + self.long_term_care
            + self.employment_insurance
    }
}

/// Monthly income and resident tax with the annualized working figures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeTaxBreakdown {
    /// Monthly income tax withheld.
    pub income_tax: Decimal,
    /// Monthly resident tax withheld.
    pub resident_tax: Decimal,
    /// Adjusted salary annualized.
    pub annual_gross: Decimal,
    /// Salary income deduction on the annual gross.
    pub salary_income_deduction: Decimal,
    /// Annual gross less the salary income deduction.
    pub salary_income: Decimal,
    /// Per-capita deductions for the household.
    pub personal_deductions: Decimal,
    /// Annual taxable income.
    pub taxable_income: Decimal,
    /// Annual tax from the brackets.
    pub annual_tax_before_credit: Decimal,
    /// Annual credit for household members beyond the employee.
    pub child_credit: Decimal,
    /// Annual tax after the credit.
    pub annual_tax_after_credit: Decimal,
    /// Annual resident tax.
    pub resident_tax_annual: Decimal,
    /// Monthly income plus resident tax as a percentage of adjusted salary.
    pub effective_rate: Decimal,
}

impl IncomeTaxBreakdown {
    /// Monthly income tax plus resident tax.
    pub fn total(&self) -> Decimal {
        self.income_tax + self.resident_tax
    }
}

/// The financial content of a payroll result.
///
/// Serializes as one flat record, the shape the payroll store upserts by
/// `(employee_id, pay_period)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollFigures {
    /// The employee paid.
    pub employee_id: String,
    /// The month paid, as `YYYY-MM`.
    pub pay_period: PayPeriod,
    /// Monthly base salary.
    pub base_salary: Decimal,
    /// Allowance amounts.
    #[serde(flatten)]
    pub allowances: Allowances,
    /// Sum of all allowances.
    pub total_allowances: Decimal,
    /// Base salary plus allowances.
    pub gross_pay: Decimal,
    /// Gross pay after attendance deductions, floored at zero.
    pub adjusted_salary: Decimal,
    /// Insurance withholdings.
    #[serde(flatten)]
    pub insurance: InsuranceWithholdings,
    /// Income and resident tax.
    #[serde(flatten)]
    pub tax: IncomeTaxBreakdown,
    /// Attendance deductions.
    #[serde(flatten)]
    pub attendance: AttendanceDeductions,
    /// Every withholding and deduction combined.
    pub total_deductions: Decimal,
    /// Gross pay less total deductions.
    pub net_pay: Decimal,
}

impl PayrollFigures {
    /// The all-zero figures reported for an employee without a salary.
    pub fn zero(
        employee_id: impl Into<String>,
        pay_period: PayPeriod,
        workdays: u32,
        workday_source: WorkdaySource,
    ) -> Self {
        Self {
            employee_id: employee_id.into(),
            pay_period,
            base_salary: Decimal::ZERO,
            allowances: Allowances::default(),
            total_allowances: Decimal::ZERO,
            gross_pay: Decimal::ZERO,
            adjusted_salary: Decimal::ZERO,
            insurance: InsuranceWithholdings::default(),
            tax: IncomeTaxBreakdown::default(),
            attendance: AttendanceDeductions::none(workdays, workday_source),
            total_deductions: Decimal::ZERO,
            net_pay: Decimal::ZERO,
        }
    }

    /// Recomputes the deduction total from its eight components.
    pub fn deduction_components_total(&self) -> Decimal {
        self.insurance.total() + self.tax.total() + self.attendance.total()
    }

    /// Total deductions as a percentage of gross pay, two decimals.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::{PayrollFigures, PayPeriod, WorkdaySource};
    /// use rust_decimal::Decimal;
    ///
    /// let period: PayPeriod = "2025-04".parse().unwrap();
    /// let mut figures = PayrollFigures::zero("emp_001", period, 22, WorkdaySource::Computed);
    /// assert_eq!(figures.deduction_rate(), Decimal::ZERO);
    ///
    /// figures.gross_pay = Decimal::new(3_000_000, 0);
    /// figures.total_deductions = Decimal::new(494_559, 0);
    /// assert_eq!(figures.deduction_rate(), Decimal::new(1649, 2));
    /// ```
    pub fn deduction_rate(&self) -> Decimal {
        if self.gross_pay.is_zero() {
            return Decimal::ZERO;
        }
        (self.total_deductions * Decimal::ONE_HUNDRED / self.gross_pay).round_dp(2)
    }
}

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// Reference to the statute or rate table section behind the rule.
    pub clause_ref: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings indicate recoverable anomalies that did not prevent the
/// calculation, such as a skipped attendance record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

impl AuditWarning {
    /// Creates a warning.
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        severity: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            severity: severity.into(),
        }
    }
}

/// The complete audit trace for a calculation.
///
/// Records every decision made during the calculation process. The trace is
/// deterministic: identical inputs produce an identical trace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
}

impl AuditTrace {
    /// The number the next recorded step should carry.
    pub fn next_step_number(&self) -> u32 {
        self.steps.len() as u32 + 1
    }
}

/// Non-financial metadata about one calculation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationMetadata {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub generated_at: DateTime<Utc>,
    /// The version of the engine that performed the calculation.
    pub engine_version: String,
}

impl CalculationMetadata {
    /// Stamps a new calculation with a fresh id and the current time.
    pub fn new() -> Self {
        Self {
            calculation_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl Default for CalculationMetadata {
    fn default() -> Self {
        Self::new()
    }
}

/// The complete result of a payroll calculation.
///
/// The figures are flattened into the top level; `metadata` and
/// `audit_trace` are nested objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollResult {
    /// Run metadata; varies between identical calculations.
    pub metadata: CalculationMetadata,
    /// The computed figures.
    #[serde(flatten)]
    pub figures: PayrollFigures,
    /// Complete audit trace of calculation decisions.
    pub audit_trace: AuditTrace,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    /// Helper function to create Decimal values from strings
    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_sample_figures() -> PayrollFigures {
        let mut figures = PayrollFigures::zero(
            "emp_001",
            "2025-04".parse().unwrap(),
            22,
            WorkdaySource::Computed,
        );
        figures.base_salary = dec("3000000");
        figures.gross_pay = dec("3000000");
        figures.adjusted_salary = dec("3000000");
        figures.insurance = InsuranceWithholdings {
            national_pension: dec("135000"),
            health_insurance: dec("106350"),
            long_term_care: dec("13772"),
            employment_insurance: dec("27000"),
        };
        figures.tax.income_tax = dec("193125");
        figures.tax.resident_tax = dec("19312");
        figures.total_deductions = dec("494559");
        figures.net_pay = dec("2505441");
        figures
    }

    /// PR-001: total_deductions equals the sum of its components
    #[test]
    fn test_deduction_components_total() {
        let figures = create_sample_figures();
        assert_eq!(figures.deduction_components_total(), figures.total_deductions);
        assert_eq!(figures.gross_pay - figures.total_deductions, figures.net_pay);
    }

    #[test]
    fn test_zero_figures() {
        let figures = PayrollFigures::zero(
            "emp_001",
            "2025-04".parse().unwrap(),
            22,
            WorkdaySource::Computed,
        );
        assert_eq!(figures.deduction_components_total(), Decimal::ZERO);
        assert_eq!(figures.net_pay, Decimal::ZERO);
        assert_eq!(figures.deduction_rate(), Decimal::ZERO);
    }

    #[test]
    fn test_figures_serialize_flat() {
        let json = serde_json::to_value(create_sample_figures()).unwrap();
        let object = json.as_object().unwrap();

        assert_eq!(object["employee_id"], "emp_001");
        assert_eq!(object["pay_period"], "2025-04");
        assert_eq!(object["national_pension"], "135000");
        assert_eq!(object["income_tax"], "193125");
        assert_eq!(object["unpaid_days"], 0);
        assert_eq!(object["workday_source"], "computed");
        assert_eq!(object["meal_allowance"], "0");
        assert!(object.values().all(|v| !v.is_object()), "figures must be flat");
    }

    #[test]
    fn test_figures_deserialize_from_flat_record() {
        let figures = create_sample_figures();
        let json = serde_json::to_string(&figures).unwrap();
        let parsed: PayrollFigures = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, figures);
    }

    #[test]
    fn test_result_nests_metadata_and_trace() {
        let result = PayrollResult {
            metadata: CalculationMetadata {
                calculation_id: Uuid::nil(),
                generated_at: DateTime::parse_from_rfc3339("2025-04-30T10:00:00Z")
                    .unwrap()
                    .with_timezone(&Utc),
                engine_version: "0.1.0".to_string(),
            },
            figures: create_sample_figures(),
            audit_trace: AuditTrace::default(),
        };

        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"metadata\":{"));
        assert!(json.contains("\"calculation_id\":\"00000000-0000-0000-0000-000000000000\""));
        assert!(json.contains("\"audit_trace\":{"));
        assert!(json.contains("\"net_pay\":\"2505441\""));
    }

    #[test]
    fn test_metadata_is_fresh_per_run() {
        let first = CalculationMetadata::new();
        let second = CalculationMetadata::new();
        assert_ne!(first.calculation_id, second.calculation_id);
        assert_eq!(first.engine_version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_audit_warning_serialization() {
        let warning =
            AuditWarning::new("LATE_WITHOUT_CLOCK_IN", "Late record has no clock-in", "low");

        let json = serde_json::to_string(&warning).unwrap();
        assert!(json.contains("\"code\":\"LATE_WITHOUT_CLOCK_IN\""));
        assert!(json.contains("\"severity\":\"low\""));
    }

    #[test]
    fn test_next_step_number() {
        let mut trace = AuditTrace::default();
        assert_eq!(trace.next_step_number(), 1);

        trace.steps.push(AuditStep {
            step_number: 1,
            rule_id: "gross_pay".to_string(),
            rule_name: "Gross pay".to_string(),
            clause_ref: "payroll".to_string(),
            input: serde_json::json!({}),
            output: serde_json::json!({}),
            reasoning: "Base plus allowances".to_string(),
        });
        assert_eq!(trace.next_step_number(), 2);
    }
}
