//! Payroll assembly.
//!
//! The [`PayrollAssembler`] runs the calculators in order for one employee
//! and one month: attendance deductions against the base salary, gross and
//! adjusted salary, insurance and income tax against the adjusted salary,
//! then totals and net pay.

use rust_decimal::Decimal;
use tracing::debug;

use crate::config::RateTable;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AttendanceRecord, AttendanceSource, AuditStep, AuditTrace, CalculationMetadata,
    ElectedAllowances, Employee, MAX_MONTHLY_AMOUNT, PayPeriod, PayrollFigures, PayrollResult,
};

use super::attendance_deduction::AttendanceDeductionCalculator;
use super::income_tax::IncomeTaxEngine;
use super::insurance::InsuranceCalculator;
use super::workdays::workdays_in_period;

/// Assembles complete payroll results with one tax year's rates.
///
/// # Example
///
/// ```no_run
/// use payroll_engine::calculation::PayrollAssembler;
/// use payroll_engine::config::ConfigLoader;
/// use payroll_engine::models::{ElectedAllowances, Employee};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::load("./config").unwrap();
/// let assembler = PayrollAssembler::new(loader.rate_table(2025).unwrap()).unwrap();
///
/// let employee = Employee {
///     id: "emp_001".to_string(),
///     name: "Kim Minji".to_string(),
///     base_salary: Decimal::new(3_000_000, 0),
///     family_count: 1,
///     hire_date: NaiveDate::from_ymd_opt(2021, 3, 2).unwrap(),
///     status: Default::default(),
///     leave: Default::default(),
/// };
///
/// let result = assembler
///     .assemble_for_month(&employee, "2025-04", &ElectedAllowances::none(), None)
///     .unwrap();
/// assert_eq!(result.figures.net_pay, Decimal::new(2_505_441, 0));
/// ```
#[derive(Debug, Clone)]
pub struct PayrollAssembler {
    tax_year: i32,
    meal_baseline: Decimal,
    attendance: AttendanceDeductionCalculator,
    insurance: InsuranceCalculator,
    income_tax: IncomeTaxEngine,
}

impl PayrollAssembler {
    /// Creates an assembler, rejecting an invalid rate table.
    pub fn new(table: &RateTable) -> EngineResult<Self> {
        table.validate()?;

        Ok(Self {
            tax_year: table.tax_year,
            meal_baseline: table.allowances.meal,
            attendance: AttendanceDeductionCalculator::default(),
            insurance: InsuranceCalculator::new(table)?,
            income_tax: IncomeTaxEngine::new(table)?,
        })
    }

    /// The tax year of the rates in use.
    pub fn tax_year(&self) -> i32 {
        self.tax_year
    }

    /// Parses `pay_period` as `YYYY-MM`, fetches the month's attendance from
    /// `source` with a single call, and assembles the result.
    ///
    /// Without a source the month is treated as having no attendance
    /// anomalies. Fetch errors are returned as-is.
    pub fn assemble_for_month(
        &self,
        employee: &Employee,
        pay_period: &str,
        allowances: &ElectedAllowances,
        source: Option<&dyn AttendanceSource>,
    ) -> EngineResult<PayrollResult> {
        let period: PayPeriod = pay_period.parse()?;

        let records = match source {
            Some(source) if employee.base_salary > Decimal::ZERO => {
                source.attendance(&employee.id, period.start_date, period.end_date)?
            }
            _ => Vec::new(),
        };

        self.assemble(employee, &period, allowances, &records)
    }

    /// Assembles the payroll result for `employee` in `period`.
    ///
    /// A base salary at or below zero short-circuits to an all-zero result.
    /// Fails on an employee without an id, on a base salary above
    /// [`MAX_MONTHLY_AMOUNT`], and on an allowance that is negative or above
    /// it.
    pub fn assemble(
        &self,
        employee: &Employee,
        period: &PayPeriod,
        allowances: &ElectedAllowances,
        records: &[AttendanceRecord],
    ) -> EngineResult<PayrollResult> {
        if employee.id.trim().is_empty() {
            return Err(EngineError::InvalidEmployee {
                field: "id".to_string(),
                message: "employee id must not be empty".to_string(),
            });
        }

        if employee.base_salary > MAX_MONTHLY_AMOUNT {
            return Err(EngineError::InvalidEmployee {
                field: "base_salary".to_string(),
                message: format!(
                    "base salary {} exceeds {}",
                    employee.base_salary, MAX_MONTHLY_AMOUNT
                ),
            });
        }

        if employee.base_salary <= Decimal::ZERO {
            return Ok(self.zero_result(employee, period));
        }

        let allowances = allowances.resolve(self.meal_baseline)?;
        let mut trace = AuditTrace::default();
        let base_salary = employee.base_salary;

        let attendance =
            self.attendance
                .calculate(base_salary, period, records, trace.next_step_number());
        trace.steps.push(attendance.audit_step);
        trace.warnings.extend(attendance.warnings);
        let attendance = attendance.deductions;

        let total_allowances = allowances.total();
        let gross_pay = base_salary + total_allowances;
        let adjusted_salary = (gross_pay - attendance.total()).max(Decimal::ZERO);
        trace.steps.push(AuditStep {
            step_number: trace.next_step_number(),
            rule_id: "adjusted_salary".to_string(),
            rule_name: "Gross and Adjusted Salary".to_string(),
            clause_ref: "payroll".to_string(),
            input: serde_json::json!({
                "base_salary": base_salary.normalize().to_string(),
                "total_allowances": total_allowances.normalize().to_string(),
                "attendance_deductions": attendance.total().normalize().to_string(),
            }),
            output: serde_json::json!({
                "gross_pay": gross_pay.normalize().to_string(),
                "adjusted_salary": adjusted_salary.normalize().to_string(),
            }),
            reasoning: format!(
                "Gross {} = {} base + {} allowances; adjusted {} after {} attendance deductions",
                gross_pay.normalize(),
                base_salary.normalize(),
                total_allowances.normalize(),
                adjusted_salary.normalize(),
                attendance.total().normalize()
            ),
        });

        let insurance = self
            .insurance
            .calculate(adjusted_salary, trace.next_step_number());
        trace.steps.push(insurance.audit_step);
        let insurance = insurance.withholdings;

        let tax = self.income_tax.calculate(
            adjusted_salary,
            employee.household_count(),
            trace.next_step_number(),
        );
        trace.steps.push(tax.audit_step);
        let tax = tax.breakdown;

        let total_deductions = insurance.total() + tax.total() + attendance.total();
        let net_pay = gross_pay - total_deductions;
        trace.steps.push(AuditStep {
            step_number: trace.next_step_number(),
            rule_id: "net_pay".to_string(),
            rule_name: "Total Deductions and Net Pay".to_string(),
            clause_ref: "payroll".to_string(),
            input: serde_json::json!({
                "gross_pay": gross_pay.normalize().to_string(),
                "insurance": insurance.total().normalize().to_string(),
                "taxes": tax.total().normalize().to_string(),
                "attendance_deductions": attendance.total().normalize().to_string(),
            }),
            output: serde_json::json!({
                "total_deductions": total_deductions.normalize().to_string(),
                "net_pay": net_pay.normalize().to_string(),
            }),
            reasoning: format!(
                "Net {} = {} gross - {} deductions",
                net_pay.normalize(),
                gross_pay.normalize(),
                total_deductions.normalize()
            ),
        });

        debug!(
            employee_id = %employee.id,
            pay_period = %period,
            gross_pay = %gross_pay,
            total_deductions = %total_deductions,
            net_pay = %net_pay,
            "Payroll assembled"
        );

        Ok(PayrollResult {
            metadata: CalculationMetadata::new(),
            figures: PayrollFigures {
                employee_id: employee.id.clone(),
                pay_period: *period,
                base_salary,
                allowances,
                total_allowances,
                gross_pay,
                adjusted_salary,
                insurance,
                tax,
                attendance,
                total_deductions,
                net_pay,
            },
            audit_trace: trace,
        })
    }

    fn zero_result(&self, employee: &Employee, period: &PayPeriod) -> PayrollResult {
        let workdays = workdays_in_period(period);
        debug!(
            employee_id = %employee.id,
            pay_period = %period,
            base_salary = %employee.base_salary,
            "No positive base salary, returning zero payroll"
        );

        let step = AuditStep {
            step_number: 1,
            rule_id: "zero_salary".to_string(),
            rule_name: "Zero Salary Short-Circuit".to_string(),
            clause_ref: "payroll".to_string(),
            input: serde_json::json!({
                "base_salary": employee.base_salary.normalize().to_string(),
            }),
            output: serde_json::json!({ "net_pay": "0" }),
            reasoning: "Base salary is not positive; every figure is zero".to_string(),
        };

        PayrollResult {
            metadata: CalculationMetadata::new(),
            figures: PayrollFigures::zero(
                employee.id.clone(),
                *period,
                workdays.days,
                workdays.source,
            ),
            audit_trace: AuditTrace {
                steps: vec![step],
                warnings: Vec::new(),
            },
        }
    }
}
