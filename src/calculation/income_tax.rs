//! Income tax and resident tax calculation.
//!
//! This module implements the annualized withholding method: the adjusted
//! monthly salary is annualized, reduced by the salary income deduction and
//! per-capita personal deductions, taxed through the progressive brackets,
//! credited for additional household members, and brought back to a monthly
//! figure. Resident tax is a flat share of the income tax.

use rust_decimal::Decimal;
use tracing::debug;

use crate::config::{IncomeTaxRates, RateTable};
use crate::error::EngineResult;
use crate::models::{AuditStep, IncomeTaxBreakdown};

/// Resident tax as a fraction of income tax.
pub const RESIDENT_TAX_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

const MONTHS_PER_YEAR: u32 = 12;

/// The result of an income tax calculation, including the breakdown and audit step.
#[derive(Debug, Clone)]
pub struct IncomeTaxResult {
    /// Monthly taxes with the annualized working figures.
    pub breakdown: IncomeTaxBreakdown,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Computes monthly income and resident tax with one tax year's rates.
///
/// # Example
///
/// ```no_run
/// use payroll_engine::calculation::IncomeTaxEngine;
/// use payroll_engine::config::ConfigLoader;
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::load("./config").unwrap();
/// let engine = IncomeTaxEngine::new(loader.rate_table(2025).unwrap()).unwrap();
///
/// let result = engine.calculate(Decimal::new(3_000_000, 0), 1, 1);
/// assert_eq!(result.breakdown.income_tax, Decimal::new(193_125, 0));
/// assert_eq!(result.breakdown.resident_tax, Decimal::new(19_312, 0));
/// ```
#[derive(Debug, Clone)]
pub struct IncomeTaxEngine {
    tax_year: i32,
    rates: IncomeTaxRates,
}

impl IncomeTaxEngine {
    /// Creates an engine, rejecting an invalid rate table.
    pub fn new(table: &RateTable) -> EngineResult<Self> {
        table.validate_income_tax()?;

        Ok(Self {
            tax_year: table.tax_year,
            rates: table.income_tax.clone(),
        })
    }

    /// Calculates monthly taxes on `adjusted_salary` for a household of
    /// `household_count` people including the employee. A household of zero
    /// is treated as one.
    pub fn calculate(
        &self,
        adjusted_salary: Decimal,
        household_count: u32,
        step_number: u32,
    ) -> IncomeTaxResult {
        let salary = adjusted_salary.max(Decimal::ZERO);
        let household = household_count.max(1);
        let months = Decimal::from(MONTHS_PER_YEAR);

        let annual_gross = salary * months;
        let salary_income_deduction = self.rates.salary_income_deduction.apply(annual_gross);
        let salary_income = annual_gross - salary_income_deduction;
        let personal_deductions = Decimal::from(household) * self.rates.per_capita_deduction;
        let taxable_income = (salary_income - personal_deductions).max(Decimal::ZERO);

        let annual_tax_before_credit = self.rates.brackets.apply(taxable_income);
        let child_credit = Decimal::from(household - 1) * self.rates.per_child_credit;
        let annual_tax_after_credit = (annual_tax_before_credit - child_credit).max(Decimal::ZERO);
        let resident_tax_annual = (annual_tax_after_credit * RESIDENT_TAX_RATE).floor();

        let income_tax = (annual_tax_after_credit / months).floor();
        let resident_tax = (resident_tax_annual / months).floor();

        let effective_rate = if salary.is_zero() {
            Decimal::ZERO
        } else {
            ((income_tax + resident_tax) * Decimal::ONE_HUNDRED / salary).round_dp(2)
        };

        debug!(
            tax_year = self.tax_year,
            adjusted_salary = %salary,
            household,
            taxable_income = %taxable_income,
            income_tax = %income_tax,
            resident_tax = %resident_tax,
            "Income tax calculated"
        );

        let breakdown = IncomeTaxBreakdown {
            income_tax,
            resident_tax,
            annual_gross,
            salary_income_deduction,
            salary_income,
            personal_deductions,
            taxable_income,
            annual_tax_before_credit,
            child_credit,
            annual_tax_after_credit,
            resident_tax_annual,
            effective_rate,
        };

        let audit_step = AuditStep {
            step_number,
            rule_id: "income_tax".to_string(),
            rule_name: "Annualized Income Tax".to_string(),
            clause_ref: format!("rates/{}.income_tax", self.tax_year),
            input: serde_json::json!({
                "adjusted_salary": salary.normalize().to_string(),
                "household_count": household,
            }),
            output: serde_json::json!({
                "annual_gross": annual_gross.normalize().to_string(),
                "salary_income_deduction": salary_income_deduction.normalize().to_string(),
                "taxable_income": taxable_income.normalize().to_string(),
                "annual_tax_before_credit": annual_tax_before_credit.normalize().to_string(),
                "child_credit": child_credit.normalize().to_string(),
                "annual_tax_after_credit": annual_tax_after_credit.normalize().to_string(),
                "income_tax": income_tax.normalize().to_string(),
                "resident_tax": resident_tax.normalize().to_string(),
            }),
            reasoning: format!(
                "Taxable {} = {} - {} deduction - {} personal; annual tax {} - {} credit = {}; monthly {} plus resident {}",
                taxable_income.normalize(),
                annual_gross.normalize(),
                salary_income_deduction.normalize(),
                personal_deductions.normalize(),
                annual_tax_before_credit.normalize(),
                child_credit.normalize(),
                annual_tax_after_credit.normalize(),
                income_tax.normalize(),
                resident_tax.normalize()
            ),
        };

        IncomeTaxResult {
            breakdown,
            audit_step,
        }
    }
}
