//! Statutory insurance withholding calculation.
//!
//! This module computes the four employee-side insurance contributions
//! (national pension, health insurance, long-term care, employment
//! insurance) from the adjusted salary.

use rust_decimal::Decimal;
use tracing::debug;

use crate::config::{InsuranceRates, PensionLimits, RateTable};
use crate::error::EngineResult;
use crate::models::{AuditStep, InsuranceWithholdings};

/// The result of an insurance calculation, including the withholdings and audit step.
#[derive(Debug, Clone)]
pub struct InsuranceResult {
    /// The four withholdings.
    pub withholdings: InsuranceWithholdings,
    /// The pension base after clamping to the configured limits.
    pub pension_base: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Computes insurance withholdings with one tax year's rates.
///
/// # Example
///
/// ```no_run
/// use payroll_engine::calculation::InsuranceCalculator;
/// use payroll_engine::config::ConfigLoader;
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::load("./config").unwrap();
/// let calculator = InsuranceCalculator::new(loader.rate_table(2025).unwrap()).unwrap();
///
/// let result = calculator.calculate(Decimal::new(3_000_000, 0), 1);
/// assert_eq!(result.withholdings.national_pension, Decimal::new(135_000, 0));
/// assert_eq!(result.withholdings.long_term_care, Decimal::new(13_772, 0));
/// ```
#[derive(Debug, Clone)]
pub struct InsuranceCalculator {
    tax_year: i32,
    rates: InsuranceRates,
    limits: PensionLimits,
}

impl InsuranceCalculator {
    /// Creates a calculator, rejecting an invalid rate table.
    pub fn new(table: &RateTable) -> EngineResult<Self> {
        table.validate_insurance()?;

        Ok(Self {
            tax_year: table.tax_year,
            rates: table.insurance.clone(),
            limits: table.pension_limits.clone(),
        })
    }

    /// Calculates the withholdings on `adjusted_salary`.
    ///
    /// - Pension: the salary clamped to the pension limits, times the pension rate.
    /// - Health insurance: the salary times the health rate.
    /// - Long-term care: the health insurance amount times the care rate.
    /// - Employment insurance: the salary times the employment rate.
    ///
    /// Each amount is truncated to a whole currency unit.
    pub fn calculate(&self, adjusted_salary: Decimal, step_number: u32) -> InsuranceResult {
        let salary = adjusted_salary.max(Decimal::ZERO);
        let pension_base = salary.clamp(self.limits.min, self.limits.max);

        let national_pension = (pension_base * self.rates.national_pension).floor();
        let health_insurance = (salary * self.rates.health_insurance).floor();
        let long_term_care = (health_insurance * self.rates.long_term_care).floor();
        let employment_insurance = (salary * self.rates.employment_insurance).floor();

        let withholdings = InsuranceWithholdings {
            national_pension,
            health_insurance,
            long_term_care,
            employment_insurance,
        };

        debug!(
            tax_year = self.tax_year,
            adjusted_salary = %salary,
            pension_base = %pension_base,
            total = %withholdings.total(),
            "Insurance withholdings calculated"
        );

        let audit_step = AuditStep {
            step_number,
            rule_id: "insurance_withholding".to_string(),
            rule_name: "Statutory Insurance".to_string(),
            clause_ref: format!("rates/{}.insurance", self.tax_year),
            input: serde_json::json!({
                "adjusted_salary": salary.normalize().to_string(),
                "pension_base": pension_base.normalize().to_string(),
                "national_pension_rate": self.rates.national_pension.normalize().to_string(),
                "health_insurance_rate": self.rates.health_insurance.normalize().to_string(),
                "long_term_care_rate": self.rates.long_term_care.normalize().to_string(),
                "employment_insurance_rate": self.rates.employment_insurance.normalize().to_string(),
            }),
            output: serde_json::json!({
                "national_pension": national_pension.normalize().to_string(),
                "health_insurance": health_insurance.normalize().to_string(),
                "long_term_care": long_term_care.normalize().to_string(),
                "employment_insurance": employment_insurance.normalize().to_string(),
            }),
            reasoning: format!(
                "Pension {} × {} = {}; health {} × {} = {}; long-term care {} × {} = {}; employment {} × {} = {}",
                pension_base.normalize(),
                self.rates.national_pension.normalize(),
                national_pension.normalize(),
                salary.normalize(),
                self.rates.health_insurance.normalize(),
                health_insurance.normalize(),
                health_insurance.normalize(),
                self.rates.long_term_care.normalize(),
                long_term_care.normalize(),
                salary.normalize(),
                self.rates.employment_insurance.normalize(),
                employment_insurance.normalize()
            ),
        };

        InsuranceResult {
            withholdings,
            pension_base,
            audit_step,
        }
    }
}
