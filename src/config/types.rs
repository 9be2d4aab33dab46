//! Configuration types for payroll computation.
//!
//! This module contains the strongly-typed rate structures that are
//! deserialized from the per-tax-year YAML files under `config/rates/`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::schedule::ProgressiveSchedule;

/// Employee-side statutory insurance rates, as decimal fractions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsuranceRates {
    /// National pension rate applied to the clamped pension base.
    pub national_pension: Decimal,
    /// Health insurance rate applied to adjusted salary.
    pub health_insurance: Decimal,
    /// Long-term care rate applied to the health insurance amount.
    pub long_term_care: Decimal,
    /// Employment insurance rate applied to adjusted salary.
    pub employment_insurance: Decimal,
}

/// Floor and ceiling of the monthly income the pension is assessed on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PensionLimits {
    /// Lowest assessable monthly income.
    pub min: Decimal,
    /// Highest assessable monthly income.
    pub max: Decimal,
}

/// Annualized income tax parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeTaxRates {
    /// Marginal schedule producing the salary income deduction from annual gross.
    pub salary_income_deduction: ProgressiveSchedule,
    /// Annual personal deduction per household member.
    pub per_capita_deduction: Decimal,
    /// Annual tax credit per household member beyond the employee.
    pub per_child_credit: Decimal,
    /// Progressive income tax brackets applied to annual taxable income.
    pub brackets: ProgressiveSchedule,
}

/// Baseline amounts for allowances the employee did not elect explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AllowanceDefaults {
    /// Monthly meal allowance paid when none is specified.
    #[serde(default)]
    pub meal: Decimal,
}

/// The complete, immutable rate configuration for one tax year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateTable {
    /// The tax year these rates take effect in.
    pub tax_year: i32,
    /// Human-readable label for the table.
    #[serde(default)]
    pub name: String,
    /// Insurance rates.
    pub insurance: InsuranceRates,
    /// Pension base floor and ceiling.
    pub pension_limits: PensionLimits,
    /// Income tax parameters.
    pub income_tax: IncomeTaxRates,
    /// Allowance baselines.
    #[serde(default)]
    pub allowances: AllowanceDefaults,
}

impl RateTable {
    /// Validates the whole table.
    ///
    /// Every calculator calls this (or the section-specific checks) when it
    /// is constructed, so an invalid table is rejected before any payroll is
    /// computed with it.
    pub fn validate(&self) -> EngineResult<()> {
        self.validate_insurance()?;
        self.validate_income_tax()?;

        if self.allowances.meal < Decimal::ZERO {
            return Err(self.invalid("meal allowance baseline must not be negative"));
        }

        Ok(())
    }

    /// Validates the insurance rates and pension limits.
    pub fn validate_insurance(&self) -> EngineResult<()> {
        let rates = [
            ("national_pension", self.insurance.national_pension),
            ("health_insurance", self.insurance.health_insurance),
            ("long_term_care", self.insurance.long_term_care),
            ("employment_insurance", self.insurance.employment_insurance),
        ];

        for (name, rate) in rates {
            if rate < Decimal::ZERO || rate > Decimal::ONE {
                return Err(self.invalid(format!("{} rate {} is outside [0, 1]", name, rate)));
            }
        }

        if self.pension_limits.min < Decimal::ZERO {
            return Err(self.invalid("pension floor must not be negative"));
        }
        if self.pension_limits.min > self.pension_limits.max {
            return Err(self.invalid(format!(
                "pension floor {} exceeds ceiling {}",
                self.pension_limits.min, self.pension_limits.max
            )));
        }

        Ok(())
    }

    /// Validates the income tax parameters.
    pub fn validate_income_tax(&self) -> EngineResult<()> {
        let tax = &self.income_tax;

        tax.salary_income_deduction
            .validate()
            .map_err(|m| self.invalid(format!("salary income deduction: {}", m)))?;
        tax.brackets
            .validate()
            .map_err(|m| self.invalid(format!("income tax brackets: {}", m)))?;

        if tax.per_capita_deduction < Decimal::ZERO {
            return Err(self.invalid("per capita deduction must not be negative"));
        }
        if tax.per_child_credit < Decimal::ZERO {
            return Err(self.invalid("per child credit must not be negative"));
        }

        Ok(())
    }

    fn invalid(&self, message: impl Into<String>) -> EngineError {
        EngineError::InvalidRateTable {
            tax_year: self.tax_year,
            message: message.into(),
        }
    }
}

/// The bundled 2025 table, parsed from `config/rates/2025.yaml`.
#[cfg(test)]
pub(crate) fn test_rate_table() -> RateTable {
    serde_yaml::from_str(include_str!("../../config/rates/2025.yaml")).unwrap()
}
