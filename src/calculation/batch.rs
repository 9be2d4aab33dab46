//! Batch payroll runs.
//!
//! A batch computes one month's payroll for many employees in parallel using
//! [`rayon`]. Employees who are not active are skipped. A failure for one
//! employee is recorded and the rest of the batch continues.

use rayon::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{EngineError, EngineResult};
use crate::models::{AttendanceSource, ElectedAllowances, Employee, PayPeriod, PayrollResult};

use super::payroll::PayrollAssembler;

/// One employee in a batch with their elected allowances.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchEntry {
    /// The employee snapshot.
    pub employee: Employee,
    /// Allowances elected for the month.
    #[serde(default)]
    pub allowances: ElectedAllowances,
}

/// An employee whose payroll could not be produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchFailure {
    /// The employee's identifier.
    pub employee_id: String,
    /// The error code.
    pub code: String,
    /// The error message.
    pub message: String,
}

impl BatchFailure {
    fn from_error(employee_id: &str, error: &EngineError) -> Self {
        Self {
            employee_id: employee_id.to_string(),
            code: error.code().to_string(),
            message: error.to_string(),
        }
    }
}

/// The outcome of a batch run, in input order.
#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome {
    /// The month the batch was run for.
    pub pay_period: PayPeriod,
    /// Successful payroll results.
    pub results: Vec<PayrollResult>,
    /// Employees whose payroll failed.
    pub failures: Vec<BatchFailure>,
    /// Identifiers of employees skipped because they are not active.
    pub skipped_inactive: Vec<String>,
}

enum EntryOutcome {
    Done(Box<PayrollResult>),
    Failed(BatchFailure),
    Skipped(String),
}

/// Runs monthly payroll for many employees in parallel.
#[derive(Debug, Clone)]
pub struct BatchPayrollRunner {
    assembler: PayrollAssembler,
}

impl BatchPayrollRunner {
    /// Creates a runner around an assembler.
    pub fn new(assembler: PayrollAssembler) -> Self {
        Self { assembler }
    }

    /// The assembler used for each employee.
    pub fn assembler(&self) -> &PayrollAssembler {
        &self.assembler
    }

    /// Runs payroll for `pay_period` (`YYYY-MM`) over `entries`.
    ///
    /// Fails only if the pay period is malformed. Each employee with a
    /// positive base salary has their attendance fetched from `source` with
    /// one call; a fetch or calculation error lands in
    /// [`BatchOutcome::failures`].
    pub fn run(
        &self,
        pay_period: &str,
        entries: &[BatchEntry],
        source: Option<&(dyn AttendanceSource + Sync)>,
    ) -> EngineResult<BatchOutcome> {
        let period: PayPeriod = pay_period.parse()?;

        let outcomes: Vec<EntryOutcome> = entries
            .par_iter()
            .map(|entry| self.run_entry(&period, entry, source))
            .collect();

        let mut outcome = BatchOutcome {
            pay_period: period,
            results: Vec::new(),
            failures: Vec::new(),
            skipped_inactive: Vec::new(),
        };
        for entry in outcomes {
            match entry {
                EntryOutcome::Done(result) => outcome.results.push(*result),
                EntryOutcome::Failed(failure) => outcome.failures.push(failure),
                EntryOutcome::Skipped(id) => outcome.skipped_inactive.push(id),
            }
        }

        info!(
            pay_period = %period,
            employees = entries.len(),
            completed = outcome.results.len(),
            failed = outcome.failures.len(),
            skipped = outcome.skipped_inactive.len(),
            "Batch payroll run finished"
        );

        Ok(outcome)
    }

    fn run_entry(
        &self,
        period: &PayPeriod,
        entry: &BatchEntry,
        source: Option<&(dyn AttendanceSource + Sync)>,
    ) -> EntryOutcome {
        let employee = &entry.employee;
        if !employee.is_active() {
            return EntryOutcome::Skipped(employee.id.clone());
        }

        let records = match source {
            Some(source) if employee.base_salary > Decimal::ZERO => {
                match source.attendance(&employee.id, period.start_date, period.end_date) {
                    Ok(records) => records,
                    Err(err) => {
                        warn!(employee_id = %employee.id, error = %err, "Attendance fetch failed");
                        return EntryOutcome::Failed(BatchFailure::from_error(&employee.id, &err));
                    }
                }
            }
            _ => Vec::new(),
        };

        match self
            .assembler
            .assemble(employee, period, &entry.allowances, &records)
        {
            Ok(result) => EntryOutcome::Done(Box::new(result)),
            Err(err) => {
                warn!(employee_id = %employee.id, error = %err, "Payroll failed");
                EntryOutcome::Failed(BatchFailure::from_error(&employee.id, &err))
            }
        }
    }
}
