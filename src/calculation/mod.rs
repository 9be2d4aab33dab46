//! Calculation logic for the payroll engine.
//!
//! This module contains the calculators that turn an employee snapshot, a
//! month of attendance and a tax year's [`RateTable`](crate::config::RateTable)
//! into payroll figures: workday counting, attendance deductions, statutory
//! insurance, annualized income tax, and the assembler that runs them in
//! order. Annual leave entitlement and severance pay are computed
//! independently of a pay run.

mod annual_leave;
mod attendance_deduction;
mod batch;
mod income_tax;
mod insurance;
mod payroll;
mod severance;
mod workdays;

pub use annual_leave::{
    AccrualBasis, AnnualLeaveResult, BASE_ANNUAL_LEAVE_DAYS, MAX_ADDITIONAL_LEAVE_DAYS,
    calculate_annual_leave,
};
pub use attendance_deduction::{
    ATTENDANCE_CLAUSE, AttendanceDeductionCalculator, AttendanceDeductionResult,
    LATE_THRESHOLD_MINUTES, STANDARD_DAY_HOURS, STANDARD_START,
};
pub use batch::{BatchEntry, BatchFailure, BatchOutcome, BatchPayrollRunner};
pub use income_tax::{IncomeTaxEngine, IncomeTaxResult, RESIDENT_TAX_RATE};
pub use insurance::{InsuranceCalculator, InsuranceResult};
pub use payroll::PayrollAssembler;
pub use severance::{
    DEFAULT_SALARY_WINDOW, SEVERANCE_DAYS_PER_YEAR, SeveranceResult, calculate_severance,
    trailing_base_salaries,
};
pub use workdays::{DEFAULT_WORKDAYS, WorkdayCount, workdays_in_month, workdays_in_period};
