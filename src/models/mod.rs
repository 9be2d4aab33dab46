//! Core data models for the payroll engine.
//!
//! This module contains all the domain models used throughout the engine.

mod allowance;
mod attendance;
mod employee;
mod pay_period;
mod payroll_result;

pub use allowance::{AllowanceKind, Allowances, ElectedAllowances};
pub use attendance::{AttendanceRecord, AttendanceSource, AttendanceStatus, parse_clock_time};
pub use employee::{Employee, EmploymentStatus, LeaveBalance, MAX_MONTHLY_AMOUNT};
pub use pay_period::PayPeriod;
pub use payroll_result::{
    AttendanceDeductions, AuditStep, AuditTrace, AuditWarning, CalculationMetadata,
    IncomeTaxBreakdown, InsuranceWithholdings, PayrollFigures, PayrollResult, WorkdaySource,
};
