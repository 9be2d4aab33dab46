//! Payroll Engine for Korean Monthly Payroll
//!
//! This crate computes monthly payroll for salaried employees: attendance
//! deductions, statutory insurance withholdings, annualized income tax and
//! resident tax, and net pay, with an audit trace of every step. It also
//! computes annual leave entitlements and severance pay. Statutory rates are
//! loaded per tax year from YAML rate tables.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
