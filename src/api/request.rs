//! Request types for the payroll engine API.
//!
//! This module defines the JSON request structures for each endpoint and
//! their conversion into domain types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::BatchEntry;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AttendanceRecord, AttendanceStatus, ElectedAllowances, Employee, EmploymentStatus,
    LeaveBalance, parse_clock_time,
};

/// Request body for the `/payroll` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollRequest {
    /// The employee snapshot.
    pub employee: EmployeeRequest,
    /// The month to run, as `YYYY-MM`.
    pub pay_period: String,
    /// Tax year of the rates to use; defaults to the pay period's year.
    #[serde(default)]
    pub tax_year: Option<i32>,
    /// Allowances elected for the month.
    #[serde(default)]
    pub allowances: ElectedAllowances,
    /// Attendance records for the month.
    #[serde(default)]
    pub attendance: Vec<AttendanceRecordRequest>,
}

impl PayrollRequest {
    /// Attendance records attributed to the request's employee.
    pub fn attendance_records(&self) -> Vec<AttendanceRecord> {
        self.attendance
            .iter()
            .map(|r| r.to_record(&self.employee.id))
            .collect()
    }
}

/// Request body for the `/payroll/batch` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchPayrollRequest {
    /// The month to run, as `YYYY-MM`.
    pub pay_period: String,
    /// Tax year of the rates to use; defaults to the pay period's year.
    #[serde(default)]
    pub tax_year: Option<i32>,
    /// Employees to run, each with their elected allowances.
    pub employees: Vec<BatchEmployeeRequest>,
    /// Attendance records for all employees; each must name its employee.
    #[serde(default)]
    pub attendance: Vec<AttendanceRecordRequest>,
}

impl BatchPayrollRequest {
    /// Converts the batch's attendance records.
    ///
    /// Fails with [`EngineError::InvalidEmployee`] on the first record that
    /// names no employee, since it cannot be attributed.
    pub fn attendance_records(&self) -> EngineResult<Vec<AttendanceRecord>> {
        self.attendance
            .iter()
            .enumerate()
            .map(|(i, r)| match r.employee_id.as_deref().map(str::trim) {
                Some(id) if !id.is_empty() => Ok(r.to_record(id)),
                _ => Err(EngineError::InvalidEmployee {
                    field: format!("attendance[{}].employee_id", i),
                    message: "batch attendance records must name an employee".to_string(),
                }),
            })
            .collect()
    }
}

/// One employee in a batch request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchEmployeeRequest {
    /// The employee snapshot.
    pub employee: EmployeeRequest,
    /// Allowances elected for the month.
    #[serde(default)]
    pub allowances: ElectedAllowances,
}

impl From<BatchEmployeeRequest> for BatchEntry {
    fn from(req: BatchEmployeeRequest) -> Self {
        BatchEntry {
            employee: req.employee.into(),
            allowances: req.allowances,
        }
    }
}

fn default_family_count() -> u32 {
    1
}

/// Employee information in a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeRequest {
    /// Unique identifier for the employee.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Monthly base salary.
    pub base_salary: Decimal,
    /// Household size including the employee.
    #[serde(default = "default_family_count")]
    pub family_count: u32,
    /// The date the employee was hired.
    pub hire_date: NaiveDate,
    /// Employment status.
    #[serde(default)]
    pub status: EmploymentStatus,
    /// Stored annual leave counters.
    #[serde(default)]
    pub leave: LeaveBalance,
}

impl From<EmployeeRequest> for Employee {
    fn from(req: EmployeeRequest) -> Self {
        Employee {
            id: req.id,
            name: req.name,
            base_salary: req.base_salary,
            family_count: req.family_count,
            hire_date: req.hire_date,
            status: req.status,
            leave: req.leave,
        }
    }
}

/// An attendance record in a request.
///
/// Clock times are taken as strings (`HH:MM` or `HH:MM:SS`). A time that
/// does not parse is treated as absent, so the record is skipped with a
/// warning rather than failing the request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceRecordRequest {
    /// The employee; defaults to the request's employee.
    #[serde(default)]
    pub employee_id: Option<String>,
    /// Day the record covers.
    pub date: NaiveDate,
    /// Clock-in time.
    #[serde(default)]
    pub clock_in: Option<String>,
    /// Clock-out time.
    #[serde(default)]
    pub clock_out: Option<String>,
    /// Hours worked as recorded by the HR system.
    #[serde(default)]
    pub actual_hours: Option<Decimal>,
    /// Attendance status.
    pub status: AttendanceStatus,
}

impl AttendanceRecordRequest {
    /// Converts to a domain record, attributing it to `default_employee_id`
    /// when the record names no employee.
    pub fn to_record(&self, default_employee_id: &str) -> AttendanceRecord {
        AttendanceRecord {
            employee_id: self
                .employee_id
                .clone()
                .unwrap_or_else(|| default_employee_id.to_string()),
            date: self.date,
            clock_in: self.clock_in.as_deref().and_then(parse_clock_time),
            clock_out: self.clock_out.as_deref().and_then(parse_clock_time),
            actual_hours: self.actual_hours,
            status: self.status,
        }
    }
}

/// Request body for the `/annual-leave` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnualLeaveRequest {
    /// The date the employee was hired.
    pub hire_date: NaiveDate,
    /// Date to evaluate on; defaults to today.
    #[serde(default)]
    pub evaluation_date: Option<NaiveDate>,
    /// Stored counters to refresh with the new entitlement.
    #[serde(default)]
    pub leave: Option<LeaveBalance>,
}

/// Request body for the `/severance` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeveranceRequest {
    /// The date the employee was hired.
    pub hire_date: NaiveDate,
    /// Last day of employment.
    pub termination_date: NaiveDate,
    /// Recent monthly salaries, most recent first.
    #[serde(default)]
    pub recent_salaries: Vec<Decimal>,
    /// Base salary used for every month when no recent salaries are given.
    #[serde(default)]
    pub current_base_salary: Option<Decimal>,
}
