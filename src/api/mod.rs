//! HTTP API module for the payroll engine.
//!
//! This module provides the REST API endpoints for monthly payroll, batch
//! payroll runs, annual leave entitlement and severance pay.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    AnnualLeaveRequest, AttendanceRecordRequest, BatchEmployeeRequest, BatchPayrollRequest,
    EmployeeRequest, PayrollRequest, SeveranceRequest,
};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
