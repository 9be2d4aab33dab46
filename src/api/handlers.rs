//! HTTP request handlers for the payroll engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{
    AnnualLeaveResult, BatchEntry, BatchOutcome, BatchPayrollRunner, DEFAULT_SALARY_WINDOW,
    calculate_annual_leave, calculate_severance, trailing_base_salaries,
};
use crate::error::{EngineError, EngineResult};
use crate::models::{Employee, LeaveBalance, PayPeriod, PayrollResult};

use super::request::{AnnualLeaveRequest, BatchPayrollRequest, PayrollRequest, SeveranceRequest};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/payroll", post(payroll_handler))
        .route("/payroll/batch", post(batch_payroll_handler))
        .route("/annual-leave", post(annual_leave_handler))
        .route("/severance", post(severance_handler))
        .with_state(state)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

/// Maps a JSON extraction failure to a 400 response.
fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // Get the body text which contains the detailed error from serde
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            // Check if it's a missing field error
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };

    ApiErrorResponse::bad_request(error).into_response()
}

fn error_response(correlation_id: Uuid, err: EngineError) -> Response {
    warn!(
        correlation_id = %correlation_id,
        code = err.code(),
        error = %err,
        "Request failed"
    );
    ApiErrorResponse::from(err).into_response()
}

/// Handler for POST /payroll.
///
/// Runs one employee's payroll for one month and returns the full result
/// with its audit trace.
async fn payroll_handler(
    State(state): State<AppState>,
    payload: Result<Json<PayrollRequest>, JsonRejection>,
) -> Response {
    // Generate correlation ID for request tracking
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payroll request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let start_time = Instant::now();
    match run_payroll(&state, request) {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                employee_id = %result.figures.employee_id,
                pay_period = %result.figures.pay_period,
                net_pay = %result.figures.net_pay,
                duration_us = start_time.elapsed().as_micros(),
                "Payroll calculated"
            );
            json_response(StatusCode::OK, result)
        }
        Err(err) => error_response(correlation_id, err),
    }
}

fn run_payroll(state: &AppState, request: PayrollRequest) -> EngineResult<PayrollResult> {
    let period: PayPeriod = request.pay_period.parse()?;
    let assembler = state.assembler(request.tax_year.unwrap_or(period.year()))?;
    let records = request.attendance_records();
    let employee: Employee = request.employee.into();

    assembler.assemble(&employee, &period, &request.allowances, &records)
}

/// Handler for POST /payroll/batch.
///
/// The batch runs on the blocking pool.
async fn batch_payroll_handler(
    State(state): State<AppState>,
    payload: Result<Json<BatchPayrollRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing batch payroll request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let start_time = Instant::now();
    let outcome = tokio::task::spawn_blocking(move || -> EngineResult<BatchOutcome> {
        let period: PayPeriod = request.pay_period.parse()?;
        let assembler = state.assembler(request.tax_year.unwrap_or(period.year()))?;
        let runner = BatchPayrollRunner::new(assembler);
        let records = request.attendance_records()?;
        let entries: Vec<BatchEntry> = request.employees.into_iter().map(Into::into).collect();

        runner.run(&request.pay_period, &entries, Some(&records))
    })
    .await;

    match outcome {
        Ok(Ok(outcome)) => {
            info!(
                correlation_id = %correlation_id,
                pay_period = %outcome.pay_period,
                completed = outcome.results.len(),
                failed = outcome.failures.len(),
                skipped = outcome.skipped_inactive.len(),
                duration_us = start_time.elapsed().as_micros(),
                "Batch payroll calculated"
            );
            json_response(StatusCode::OK, outcome)
        }
        Ok(Err(err)) => error_response(correlation_id, err),
        Err(join_error) => error_response(
            correlation_id,
            EngineError::CalculationError {
                message: format!("batch task failed: {}", join_error),
            },
        ),
    }
}

/// Annual leave entitlement with optionally refreshed counters.
#[derive(Debug, Serialize)]
struct AnnualLeaveResponse {
    #[serde(flatten)]
    result: AnnualLeaveResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    leave: Option<LeaveBalance>,
}

/// Handler for POST /annual-leave.
///
/// Evaluates on today's date (UTC) when the request omits one.
async fn annual_leave_handler(
    payload: Result<Json<AnnualLeaveRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing annual leave request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let evaluation_date = request
        .evaluation_date
        .unwrap_or_else(|| Utc::now().date_naive());
    let result = calculate_annual_leave(request.hire_date, evaluation_date);
    let leave = request.leave.map(|balance| result.apply_to(balance));

    info!(
        correlation_id = %correlation_id,
        entitlement_days = result.entitlement_days,
        "Annual leave calculated"
    );
    json_response(StatusCode::OK, AnnualLeaveResponse { result, leave })
}

/// Handler for POST /severance.
async fn severance_handler(payload: Result<Json<SeveranceRequest>, JsonRejection>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing severance request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let salaries = match (request.recent_salaries.is_empty(), request.current_base_salary) {
        (true, Some(base)) => trailing_base_salaries(&[], base, DEFAULT_SALARY_WINDOW),
        _ => request.recent_salaries,
    };

    match calculate_severance(request.hire_date, request.termination_date, &salaries) {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                eligible = result.eligible,
                severance_pay = %result.severance_pay,
                "Severance calculated"
            );
            json_response(StatusCode::OK, result)
        }
        Err(err) => error_response(correlation_id, err),
    }
}
