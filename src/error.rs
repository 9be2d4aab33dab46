//! Error types for the payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure the engine reports to its callers. Degenerate inputs
//! (zero salary, missing attendance times, impossible workday counts) are not
//! errors: they are handled inside the calculators and surface as zero
//! results or audit warnings instead.

use thiserror::Error;

/// The main error type for the payroll engine.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::InvalidPayPeriod {
///     value: "2025/01".to_string(),
///     message: "expected YYYY-MM".to_string(),
/// };
/// assert_eq!(error.to_string(), "Invalid pay period '2025/01': expected YYYY-MM");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file or directory was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// No rate table is effective for the requested tax year.
    #[error("No rate table effective for tax year {tax_year}")]
    RateTableNotFound {
        /// The requested tax year.
        tax_year: i32,
    },

    /// A rate table failed validation.
    #[error("Invalid rate table for tax year {tax_year}: {message}")]
    InvalidRateTable {
        /// The tax year of the offending table.
        tax_year: i32,
        /// What made the table invalid.
        message: String,
    },

    /// A pay period string was not a valid `YYYY-MM` month.
    #[error("Invalid pay period '{value}': {message}")]
    InvalidPayPeriod {
        /// The rejected input.
        value: String,
        /// Why it was rejected.
        message: String,
    },

    /// An employee record was invalid or contained inconsistent data.
    #[error("Invalid employee field '{field}': {message}")]
    InvalidEmployee {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// An elected allowance amount was invalid.
    #[error("Invalid allowance '{kind}': {message}")]
    InvalidAllowance {
        /// The allowance kind.
        kind: String,
        /// A description of what made the amount invalid.
        message: String,
    },

    /// Severance inputs were unusable.
    #[error("Invalid severance input: {message}")]
    InvalidSeveranceInput {
        /// What was wrong with the input.
        message: String,
    },

    /// The attendance collaborator failed to return records.
    #[error("Attendance lookup failed for employee '{employee_id}': {message}")]
    AttendanceLookup {
        /// The employee whose records were requested.
        employee_id: String,
        /// The collaborator's failure description.
        message: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

impl EngineError {
    /// A stable code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => {
                "CONFIG_ERROR"
            }
            EngineError::RateTableNotFound { .. } => "RATE_TABLE_NOT_FOUND",
            EngineError::InvalidRateTable { .. } => "INVALID_RATE_TABLE",
            EngineError::InvalidPayPeriod { .. } => "INVALID_PAY_PERIOD",
            EngineError::InvalidEmployee { .. } => "INVALID_EMPLOYEE",
            EngineError::InvalidAllowance { .. } => "INVALID_ALLOWANCE",
            EngineError::InvalidSeveranceInput { .. } => "INVALID_SEVERANCE_INPUT",
            EngineError::AttendanceLookup { .. } => "ATTENDANCE_LOOKUP_FAILED",
            EngineError::CalculationError { .. } => "CALCULATION_ERROR",
        }
    }

    /// Returns true if the error was caused by the caller's input rather
    /// than by configuration or a collaborator.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            EngineError::RateTableNotFound { .. }
                | EngineError::InvalidPayPeriod { .. }
                | EngineError::InvalidEmployee { .. }
                | EngineError::InvalidAllowance { .. }
                | EngineError::InvalidSeveranceInput { .. }
        )
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
