//! Application state for the payroll engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::calculation::PayrollAssembler;
use crate::config::ConfigLoader;
use crate::error::EngineResult;

/// Shared application state.
///
/// Holds the rate tables loaded at startup. Tables are validated on load, so
/// building an assembler from one per request cannot fail on bad rates.
#[derive(Clone)]
pub struct AppState {
    /// The loaded rate tables.
    config: Arc<ConfigLoader>,
}

impl AppState {
    /// Creates a new application state with the given configuration loader.
    pub fn new(config: ConfigLoader) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Builds an assembler for `tax_year`.
    pub fn assembler(&self, tax_year: i32) -> EngineResult<PayrollAssembler> {
        PayrollAssembler::new(self.config.rate_table(tax_year)?)
    }
}
