//! Rate configuration for the payroll engine.
//!
//! Statutory rates change every tax year, so they live in versioned YAML
//! files rather than in code. Each file deserializes into an immutable
//! [`RateTable`] that is validated on load and handed to every calculator
//! at construction.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config").unwrap();
//! println!("Loaded tax years: {:?}", config.tax_years());
//! ```

mod loader;
mod schedule;
mod types;

pub use loader::ConfigLoader;
pub use schedule::{Bracket, ProgressiveSchedule};
pub use types::{AllowanceDefaults, IncomeTaxRates, InsuranceRates, PensionLimits, RateTable};

#[cfg(test)]
pub(crate) use types::test_rate_table;
