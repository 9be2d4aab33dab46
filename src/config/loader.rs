//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the versioned
//! rate tables from YAML files.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{EngineError, EngineResult};

use super::types::RateTable;

/// Loads and provides access to the rate tables.
///
/// # Directory Structure
///
/// ```text
/// config/
/// └── rates/
///     ├── 2024.yaml   # one immutable table per tax year
///     └── 2025.yaml
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config")?;
/// let table = loader.rate_table(2025)?;
/// println!("Pension rate: {}", table.insurance.national_pension);
/// # Ok::<(), payroll_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Validated tables sorted by tax year, oldest first.
    tables: Vec<RateTable>,
}

impl ConfigLoader {
    /// Loads every rate table from `<path>/rates/*.yaml`.
    ///
    /// Fails if the directory is missing, holds no tables, any file is not
    /// valid YAML, any table fails validation, or two files declare the
    /// same tax year.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let rates_dir = path.as_ref().join("rates");
        let tables = Self::load_rates(&rates_dir)?;
        let loader = Self::from_tables(tables)?;

        info!(
            path = %rates_dir.display(),
            tax_years = ?loader.tax_years(),
            "Loaded rate tables"
        );

        Ok(loader)
    }

    /// Builds a loader from tables constructed in code.
    pub fn from_tables(mut tables: Vec<RateTable>) -> EngineResult<Self> {
        if tables.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: "(no rate tables supplied)".to_string(),
            });
        }

        for table in &tables {
            table.validate()?;
        }
        tables.sort_by_key(|t| t.tax_year);

        if let Some(pair) = tables.windows(2).find(|w| w[0].tax_year == w[1].tax_year) {
            return Err(EngineError::InvalidRateTable {
                tax_year: pair[0].tax_year,
                message: "more than one table declares this tax year".to_string(),
            });
        }

        Ok(Self { tables })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads all rate files from the rates directory.
    fn load_rates(rates_dir: &Path) -> EngineResult<Vec<RateTable>> {
        let rates_dir_str = rates_dir.display().to_string();

        let entries = fs::read_dir(rates_dir).map_err(|_| EngineError::ConfigNotFound {
            path: rates_dir_str.clone(),
        })?;

        let mut tables = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: rates_dir_str.clone(),
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml" || ext == "yml") {
                let table = Self::load_yaml::<RateTable>(&path)?;
                debug!(path = %path.display(), tax_year = table.tax_year, "Parsed rate table");
                tables.push(table);
            }
        }

        if tables.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no rate files found)", rates_dir_str),
            });
        }

        Ok(tables)
    }

    /// Returns the table effective for `tax_year`.
    ///
    /// That is the most recent table whose tax year is not after the
    /// requested one, so a year without its own file keeps using the last
    /// published rates.
    pub fn rate_table(&self, tax_year: i32) -> EngineResult<&RateTable> {
        self.tables
            .iter()
            .rfind(|t| t.tax_year <= tax_year)
            .ok_or(EngineError::RateTableNotFound { tax_year })
    }

    /// Returns all loaded tax years, oldest first.
    pub fn tax_years(&self) -> Vec<i32> {
        self.tables.iter().map(|t| t.tax_year).collect()
    }

    /// Returns all tables, oldest first.
    pub fn tables(&self) -> &[RateTable] {
        &self.tables
    }
}
