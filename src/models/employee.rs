//! Employee model and related types.
//!
//! This module defines the [`Employee`] snapshot the engine reads, its
//! [`EmploymentStatus`], and the [`LeaveBalance`] counters.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Largest monthly amount, in whole currency units, the engine accepts for a
/// salary or an allowance: 10^15.
///
/// Amounts above this are rejected as input errors, which keeps every
/// intermediate product inside `Decimal` range.
pub const MAX_MONTHLY_AMOUNT: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0);

/// Represents where an employee is in the employment lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentStatus {
    /// Currently employed and on payroll.
    #[default]
    #[serde(alias = "재직")]
    Active,
    /// On an extended leave of absence.
    #[serde(alias = "휴직")]
    OnLeave,
    /// Employment has ended.
    #[serde(alias = "퇴직")]
    Terminated,
}

/// Annual leave counters as stored by the HR system.
///
/// The engine never mutates stored counters. The methods here return the
/// counters a caller should persist after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LeaveBalance {
    /// Days granted for the current entitlement period.
    #[serde(default)]
    pub total: u32,
    /// Days already taken.
    #[serde(default)]
    pub used: u32,
    /// Days still available.
    #[serde(default)]
    pub remaining: u32,
}

impl LeaveBalance {
    /// Returns the counters after granting a new entitlement.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::models::LeaveBalance;
    ///
    /// let balance = LeaveBalance { total: 15, used: 4, remaining: 11 };
    /// let refreshed = balance.with_entitlement(16);
    /// assert_eq!(refreshed, LeaveBalance { total: 16, used: 4, remaining: 12 });
    /// ```
    pub fn with_entitlement(self, total: u32) -> Self {
        Self {
            total,
            used: self.used,
            remaining: total.saturating_sub(self.used),
        }
    }

    /// Returns the counters after one annual-leave day, or `None` when no
    /// days remain.
    pub fn take_day(self) -> Option<Self> {
        if self.remaining == 0 {
            return None;
        }

        Some(Self {
            total: self.total,
            used: self.used + 1,
            remaining: self.remaining - 1,
        })
    }
}

fn default_family_count() -> u32 {
    1
}

/// Represents an employee snapshot supplied by the employee lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Monthly base salary in whole currency units.
    pub base_salary: Decimal,
    /// Household size including the employee.
    #[serde(default = "default_family_count")]
    pub family_count: u32,
    /// The date the employee was hired.
    pub hire_date: NaiveDate,
    /// Current employment status.
    #[serde(default)]
    pub status: EmploymentStatus,
    /// Annual leave counters.
    #[serde(default)]
    pub leave: LeaveBalance,
}

impl Employee {
    /// Returns true if the employee should be included in a payroll run.
    pub fn is_active(&self) -> bool {
        self.status == EmploymentStatus::Active
    }

    /// Returns the household size used for tax, treating zero as one.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::models::Employee;
    /// use chrono::NaiveDate;
    /// use rust_decimal::Decimal;
    ///
    /// let mut employee = Employee {
    ///     id: "emp_001".to_string(),
    ///     name: "Kim".to_string(),
    ///     base_salary: Decimal::new(3_000_000, 0),
    ///     family_count: 0,
    ///     hire_date: NaiveDate::from_ymd_opt(2020, 3, 2).unwrap(),
    ///     status: Default::default(),
    ///     leave: Default::default(),
    /// };
    /// assert_eq!(employee.household_count(), 1);
    ///
    /// employee.family_count = 3;
    /// assert_eq!(employee.household_count(), 3);
    /// ```
    pub fn household_count(&self) -> u32 {
        self.family_count.max(1)
    }
}
