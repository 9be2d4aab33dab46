//! Allowance models.
//!
//! An employee elects a set of monthly allowances on top of the base salary.
//! [`ElectedAllowances`] holds what the caller specified;
//! [`ElectedAllowances::resolve`] fills in the defaults and produces the
//! [`Allowances`] that feed gross pay.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::employee::MAX_MONTHLY_AMOUNT;

/// The fixed set of allowance kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllowanceKind {
    /// Performance bonus.
    PerformanceBonus,
    /// Meal allowance.
    Meal,
    /// Position allowance.
    Position,
    /// Overtime allowance.
    Overtime,
    /// Skill allowance.
    Skill,
    /// Perfect-attendance allowance.
    Attendance,
    /// Holiday work allowance.
    Holiday,
    /// Special duty allowance.
    SpecialDuty,
    /// Payout for unused annual leave.
    AnnualLeave,
    /// Anything else.
    Other,
}

impl AllowanceKind {
    /// Every kind, in payslip order.
    pub const ALL: [AllowanceKind; 10] = [
        AllowanceKind::PerformanceBonus,
        AllowanceKind::Meal,
        AllowanceKind::Position,
        AllowanceKind::Overtime,
        AllowanceKind::Skill,
        AllowanceKind::Attendance,
        AllowanceKind::Holiday,
        AllowanceKind::SpecialDuty,
        AllowanceKind::AnnualLeave,
        AllowanceKind::Other,
    ];

    /// The snake_case name used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PerformanceBonus => "performance_bonus",
            Self::Meal => "meal",
            Self::Position => "position",
            Self::Overtime => "overtime",
            Self::Skill => "skill",
            Self::Attendance => "attendance",
            Self::Holiday => "holiday",
            Self::SpecialDuty => "special_duty",
            Self::AnnualLeave => "annual_leave",
            Self::Other => "other",
        }
    }
}

/// Allowances as elected by the caller. `None` means "not specified".
///
/// # Example
///
/// ```
/// use payroll_engine::models::ElectedAllowances;
/// use rust_decimal::Decimal;
///
/// let elected = ElectedAllowances {
///     position: Some(Decimal::new(150_000, 0)),
///     ..Default::default()
/// };
///
/// let resolved = elected.resolve(Decimal::new(200_000, 0)).unwrap();
/// assert_eq!(resolved.meal, Decimal::new(200_000, 0));
/// assert_eq!(resolved.total(), Decimal::new(350_000, 0));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElectedAllowances {
    /// Performance bonus.
    pub performance_bonus: Option<Decimal>,
    /// Meal allowance.
    pub meal: Option<Decimal>,
    /// Position allowance.
    pub position: Option<Decimal>,
    /// Overtime allowance.
    pub overtime: Option<Decimal>,
    /// Skill allowance.
    pub skill: Option<Decimal>,
    /// Perfect-attendance allowance.
    pub attendance: Option<Decimal>,
    /// Holiday work allowance.
    pub holiday: Option<Decimal>,
    /// Special duty allowance.
    pub special_duty: Option<Decimal>,
    /// Unused annual leave payout.
    pub annual_leave: Option<Decimal>,
    /// Other allowances.
    pub other: Option<Decimal>,
}

impl ElectedAllowances {
    /// Elects no allowance at all, not even the meal baseline.
    pub fn none() -> Self {
        Self {
            meal: Some(Decimal::ZERO),
            ..Default::default()
        }
    }

    /// Returns the elected amount for `kind`.
    pub fn get(&self, kind: AllowanceKind) -> Option<Decimal> {
        match kind {
            AllowanceKind::PerformanceBonus => self.performance_bonus,
            AllowanceKind::Meal => self.meal,
            AllowanceKind::Position => self.position,
            AllowanceKind::Overtime => self.overtime,
            AllowanceKind::Skill => self.skill,
            AllowanceKind::Attendance => self.attendance,
            AllowanceKind::Holiday => self.holiday,
            AllowanceKind::SpecialDuty => self.special_duty,
            AllowanceKind::AnnualLeave => self.annual_leave,
            AllowanceKind::Other => self.other,
        }
    }

    /// Resolves the election into concrete amounts.
    ///
    /// Unspecified kinds become zero, except meal which becomes
    /// `meal_baseline`. Fails with [`EngineError::InvalidAllowance`] on the
    /// first amount that is negative or above [`MAX_MONTHLY_AMOUNT`].
    pub fn resolve(&self, meal_baseline: Decimal) -> EngineResult<Allowances> {
        for kind in AllowanceKind::ALL {
            let Some(amount) = self.get(kind) else {
                continue;
            };
            if amount < Decimal::ZERO {
                return Err(EngineError::InvalidAllowance {
                    kind: kind.as_str().to_string(),
                    message: format!("amount {} is negative", amount),
                });
            }
            if amount > MAX_MONTHLY_AMOUNT {
                return Err(EngineError::InvalidAllowance {
                    kind: kind.as_str().to_string(),
                    message: format!("amount {} exceeds {}", amount, MAX_MONTHLY_AMOUNT),
                });
            }
        }

        let or_zero = |value: Option<Decimal>| value.unwrap_or(Decimal::ZERO);

        Ok(Allowances {
            performance_bonus: or_zero(self.performance_bonus),
            meal: self.meal.unwrap_or(meal_baseline),
            position: or_zero(self.position),
            overtime: or_zero(self.overtime),
            skill: or_zero(self.skill),
            attendance: or_zero(self.attendance),
            holiday: or_zero(self.holiday),
            special_duty: or_zero(self.special_duty),
            annual_leave: or_zero(self.annual_leave),
            other: or_zero(self.other),
        })
    }
}

/// Resolved allowance amounts, one per kind.
///
/// Serialized with an `_allowance` suffix so the fields can sit flat inside
/// a payroll record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allowances {
    /// Performance bonus.
    pub performance_bonus: Decimal,
    /// Meal allowance.
    #[serde(rename = "meal_allowance")]
    pub meal: Decimal,
    /// Position allowance.
    #[serde(rename = "position_allowance")]
    pub position: Decimal,
    /// Overtime allowance.
    #[serde(rename = "overtime_allowance")]
    pub overtime: Decimal,
    /// Skill allowance.
    #[serde(rename = "skill_allowance")]
    pub skill: Decimal,
    /// Perfect-attendance allowance.
    #[serde(rename = "attendance_allowance")]
    pub attendance: Decimal,
    /// Holiday work allowance.
    #[serde(rename = "holiday_allowance")]
    pub holiday: Decimal,
    /// Special duty allowance.
    #[serde(rename = "special_duty_allowance")]
    pub special_duty: Decimal,
    /// Unused annual leave payout.
    #[serde(rename = "annual_leave_allowance")]
    pub annual_leave: Decimal,
    /// Other allowances.
    #[serde(rename = "other_allowance")]
    pub other: Decimal,
}

impl Allowances {
    /// Returns the amount for `kind`.
    pub fn get(&self, kind: AllowanceKind) -> Decimal {
        match kind {
            AllowanceKind::PerformanceBonus => self.performance_bonus,
            AllowanceKind::Meal => self.meal,
            AllowanceKind::Position => self.position,
            AllowanceKind::Overtime => self.overtime,
            AllowanceKind::Skill => self.skill,
            AllowanceKind::Attendance => self.attendance,
            AllowanceKind::Holiday => self.holiday,
            AllowanceKind::SpecialDuty => self.special_duty,
            AllowanceKind::AnnualLeave => self.annual_leave,
            AllowanceKind::Other => self.other,
        }
    }

    /// Iterates `(kind, amount)` pairs in payslip order.
    pub fn iter(&self) -> impl Iterator<Item = (AllowanceKind, Decimal)> + '_ {
        AllowanceKind::ALL.into_iter().map(|kind| (kind, self.get(kind)))
    }

    /// Sum of every allowance.
    pub fn total(&self) -> Decimal {
        self.iter().map(|(_, amount)| amount).sum()
    }
}
