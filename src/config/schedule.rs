//! Progressive (tiered marginal-rate) schedules.
//!
//! Both the salary income deduction and the income tax itself are expressed
//! as an ordered list of `(upper_bound, marginal_rate)` tiers. The same
//! [`ProgressiveSchedule`] type evaluates either one.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One tier of a progressive schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bracket {
    /// Inclusive upper bound of the tier; `None` for the final, unbounded tier.
    pub upper_bound: Option<Decimal>,
    /// Marginal rate applied to the part of the amount inside this tier.
    pub rate: Decimal,
}

/// An ordered set of brackets covering `[0, ∞)`.
///
/// # Example
///
/// ```
/// use payroll_engine::config::{Bracket, ProgressiveSchedule};
/// use rust_decimal::Decimal;
///
/// let schedule = ProgressiveSchedule::new(vec![
///     Bracket { upper_bound: Some(Decimal::new(1000, 0)), rate: Decimal::new(10, 2) },
///     Bracket { upper_bound: None, rate: Decimal::new(20, 2) },
/// ]);
///
/// // 1000 * 10% + 500 * 20%
/// assert_eq!(schedule.apply(Decimal::new(1500, 0)), Decimal::new(200, 0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgressiveSchedule {
    brackets: Vec<Bracket>,
}

impl ProgressiveSchedule {
    /// Wraps an ordered list of brackets. Call [`validate`](Self::validate)
    /// before relying on the result.
    pub fn new(brackets: Vec<Bracket>) -> Self {
        Self { brackets }
    }

    /// Returns the brackets in order.
    pub fn brackets(&self) -> &[Bracket] {
        &self.brackets
    }

    /// Checks the schedule shape.
    ///
    /// Upper bounds must be positive and strictly increasing, only the last
    /// bracket may be unbounded and it must be, and every rate must lie in
    /// `[0, 1]`. Returns a description of the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        if self.brackets.is_empty() {
            return Err("schedule has no brackets".to_string());
        }

        let last = self.brackets.len() - 1;
        let mut previous = Decimal::ZERO;

        for (index, bracket) in self.brackets.iter().enumerate() {
            if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
                return Err(format!(
                    "bracket {} rate {} is outside [0, 1]",
                    index + 1,
                    bracket.rate
                ));
            }

            match bracket.upper_bound {
                Some(bound) if index == last => {
                    return Err(format!(
                        "last bracket must be unbounded, found upper bound {}",
                        bound
                    ));
                }
                Some(bound) if bound <= previous => {
                    return Err(format!(
                        "bracket {} upper bound {} does not exceed {}",
                        index + 1,
                        bound,
                        previous
                    ));
                }
                Some(bound) => previous = bound,
                None if index != last => {
                    return Err(format!(
                        "bracket {} is unbounded but is not the last bracket",
                        index + 1
                    ));
                }
                None => {}
            }
        }

        Ok(())
    }

    /// Applies the schedule to `amount`.
    ///
    /// Walks the tiers accumulating `(min(amount, upper) - previous) * rate`
    /// and stops once the amount is covered. Amounts at or below zero yield
    /// zero. The result is exact; callers truncate where required.
    pub fn apply(&self, amount: Decimal) -> Decimal {
        let mut total = Decimal::ZERO;
        let mut previous = Decimal::ZERO;

        if amount <= Decimal::ZERO {
            return total;
        }

        for bracket in &self.brackets {
            let ceiling = match bracket.upper_bound {
                Some(bound) => amount.min(bound),
                None => amount,
            };

            if ceiling > previous {
                total += (ceiling - previous) * bracket.rate;
            }

            match bracket.upper_bound {
                Some(bound) if amount > bound => previous = bound,
                _ => break,
            }
        }

        total
    }

    /// Returns the marginal rate that applies to the next unit above `amount`.
    pub fn marginal_rate(&self, amount: Decimal) -> Decimal {
        self.brackets
            .iter()
            .find(|b| b.upper_bound.is_none_or(|bound| amount < bound))
            .map(|b| b.rate)
            .unwrap_or(Decimal::ZERO)
    }
}
