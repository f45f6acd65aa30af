use anyhow::{Context, Result};
use num_format::{Locale, ToFormattedString};
use rust_decimal::prelude::*;
use std::fmt;

/// Rounding applied wherever a currency value is cut to a fixed number of places.
/// Set once here and never changed at runtime.
pub const ROUNDING: RoundingStrategy = RoundingStrategy::MidpointAwayFromZero;

/// An exact currency amount. No arithmetic on it ever passes through a float.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Money(pub Decimal);

impl Money {
    /// Percent of `goal` reached, rounded down, with no fractional part.
    ///
    /// Multiplies before dividing so the only rounding is the final floor.
    pub fn percentage_of(&self, goal: &Money) -> Result<String> {
        if goal.0.is_zero() {
            anyhow::bail!("Cannot compute percentage of a zero goal");
        }
        let percent = self
            .0
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|scaled| scaled.checked_div(goal.0))
            .with_context(|| format!("Percentage of {} over {} overflowed", self.0, goal.0))?;
        Ok(percent.floor().to_string())
    }

    /// Whole thousands, floored and grouped: `1534230.50` becomes `$1,534k`.
    pub fn thousands(&self) -> Result<String> {
        let thousands = (self.0 / Decimal::ONE_THOUSAND).floor();
        let whole = thousands
            .to_i128()
            .with_context(|| format!("Failed to convert {} to whole thousands", self.0))?;
        Ok(format!("${}k", whole.to_formatted_string(&Locale::en)))
    }

    /// Fixed two decimal places, rounded half up.
    pub fn fixed2(&self) -> String {
        let mut rounded = self.0.round_dp_with_strategy(2, ROUNDING);
        rounded.rescale(2);
        rounded.to_string()
    }
}

impl From<Decimal> for Money {
    fn from(d: Decimal) -> Self {
        Self(d)
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(Money)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_sign_negative() {
            write!(f, "(${})", self.0.abs())
        } else {
            write!(f, "${}", self.0)
        }
    }
}
