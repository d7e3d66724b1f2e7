//! Monetary amounts with whole-peso presentation.
//!
//! Caja prices are tax-inclusive Chilean pesos. Internal arithmetic keeps
//! full decimal precision; rounding to whole pesos and thousands grouping
//! happen only when an amount is displayed.

use std::fmt;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A monetary amount in pesos.
///
/// Wraps an unrounded [`Decimal`]; `Display` renders the nearest whole peso
/// with `.` as the thousands separator (e.g. `1680.67` -> `"1.681"`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Zero pesos.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Get the underlying unrounded amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Round to the nearest whole peso, halves away from zero.
    #[must_use]
    pub fn rounded(&self) -> i64 {
        self.0
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .unwrap_or(i64::MAX)
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pesos = self.rounded();
        if pesos < 0 {
            write!(f, "-{}", group_thousands(pesos.unsigned_abs()))
        } else {
            write!(f, "{}", group_thousands(pesos.unsigned_abs()))
        }
    }
}

/// Group a digit string with `.` every three digits from the right.
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    let offset = digits.len() % 3;
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (i + 3 - offset) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    grouped
}
