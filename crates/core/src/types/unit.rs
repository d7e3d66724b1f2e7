//! Sale units and the quantity rules they imply.
//!
//! A product is sold either by discrete units (`each`) or by a fractional
//! measure (weight or volume). The unit decides whether a quantity must be
//! integral, what granularity it may have, and the step used by the +/-
//! controls on the POS screen.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Unit a product is sold in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SaleUnit {
    /// Discrete units; quantities are positive integers.
    #[default]
    Each,
    Kilogram,
    Gram,
    Liter,
    Milliliter,
}

impl SaleUnit {
    /// Whether quantities in this unit may be fractional.
    #[must_use]
    pub const fn is_fractional(self) -> bool {
        !matches!(self, Self::Each)
    }

    /// Increment applied by the +/- quantity controls.
    ///
    /// `1` for discrete units, `0.1` for fractional ones.
    #[must_use]
    pub fn step(self) -> Decimal {
        if self.is_fractional() {
            Decimal::new(1, 1)
        } else {
            Decimal::ONE
        }
    }

    /// Smallest quantity a line may hold before it becomes a removal.
    ///
    /// `1` for discrete units, `0.001` for fractional ones.
    #[must_use]
    pub fn minimum(self) -> Decimal {
        if self.is_fractional() {
            Decimal::new(1, 3)
        } else {
            Decimal::ONE
        }
    }

    /// Number of decimal places a quantity is carried with.
    #[must_use]
    pub const fn precision(self) -> u32 {
        if self.is_fractional() { 3 } else { 0 }
    }

    /// Round a quantity to this unit's granularity (3 decimals for
    /// fractional units, unchanged for discrete ones).
    #[must_use]
    pub fn quantize(self, quantity: Decimal) -> Decimal {
        if self.is_fractional() {
            quantity.round_dp(3)
        } else {
            quantity
        }
    }

    /// Whether a quantity is positive and meets this unit's granularity.
    #[must_use]
    pub fn valid_quantity(self, quantity: Decimal) -> bool {
        if quantity <= Decimal::ZERO {
            return false;
        }
        if self.is_fractional() {
            quantity == quantity.round_dp(3)
        } else {
            quantity.fract().is_zero()
        }
    }

    /// Human-readable unit label for cart rows and alerts.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Each => "unit(s)",
            Self::Kilogram => "kilo(s)",
            Self::Gram => "gram(s)",
            Self::Liter => "liter(s)",
            Self::Milliliter => "milliliter(s)",
        }
    }
}

impl fmt::Display for SaleUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Each => "each",
            Self::Kilogram => "kilogram",
            Self::Gram => "gram",
            Self::Liter => "liter",
            Self::Milliliter => "milliliter",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_each_step_and_minimum() {
        assert_eq!(SaleUnit::Each.step(), dec("1"));
        assert_eq!(SaleUnit::Each.minimum(), dec("1"));
        assert_eq!(SaleUnit::Each.precision(), 0);
        assert!(!SaleUnit::Each.is_fractional());
    }

    #[test]
    fn test_fractional_step_and_minimum() {
        for unit in [
            SaleUnit::Kilogram,
            SaleUnit::Gram,
            SaleUnit::Liter,
            SaleUnit::Milliliter,
        ] {
            assert_eq!(unit.step(), dec("0.1"));
            assert_eq!(unit.minimum(), dec("0.001"));
            assert_eq!(unit.precision(), 3);
            assert!(unit.is_fractional());
        }
    }

    #[test]
    fn test_valid_quantity_each_requires_integers() {
        assert!(SaleUnit::Each.valid_quantity(dec("1")));
        assert!(SaleUnit::Each.valid_quantity(dec("12")));
        assert!(!SaleUnit::Each.valid_quantity(dec("1.5")));
        assert!(!SaleUnit::Each.valid_quantity(dec("0")));
        assert!(!SaleUnit::Each.valid_quantity(dec("-2")));
    }

    #[test]
    fn test_valid_quantity_fractional_allows_three_decimals() {
        assert!(SaleUnit::Kilogram.valid_quantity(dec("0.75")));
        assert!(SaleUnit::Kilogram.valid_quantity(dec("2.255")));
        assert!(!SaleUnit::Kilogram.valid_quantity(dec("0.0005")));
        assert!(!SaleUnit::Kilogram.valid_quantity(dec("0")));
    }

    #[test]
    fn test_quantize_rounds_fractional_units() {
        assert_eq!(SaleUnit::Liter.quantize(dec("1.23456")), dec("1.235"));
        assert_eq!(SaleUnit::Each.quantize(dec("3")), dec("3"));
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(
            serde_json::to_string(&SaleUnit::Kilogram).unwrap(),
            "\"kilogram\""
        );
        let unit: SaleUnit = serde_json::from_str("\"each\"").unwrap();
        assert_eq!(unit, SaleUnit::Each);
    }
}
