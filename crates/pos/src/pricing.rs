//! Pricing arithmetic.
//!
//! Pure functions over the cart: no rounding happens here. Prices are
//! tax-inclusive, so the pre-tax total is derived by dividing the inclusive
//! total by `1 + TAX_RATE`; the two derived figures always satisfy
//! `total_excl + tax == total_incl` up to `Decimal` precision. All rounding
//! is presentation-only and lives in the view layer.

use rust_decimal::Decimal;

use crate::cart::{Cart, LineItem};

/// Value-added tax rate baked into every catalog price (19%).
pub const TAX_RATE: Decimal = Decimal::from_parts(19, 0, 0, false, 2);

/// Unit price after applying the line's discount percentage.
#[must_use]
pub fn effective_unit_price(line: &LineItem) -> Decimal {
    line.unit_price * (Decimal::ONE - line.discount_percent / Decimal::ONE_HUNDRED)
}

/// Discounted unit price times quantity, tax-inclusive.
#[must_use]
pub fn line_subtotal(line: &LineItem) -> Decimal {
    effective_unit_price(line) * line.quantity
}

/// Cart-level totals, all derived from the tax-inclusive sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    /// Sum of line subtotals, tax included.
    pub total_incl: Decimal,
    /// The inclusive total with tax backed out.
    pub total_excl: Decimal,
    /// Tax portion of the inclusive total.
    pub tax: Decimal,
}

impl Totals {
    /// Compute totals for a cart. An empty cart yields all zeros.
    #[must_use]
    pub fn of(cart: &Cart) -> Self {
        let total_incl: Decimal = cart.lines().iter().map(line_subtotal).sum();
        let total_excl = total_incl / (Decimal::ONE + TAX_RATE);
        Self {
            total_incl,
            total_excl,
            tax: total_excl * TAX_RATE,
        }
    }
}

/// Change owed to the customer for a given tendered amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeDue {
    /// Change to hand back, clamped to zero when payment falls short.
    pub amount: Decimal,
    /// Whether the tendered amount fails to cover the total.
    pub insufficient: bool,
}

impl ChangeDue {
    /// Compare a tendered amount against the inclusive total.
    #[must_use]
    pub fn compute(total_incl: Decimal, tendered: Decimal) -> Self {
        let insufficient = tendered < total_incl;
        let amount = if insufficient {
            Decimal::ZERO
        } else {
            tendered - total_incl
        };
        Self {
            amount,
            insufficient,
        }
    }
}
