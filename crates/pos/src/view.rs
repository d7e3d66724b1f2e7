//! The rendering bridge.
//!
//! Pure projections of the cart into serializable view-models. This is the
//! only read surface the POS screen sees: money lands here already rounded
//! and grouped for display, quantities are formatted per sale unit, and the
//! step/minimum metadata the quantity controls need rides along with each
//! line. Nothing in this module mutates the cart.

use rust_decimal::Decimal;
use serde::Serialize;

use caja_core::{Money, SaleUnit};

use crate::cart::{Cart, LineItem, SaleChannel};
use crate::pricing::{self, ChangeDue, Totals};

/// Format a quantity for display: bare integer for discrete units, three
/// decimals for weighed/measured ones.
fn format_quantity(quantity: Decimal, unit: SaleUnit) -> String {
    if unit.is_fractional() {
        format!("{:.3}", quantity.round_dp(3))
    } else {
        quantity.to_string()
    }
}

/// Step metadata for a line's +/- controls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuantityControlView {
    /// Amount one press of +/- changes the quantity by.
    pub step: Decimal,
    /// Smallest quantity the line may hold before removal is offered.
    pub minimum: Decimal,
    /// Decimal places the quantity input accepts.
    pub precision: u32,
}

/// One cart line, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineView {
    pub product_id: i32,
    pub name: String,
    pub quantity: String,
    pub unit_label: String,
    pub unit_price: String,
    /// Unit price with the line discount applied.
    pub effective_unit_price: String,
    pub subtotal: String,
    pub discount_percent: Decimal,
    pub available_stock: Decimal,
    pub controls: QuantityControlView,
}

impl From<&LineItem> for LineView {
    fn from(line: &LineItem) -> Self {
        let unit = line.sale_unit;
        Self {
            product_id: line.product_id.as_i32(),
            name: line.name.clone(),
            quantity: format_quantity(line.quantity, unit),
            unit_label: unit.label().to_string(),
            unit_price: Money::new(line.unit_price).to_string(),
            effective_unit_price: Money::new(pricing::effective_unit_price(line)).to_string(),
            subtotal: Money::new(pricing::line_subtotal(line)).to_string(),
            discount_percent: line.discount_percent,
            available_stock: line.available_stock,
            controls: QuantityControlView {
                step: unit.step(),
                minimum: unit.minimum(),
                precision: unit.precision(),
            },
        }
    }
}

/// Totals block at the foot of the cart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryView {
    pub total: String,
    pub total_excl_tax: String,
    pub tax: String,
    /// Sum of all line quantities, for the header badge.
    pub item_count: Decimal,
}

/// The whole cart as the POS screen renders it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartView {
    pub lines: Vec<LineView>,
    pub summary: SummaryView,
    pub sale_channel: SaleChannel,
    pub is_empty: bool,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        let totals = Totals::of(cart);
        Self {
            lines: cart.lines().iter().map(LineView::from).collect(),
            summary: SummaryView {
                total: Money::new(totals.total_incl).to_string(),
                total_excl_tax: Money::new(totals.total_excl).to_string(),
                tax: Money::new(totals.tax).to_string(),
                item_count: cart.item_count(),
            },
            sale_channel: cart.sale_channel(),
            is_empty: cart.is_empty(),
        }
    }
}

/// Payment preview shown in the checkout dialog before submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckoutPreview {
    pub total: String,
    pub amount_tendered: String,
    pub change_due: String,
    pub insufficient: bool,
}

impl CheckoutPreview {
    /// Preview change for a tendered amount against the cart total.
    #[must_use]
    pub fn compute(cart: &Cart, tendered: Decimal) -> Self {
        let totals = Totals::of(cart);
        let change = ChangeDue::compute(totals.total_incl, tendered);
        Self {
            total: Money::new(totals.total_incl).to_string(),
            amount_tendered: Money::new(tendered).to_string(),
            change_due: Money::new(change.amount).to_string(),
            insufficient: change.insufficient,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use caja_core::{ProductId, SaleUnit};

    use crate::catalog::CatalogProduct;

    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn product(id: i32, price: &str, stock: &str, unit: SaleUnit) -> CatalogProduct {
        CatalogProduct {
            id: ProductId::new(id),
            name: format!("product {id}"),
            current_price: dec(price),
            available_stock: dec(stock),
            sale_unit: unit,
        }
    }

    #[test]
    fn test_totals_are_rounded_and_grouped() {
        let mut cart = Cart::default();
        cart.add_or_increment(&product(1, "1000", "10", SaleUnit::Each), Some(dec("2")))
            .unwrap();
        let view = CartView::from(&cart);
        assert_eq!(view.summary.total, "2.000");
        // 1680.672268907563 rounds to 1681
        assert_eq!(view.summary.total_excl_tax, "1.681");
        assert_eq!(view.summary.tax, "319");
        assert!(!view.is_empty);
    }

    #[test]
    fn test_line_view_formats_per_unit() {
        let mut cart = Cart::default();
        cart.add_or_increment(&product(1, "2500", "8", SaleUnit::Each), None)
            .unwrap();
        cart.add_or_increment(
            &product(2, "1890", "12.5", SaleUnit::Kilogram),
            Some(dec("1.5")),
        )
        .unwrap();

        let view = CartView::from(&cart);
        let each = &view.lines[0];
        assert_eq!(each.quantity, "1");
        assert_eq!(each.controls.step, dec("1"));
        assert_eq!(each.controls.minimum, dec("1"));
        assert_eq!(each.controls.precision, 0);

        let kilos = &view.lines[1];
        assert_eq!(kilos.quantity, "1.500");
        assert_eq!(kilos.unit_label, "kilo(s)");
        assert_eq!(kilos.subtotal, "2.835");
        assert_eq!(kilos.controls.step, dec("0.1"));
        assert_eq!(kilos.controls.minimum, dec("0.001"));
        assert_eq!(kilos.controls.precision, 3);
    }

    #[test]
    fn test_discounted_line_shows_effective_price() {
        let mut cart = Cart::default();
        cart.add_or_increment(&product(1, "1000", "10", SaleUnit::Each), Some(dec("2")))
            .unwrap();
        cart.set_line_discount(ProductId::new(1), dec("10")).unwrap();

        let view = CartView::from(&cart);
        assert_eq!(view.lines[0].unit_price, "1.000");
        assert_eq!(view.lines[0].effective_unit_price, "900");
        assert_eq!(view.lines[0].subtotal, "1.800");
        assert_eq!(view.summary.total, "1.800");
    }

    #[test]
    fn test_empty_cart_view() {
        let view = CartView::from(&Cart::default());
        assert!(view.is_empty);
        assert!(view.lines.is_empty());
        assert_eq!(view.summary.total, "0");
        assert_eq!(view.summary.item_count, Decimal::ZERO);
    }

    #[test]
    fn test_checkout_preview() {
        let mut cart = Cart::default();
        cart.add_or_increment(&product(1, "1000", "10", SaleUnit::Each), Some(dec("2")))
            .unwrap();

        let preview = CheckoutPreview::compute(&cart, dec("5000"));
        assert_eq!(preview.change_due, "3.000");
        assert!(!preview.insufficient);

        let short = CheckoutPreview::compute(&cart, dec("500"));
        assert_eq!(short.change_due, "0");
        assert!(short.insufficient);
    }
}
