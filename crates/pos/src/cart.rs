//! The cart store.
//!
//! An owned, encapsulated cart: an ordered list of line items (insertion
//! order is display order) plus the sale channel. All mutation goes through
//! the operations here; every one of them is all-or-nothing, so a failed
//! validation leaves the cart untouched.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use caja_core::{ProductId, SaleUnit};

use crate::catalog::CatalogProduct;
use crate::error::CartError;

/// How a completed sale reaches the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SaleChannel {
    #[default]
    InPerson,
    Delivery,
}

/// One product entry in the cart.
///
/// `unit_price` and `available_stock` are snapshots taken when the product
/// was first added; later catalog changes do not reach existing lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: ProductId,
    pub name: String,
    /// Tax-inclusive price per sale unit, fixed at add time.
    pub unit_price: Decimal,
    /// Stock available when the line was created.
    pub available_stock: Decimal,
    pub sale_unit: SaleUnit,
    /// Always positive; integral when `sale_unit` is `each`, otherwise
    /// carried with 3-decimal precision. Never exceeds `available_stock`.
    pub quantity: Decimal,
    /// Per-line discount in percent, 0-100.
    pub discount_percent: Decimal,
}

/// Direction for the +/- quantity controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepDirection {
    Increment,
    Decrement,
}

/// Result of a [`Cart::step`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The quantity was updated to the contained value.
    Updated(Decimal),
    /// The step would drop the quantity below the unit minimum. The line is
    /// untouched; the caller must get explicit user confirmation and then
    /// issue a [`Cart::remove`].
    ConfirmRemoval,
}

/// The shopping cart for one POS session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<LineItem>,
    sale_channel: SaleChannel,
}

impl Cart {
    /// Line items in display order.
    #[must_use]
    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Sum of all line quantities (the cart header badge).
    #[must_use]
    pub fn item_count(&self) -> Decimal {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// Current sale channel.
    #[must_use]
    pub const fn sale_channel(&self) -> SaleChannel {
        self.sale_channel
    }

    /// Switch between in-person and delivery.
    pub const fn set_sale_channel(&mut self, channel: SaleChannel) {
        self.sale_channel = channel;
    }

    /// Look up a line by product ID.
    #[must_use]
    pub fn line(&self, product_id: ProductId) -> Option<&LineItem> {
        self.lines.iter().find(|line| line.product_id == product_id)
    }

    fn line_mut(&mut self, product_id: ProductId) -> Option<&mut LineItem> {
        self.lines
            .iter_mut()
            .find(|line| line.product_id == product_id)
    }

    /// Add a product to the cart, merging with an existing line.
    ///
    /// A discrete (`each`) product defaults to a quantity of 1 when
    /// `requested` is `None`; fractional units always require an explicit
    /// requested quantity. Returns the line's new total quantity.
    ///
    /// # Errors
    ///
    /// - [`CartError::NoStock`] if the product has no stock at all
    /// - [`CartError::InvalidQuantity`] if `requested` is missing for a
    ///   fractional unit, not positive, or off the unit's granularity
    /// - [`CartError::StockExceeded`] if the merged quantity would exceed
    ///   the stock snapshot
    pub fn add_or_increment(
        &mut self,
        product: &CatalogProduct,
        requested: Option<Decimal>,
    ) -> Result<Decimal, CartError> {
        let unit = product.sale_unit;
        if product.available_stock <= Decimal::ZERO {
            return Err(CartError::NoStock);
        }

        let requested = match requested {
            Some(quantity) => {
                if !unit.valid_quantity(quantity) {
                    return Err(CartError::InvalidQuantity { unit });
                }
                unit.quantize(quantity)
            }
            None if unit.is_fractional() => {
                // Fractional quantities come from the quantity dialog; there
                // is no sensible default.
                return Err(CartError::InvalidQuantity { unit });
            }
            None => Decimal::ONE,
        };

        if let Some(line) = self.line_mut(product.id) {
            let available = line.available_stock;
            let total = unit.quantize(line.quantity + requested);
            if total > available {
                return Err(CartError::StockExceeded { available, unit });
            }
            line.quantity = total;
            Ok(total)
        } else {
            if requested > product.available_stock {
                return Err(CartError::StockExceeded {
                    available: product.available_stock,
                    unit,
                });
            }
            self.lines.push(LineItem {
                product_id: product.id,
                name: product.name.clone(),
                unit_price: product.current_price,
                available_stock: product.available_stock,
                sale_unit: unit,
                quantity: requested,
                discount_percent: Decimal::ZERO,
            });
            Ok(requested)
        }
    }

    /// Set a line's quantity to an absolute value.
    ///
    /// # Errors
    ///
    /// - [`CartError::MissingLine`] if the product is not in the cart
    /// - [`CartError::InvalidQuantity`] if the value is not positive or off
    ///   the unit's granularity
    /// - [`CartError::StockExceeded`] if it exceeds the stock snapshot
    pub fn set_quantity(
        &mut self,
        product_id: ProductId,
        quantity: Decimal,
    ) -> Result<(), CartError> {
        let Some(line) = self.line_mut(product_id) else {
            return Err(CartError::MissingLine(product_id));
        };
        let unit = line.sale_unit;
        if !unit.valid_quantity(quantity) {
            return Err(CartError::InvalidQuantity { unit });
        }
        let quantity = unit.quantize(quantity);
        if quantity > line.available_stock {
            return Err(CartError::StockExceeded {
                available: line.available_stock,
                unit,
            });
        }
        line.quantity = quantity;
        Ok(())
    }

    /// Nudge a line's quantity by one unit-dependent step.
    ///
    /// Stepping below the unit minimum never clamps or silently removes:
    /// it reports [`StepOutcome::ConfirmRemoval`] and leaves the line as is.
    ///
    /// # Errors
    ///
    /// - [`CartError::MissingLine`] if the product is not in the cart
    /// - [`CartError::StockExceeded`] if stepping up would exceed the stock
    ///   snapshot
    pub fn step(
        &mut self,
        product_id: ProductId,
        direction: StepDirection,
    ) -> Result<StepOutcome, CartError> {
        let Some(line) = self.line_mut(product_id) else {
            return Err(CartError::MissingLine(product_id));
        };
        let unit = line.sale_unit;
        let delta = match direction {
            StepDirection::Increment => unit.step(),
            StepDirection::Decrement => -unit.step(),
        };
        let next = unit.quantize(line.quantity + delta);
        if next < unit.minimum() {
            return Ok(StepOutcome::ConfirmRemoval);
        }
        if next > line.available_stock {
            return Err(CartError::StockExceeded {
                available: line.available_stock,
                unit,
            });
        }
        line.quantity = next;
        Ok(StepOutcome::Updated(next))
    }

    /// Remove a line from the cart, returning it.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::MissingLine`] if the product is not in the cart.
    pub fn remove(&mut self, product_id: ProductId) -> Result<LineItem, CartError> {
        let Some(index) = self
            .lines
            .iter()
            .position(|line| line.product_id == product_id)
        else {
            return Err(CartError::MissingLine(product_id));
        };
        Ok(self.lines.remove(index))
    }

    /// Apply a per-line discount percentage.
    ///
    /// # Errors
    ///
    /// - [`CartError::MissingLine`] if the product is not in the cart
    /// - [`CartError::InvalidDiscount`] if `percent` is outside 0-100
    pub fn set_line_discount(
        &mut self,
        product_id: ProductId,
        percent: Decimal,
    ) -> Result<(), CartError> {
        if percent < Decimal::ZERO || percent > Decimal::ONE_HUNDRED {
            return Err(CartError::InvalidDiscount);
        }
        let Some(line) = self.line_mut(product_id) else {
            return Err(CartError::MissingLine(product_id));
        };
        line.discount_percent = percent;
        Ok(())
    }

    /// Empty the cart and reset the sale channel to in-person.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.sale_channel = SaleChannel::default();
    }
}
