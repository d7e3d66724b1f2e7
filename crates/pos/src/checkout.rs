//! The checkout flow.
//!
//! A small state machine guards sale submission: a checkout moves from
//! `Idle` (cart editing) to `Reviewing` (payment dialog open) to
//! `Submitting` (request in flight). Only one submission can be in flight
//! per session; a second confirm while `Submitting` is rejected rather than
//! queued. On success the cart is cleared and the flow returns to `Idle`;
//! on failure the cart is kept intact and the flow drops back to
//! `Reviewing` so the cashier can correct and retry.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use caja_core::ClientId;

use crate::cart::Cart;
use crate::error::CartError;
use crate::pricing::{ChangeDue, Totals};
use crate::sales::{SaleReceipt, SaleRequest, SaleRequestLine, SalesApi, SalesApiError};

/// Errors raised while moving a checkout forward.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Pre-submission validation failed.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// A submission for this session is already in flight.
    #[error("a sale submission is already in progress")]
    SubmissionInFlight,

    /// The sales backend failed or declined the sale.
    #[error(transparent)]
    Sales(#[from] SalesApiError),
}

/// Where a session's checkout currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutState {
    /// Normal cart editing.
    #[default]
    Idle,
    /// The payment dialog is open.
    Reviewing,
    /// A submission is in flight.
    Submitting,
}

/// Per-session checkout state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CheckoutFlow {
    state: CheckoutState,
}

impl CheckoutFlow {
    /// Current state.
    #[must_use]
    pub const fn state(&self) -> CheckoutState {
        self.state
    }

    /// Open the payment dialog. A no-op while a submission is in flight.
    pub const fn begin_review(&mut self) {
        if !matches!(self.state, CheckoutState::Submitting) {
            self.state = CheckoutState::Reviewing;
        }
    }

    /// Close the payment dialog without submitting.
    pub const fn reset(&mut self) {
        if !matches!(self.state, CheckoutState::Submitting) {
            self.state = CheckoutState::Idle;
        }
    }

    /// Claim the in-flight slot.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::SubmissionInFlight`] if a submission is
    /// already running for this session.
    pub const fn try_begin_submit(&mut self) -> Result<(), CheckoutError> {
        if matches!(self.state, CheckoutState::Submitting) {
            return Err(CheckoutError::SubmissionInFlight);
        }
        self.state = CheckoutState::Submitting;
        Ok(())
    }

    /// Record a successful submission.
    pub const fn complete_success(&mut self) {
        self.state = CheckoutState::Idle;
    }

    /// Record a failed submission, keeping the dialog open.
    pub const fn complete_failure(&mut self) {
        self.state = CheckoutState::Reviewing;
    }
}

/// What the cashier sees after a successful checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutOutcome {
    pub receipt: SaleReceipt,
    pub change: ChangeDue,
}

/// Validate the cart, submit the sale, and settle the session state.
///
/// The cart is cleared only after the backend confirms the sale; any
/// failure leaves every line, discount, and the sale channel untouched.
///
/// # Errors
///
/// - [`CheckoutError::Cart`] when the cart is empty, no client is selected,
///   or the tendered amount does not cover the total
/// - [`CheckoutError::SubmissionInFlight`] when this session already has a
///   submission running
/// - [`CheckoutError::Sales`] when the backend declines or is unreachable
pub async fn submit_sale<S: SalesApi + Sync>(
    api: &S,
    cart: &mut Cart,
    flow: &mut CheckoutFlow,
    client_id: Option<ClientId>,
    amount_tendered: Decimal,
) -> Result<CheckoutOutcome, CheckoutError> {
    if cart.is_empty() {
        return Err(CartError::EmptyCart.into());
    }
    let Some(client_id) = client_id else {
        return Err(CartError::NoClientSelected.into());
    };

    let totals = Totals::of(cart);
    let change = ChangeDue::compute(totals.total_incl, amount_tendered);
    if amount_tendered <= Decimal::ZERO || change.insufficient {
        return Err(CartError::InsufficientPayment.into());
    }

    flow.try_begin_submit()?;

    let request = SaleRequest {
        client_id,
        sale_channel: cart.sale_channel(),
        amount_tendered,
        lines: cart
            .lines()
            .iter()
            .map(|line| SaleRequestLine {
                product_id: line.product_id,
                quantity: line.quantity,
                unit_price: line.unit_price,
                discount_percent: line.discount_percent,
            })
            .collect(),
    };

    match api.submit(request).await {
        Ok(receipt) => {
            info!(sale_id = %receipt.sale_id, "Sale confirmed");
            cart.clear();
            flow.complete_success();
            Ok(CheckoutOutcome { receipt, change })
        }
        Err(err) => {
            warn!(error = %err, "Sale submission failed");
            flow.complete_failure();
            Err(err.into())
        }
    }
}
