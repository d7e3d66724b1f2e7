//! End-to-end cart flow tests.
//!
//! Drive a full register session through the engine: load a catalog, ring
//! up products, adjust quantities and discounts, preview payment, and
//! check out against a scripted sales backend.

#![allow(clippy::unwrap_used)]

use std::sync::Mutex;

use rust_decimal::Decimal;

use caja_core::{ClientId, ProductId, SaleId, SaleUnit};
use caja_pos::cart::{Cart, SaleChannel, StepDirection, StepOutcome};
use caja_pos::catalog::Catalog;
use caja_pos::checkout::{self, CheckoutFlow, CheckoutState};
use caja_pos::error::CartError;
use caja_pos::sales::{SaleReceipt, SaleRequest, SalesApi, SalesApiError};
use caja_pos::view::{CartView, CheckoutPreview};

const CATALOG_JSON: &str = r#"[
    {
        "id": 1,
        "name": "Marraqueta",
        "current_price": "1000",
        "available_stock": "20",
        "sale_unit": "each"
    },
    {
        "id": 2,
        "name": "Harina integral",
        "current_price": "1890",
        "available_stock": "2.5",
        "sale_unit": "kilogram"
    },
    {
        "id": 3,
        "name": "Torta de mil hojas",
        "current_price": "14500",
        "available_stock": "0",
        "sale_unit": "each"
    }
]"#;

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn catalog() -> Catalog {
    Catalog::from_json(CATALOG_JSON).unwrap()
}

// =============================================================================
// Scripted Sales Backend
// =============================================================================

/// Sales backend double that records requests and plays scripted replies.
struct ScriptedSales {
    responses: Mutex<Vec<Result<SaleReceipt, SalesApiError>>>,
    requests: Mutex<Vec<SaleRequest>>,
}

impl ScriptedSales {
    fn with(responses: Vec<Result<SaleReceipt, SalesApiError>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn accepting(sale_id: i32) -> Self {
        Self::with(vec![Ok(SaleReceipt {
            sale_id: SaleId::new(sale_id),
            folio: Some("F-0042".to_string()),
        })])
    }

    fn requests(&self) -> Vec<SaleRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl SalesApi for ScriptedSales {
    async fn submit(&self, request: SaleRequest) -> Result<SaleReceipt, SalesApiError> {
        self.requests.lock().unwrap().push(request);
        self.responses.lock().unwrap().remove(0)
    }
}

// =============================================================================
// Ringing Up
// =============================================================================

#[test]
fn test_ring_up_and_totals() {
    let catalog = catalog();
    let mut cart = Cart::default();

    let bread = catalog.get(ProductId::new(1)).unwrap();
    cart.add_or_increment(bread, None).unwrap();
    cart.add_or_increment(bread, None).unwrap();

    let view = CartView::from(&cart);
    assert_eq!(view.lines.len(), 1);
    assert_eq!(view.lines[0].quantity, "2");
    assert_eq!(view.summary.total, "2.000");
    assert_eq!(view.summary.total_excl_tax, "1.681");
    assert_eq!(view.summary.tax, "319");
}

#[test]
fn test_sold_out_product_is_refused() {
    let catalog = catalog();
    let mut cart = Cart::default();

    let cake = catalog.get(ProductId::new(3)).unwrap();
    assert_eq!(
        cart.add_or_increment(cake, None).unwrap_err(),
        CartError::NoStock
    );
    assert!(cart.is_empty());
}

#[test]
fn test_weighed_product_over_stock_is_refused() {
    let catalog = catalog();
    let mut cart = Cart::default();

    let flour = catalog.get(ProductId::new(2)).unwrap();
    let err = cart.add_or_increment(flour, Some(dec("3"))).unwrap_err();
    assert_eq!(
        err,
        CartError::StockExceeded {
            available: dec("2.5"),
            unit: SaleUnit::Kilogram,
        }
    );
    assert!(cart.is_empty());
}

#[test]
fn test_step_down_to_minimum_then_confirm_removal() {
    let catalog = catalog();
    let mut cart = Cart::default();
    let bread = catalog.get(ProductId::new(1)).unwrap();
    cart.add_or_increment(bread, Some(dec("2"))).unwrap();

    assert_eq!(
        cart.step(ProductId::new(1), StepDirection::Decrement).unwrap(),
        StepOutcome::Updated(dec("1"))
    );
    // One more step asks for confirmation instead of mutating
    assert_eq!(
        cart.step(ProductId::new(1), StepDirection::Decrement).unwrap(),
        StepOutcome::ConfirmRemoval
    );
    assert_eq!(cart.lines()[0].quantity, dec("1"));

    // The confirmed removal is an explicit remove
    cart.remove(ProductId::new(1)).unwrap();
    assert!(cart.is_empty());
}

#[test]
fn test_discount_flows_into_totals() {
    let catalog = catalog();
    let mut cart = Cart::default();
    let bread = catalog.get(ProductId::new(1)).unwrap();
    cart.add_or_increment(bread, Some(dec("2"))).unwrap();
    cart.set_line_discount(ProductId::new(1), dec("10")).unwrap();

    let view = CartView::from(&cart);
    assert_eq!(view.lines[0].subtotal, "1.800");
    assert_eq!(view.summary.total, "1.800");
}

// =============================================================================
// Payment Preview
// =============================================================================

#[test]
fn test_preview_change_due() {
    let catalog = catalog();
    let mut cart = Cart::default();
    cart.add_or_increment(catalog.get(ProductId::new(1)).unwrap(), Some(dec("2")))
        .unwrap();

    let preview = CheckoutPreview::compute(&cart, dec("5000"));
    assert_eq!(preview.total, "2.000");
    assert_eq!(preview.change_due, "3.000");
    assert!(!preview.insufficient);

    let short = CheckoutPreview::compute(&cart, dec("500"));
    assert_eq!(short.change_due, "0");
    assert!(short.insufficient);
}

// =============================================================================
// Checkout
// =============================================================================

#[tokio::test]
async fn test_checkout_submits_snapshot_and_clears_cart() {
    let catalog = catalog();
    let api = ScriptedSales::accepting(118);
    let mut cart = Cart::default();
    let mut flow = CheckoutFlow::default();

    cart.add_or_increment(catalog.get(ProductId::new(1)).unwrap(), Some(dec("2")))
        .unwrap();
    cart.add_or_increment(catalog.get(ProductId::new(2)).unwrap(), Some(dec("0.5")))
        .unwrap();
    cart.set_line_discount(ProductId::new(1), dec("10")).unwrap();
    cart.set_sale_channel(SaleChannel::Delivery);

    // Total: 1000*2*0.9 + 1890*0.5 = 2745
    let outcome = checkout::submit_sale(
        &api,
        &mut cart,
        &mut flow,
        Some(ClientId::new(7)),
        dec("5000"),
    )
    .await
    .unwrap();

    assert_eq!(outcome.receipt.sale_id, SaleId::new(118));
    assert_eq!(outcome.receipt.folio.as_deref(), Some("F-0042"));
    assert_eq!(outcome.change.amount, dec("2255"));
    assert!(cart.is_empty());
    assert_eq!(cart.sale_channel(), SaleChannel::InPerson);
    assert_eq!(flow.state(), CheckoutState::Idle);

    let requests = api.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.client_id, ClientId::new(7));
    assert_eq!(request.sale_channel, SaleChannel::Delivery);
    assert_eq!(request.lines.len(), 2);
    assert_eq!(request.lines[0].product_id, ProductId::new(1));
    assert_eq!(request.lines[0].quantity, dec("2"));
    assert_eq!(request.lines[0].unit_price, dec("1000"));
    assert_eq!(request.lines[0].discount_percent, dec("10"));
    assert_eq!(request.lines[1].quantity, dec("0.5"));
}

#[tokio::test]
async fn test_failed_checkout_keeps_cart_for_retry() {
    let catalog = catalog();
    let api = ScriptedSales::with(vec![
        Err(SalesApiError::Rejected("client not found".to_string())),
        Ok(SaleReceipt {
            sale_id: SaleId::new(119),
            folio: None,
        }),
    ]);
    let mut cart = Cart::default();
    let mut flow = CheckoutFlow::default();
    cart.add_or_increment(catalog.get(ProductId::new(1)).unwrap(), Some(dec("2")))
        .unwrap();

    let err = checkout::submit_sale(
        &api,
        &mut cart,
        &mut flow,
        Some(ClientId::new(7)),
        dec("2000"),
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err,
        checkout::CheckoutError::Sales(SalesApiError::Rejected(_))
    ));
    assert_eq!(cart.len(), 1);
    assert_eq!(flow.state(), CheckoutState::Reviewing);

    // Retrying with the same cart succeeds
    checkout::submit_sale(
        &api,
        &mut cart,
        &mut flow,
        Some(ClientId::new(7)),
        dec("2000"),
    )
    .await
    .unwrap();
    assert!(cart.is_empty());
}

#[tokio::test]
async fn test_insufficient_payment_never_reaches_the_backend() {
    let catalog = catalog();
    let api = ScriptedSales::with(vec![]);
    let mut cart = Cart::default();
    let mut flow = CheckoutFlow::default();
    cart.add_or_increment(catalog.get(ProductId::new(1)).unwrap(), Some(dec("2")))
        .unwrap();

    let err = checkout::submit_sale(
        &api,
        &mut cart,
        &mut flow,
        Some(ClientId::new(7)),
        dec("500"),
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err,
        checkout::CheckoutError::Cart(CartError::InsufficientPayment)
    ));
    assert!(api.requests().is_empty());
    assert_eq!(cart.len(), 1);
}
