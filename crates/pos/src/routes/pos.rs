//! POS cart and checkout handlers.
//!
//! Each session carries its own cart and checkout flow in the session
//! store; handlers load them, run one engine operation, persist, and
//! respond with the re-projected [`CartView`]. Validation failures bubble
//! up as [`AppError`] and never leave a half-applied cart behind.

use axum::extract::{Path, Query, State};
use axum::{Json, http::StatusCode};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use caja_core::{ClientId, Money, ProductId};

use crate::cart::{Cart, SaleChannel, StepDirection, StepOutcome};
use crate::checkout::{self, CheckoutFlow};
use crate::error::{AppError, Result};
use crate::routes::session_keys;
use crate::state::AppState;
use crate::view::{CartView, CheckoutPreview};

// =============================================================================
// Request / Response Types
// =============================================================================

/// Body for adding a product to the cart.
#[derive(Debug, Deserialize)]
pub struct AddItemBody {
    pub product_id: ProductId,
    /// Required for weighed/measured units; discrete units default to 1.
    pub quantity: Option<Decimal>,
}

/// Body for setting a line's absolute quantity.
#[derive(Debug, Deserialize)]
pub struct SetQuantityBody {
    pub quantity: Decimal,
}

/// Body for a +/- step.
#[derive(Debug, Deserialize)]
pub struct StepBody {
    pub direction: StepDirection,
}

/// Body for setting a line's discount.
#[derive(Debug, Deserialize)]
pub struct SetDiscountBody {
    pub discount_percent: Decimal,
}

/// Body for switching the sale channel.
#[derive(Debug, Deserialize)]
pub struct SetChannelBody {
    pub sale_channel: SaleChannel,
}

/// Query for the change-due preview.
#[derive(Debug, Deserialize)]
pub struct PreviewQuery {
    pub amount_tendered: Decimal,
}

/// Body for submitting the sale.
#[derive(Debug, Deserialize)]
pub struct CheckoutBody {
    pub client_id: Option<ClientId>,
    pub amount_tendered: Decimal,
}

/// Response to a step request.
#[derive(Debug, Serialize)]
pub struct StepResponse {
    /// True when the step would drop below the minimum and the line was
    /// left untouched pending an explicit removal.
    pub confirm_removal: bool,
    pub cart: CartView,
}

/// Response to a cancel request.
#[derive(Debug, Serialize)]
pub struct CancelResponse {
    /// False when the cart was already empty.
    pub cleared: bool,
    pub cart: CartView,
}

/// Response to a successful checkout.
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub success: bool,
    pub sale_id: i32,
    pub folio: Option<String>,
    pub change_due: String,
    /// The now-empty cart.
    pub cart: CartView,
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Load the session's cart, defaulting to an empty one.
async fn load_cart(session: &Session) -> Result<Cart> {
    Ok(session
        .get::<Cart>(session_keys::CART)
        .await?
        .unwrap_or_default())
}

/// Persist the session's cart.
async fn store_cart(session: &Session, cart: &Cart) -> Result<()> {
    session.insert(session_keys::CART, cart).await?;
    Ok(())
}

/// Load the session's checkout flow, defaulting to idle.
async fn load_flow(session: &Session) -> Result<CheckoutFlow> {
    Ok(session
        .get::<CheckoutFlow>(session_keys::CHECKOUT)
        .await?
        .unwrap_or_default())
}

/// Persist the session's checkout flow.
async fn store_flow(session: &Session, flow: &CheckoutFlow) -> Result<()> {
    session.insert(session_keys::CHECKOUT, flow).await?;
    Ok(())
}

// =============================================================================
// Cart Handlers
// =============================================================================

/// `GET /pos/cart` - the current cart view.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<Json<CartView>> {
    let cart = load_cart(&session).await?;
    Ok(Json(CartView::from(&cart)))
}

/// `POST /pos/cart/items` - add a product, merging with an existing line.
#[instrument(skip(state, session))]
pub async fn add_item(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<AddItemBody>,
) -> Result<Json<CartView>> {
    let Some(product) = state.catalog().get(body.product_id) else {
        return Err(AppError::NotFound(format!("product {}", body.product_id)));
    };

    let mut cart = load_cart(&session).await?;
    cart.add_or_increment(product, body.quantity)?;
    store_cart(&session, &cart).await?;
    Ok(Json(CartView::from(&cart)))
}

/// `PUT /pos/cart/items/{id}/quantity` - set an absolute quantity.
#[instrument(skip(session))]
pub async fn set_quantity(
    session: Session,
    Path(id): Path<i32>,
    Json(body): Json<SetQuantityBody>,
) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await?;
    cart.set_quantity(ProductId::new(id), body.quantity)?;
    store_cart(&session, &cart).await?;
    Ok(Json(CartView::from(&cart)))
}

/// `POST /pos/cart/items/{id}/step` - nudge the quantity by one step.
///
/// Stepping below the minimum does not mutate; the response asks the
/// client to confirm removal instead.
#[instrument(skip(session))]
pub async fn step(
    session: Session,
    Path(id): Path<i32>,
    Json(body): Json<StepBody>,
) -> Result<Json<StepResponse>> {
    let mut cart = load_cart(&session).await?;
    let outcome = cart.step(ProductId::new(id), body.direction)?;
    let confirm_removal = match outcome {
        StepOutcome::Updated(_) => {
            store_cart(&session, &cart).await?;
            false
        }
        StepOutcome::ConfirmRemoval => true,
    };
    Ok(Json(StepResponse {
        confirm_removal,
        cart: CartView::from(&cart),
    }))
}

/// `DELETE /pos/cart/items/{id}` - remove a line.
#[instrument(skip(session))]
pub async fn remove_item(session: Session, Path(id): Path<i32>) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await?;
    cart.remove(ProductId::new(id))?;
    store_cart(&session, &cart).await?;
    Ok(Json(CartView::from(&cart)))
}

/// `PUT /pos/cart/items/{id}/discount` - set a per-line discount.
#[instrument(skip(session))]
pub async fn set_discount(
    session: Session,
    Path(id): Path<i32>,
    Json(body): Json<SetDiscountBody>,
) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await?;
    cart.set_line_discount(ProductId::new(id), body.discount_percent)?;
    store_cart(&session, &cart).await?;
    Ok(Json(CartView::from(&cart)))
}

/// `PUT /pos/cart/channel` - switch between in-person and delivery.
#[instrument(skip(session))]
pub async fn set_channel(
    session: Session,
    Json(body): Json<SetChannelBody>,
) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await?;
    cart.set_sale_channel(body.sale_channel);
    store_cart(&session, &cart).await?;
    Ok(Json(CartView::from(&cart)))
}

/// `POST /pos/cart/cancel` - clear the cart and reset the checkout flow.
#[instrument(skip(session))]
pub async fn cancel(session: Session) -> Result<Json<CancelResponse>> {
    let mut cart = load_cart(&session).await?;
    let mut flow = load_flow(&session).await?;

    let cleared = !cart.is_empty();
    cart.clear();
    flow.reset();

    store_cart(&session, &cart).await?;
    store_flow(&session, &flow).await?;
    Ok(Json(CancelResponse {
        cleared,
        cart: CartView::from(&cart),
    }))
}

// =============================================================================
// Checkout Handlers
// =============================================================================

/// `GET /pos/cart/checkout-preview` - change due for a tendered amount.
#[instrument(skip(session))]
pub async fn checkout_preview(
    session: Session,
    Query(query): Query<PreviewQuery>,
) -> Result<Json<CheckoutPreview>> {
    let cart = load_cart(&session).await?;
    Ok(Json(CheckoutPreview::compute(&cart, query.amount_tendered)))
}

/// `POST /pos/checkout` - submit the sale to the sales backend.
#[instrument(skip(state, session, body))]
pub async fn checkout(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<CheckoutBody>,
) -> Result<(StatusCode, Json<CheckoutResponse>)> {
    let mut cart = load_cart(&session).await?;
    let mut flow = load_flow(&session).await?;

    let result = checkout::submit_sale(
        state.sales(),
        &mut cart,
        &mut flow,
        body.client_id,
        body.amount_tendered,
    )
    .await;

    // Persist before reporting: a failure keeps the cart, a success
    // leaves it empty.
    store_cart(&session, &cart).await?;
    store_flow(&session, &flow).await?;

    let outcome = result?;
    Ok((
        StatusCode::CREATED,
        Json(CheckoutResponse {
            success: true,
            sale_id: outcome.receipt.sale_id.as_i32(),
            folio: outcome.receipt.folio,
            change_due: Money::new(outcome.change.amount).to_string(),
            cart: CartView::from(&cart),
        }),
    ))
}
