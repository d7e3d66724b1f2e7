//! HTTP route handlers for the POS screen.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                          - Health check
//!
//! # Cart
//! GET    /pos/cart                        - Current cart view
//! POST   /pos/cart/items                  - Add a product (merges lines)
//! PUT    /pos/cart/items/{id}/quantity    - Set absolute quantity
//! POST   /pos/cart/items/{id}/step        - Nudge quantity by one step
//! DELETE /pos/cart/items/{id}             - Remove a line
//! PUT    /pos/cart/items/{id}/discount    - Set per-line discount
//! PUT    /pos/cart/channel                - Switch sale channel
//! POST   /pos/cart/cancel                 - Clear the cart
//!
//! # Checkout
//! GET    /pos/cart/checkout-preview       - Change-due preview
//! POST   /pos/checkout                    - Submit the sale
//! ```

pub mod pos;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::state::AppState;

/// Session keys for per-session POS state.
pub mod session_keys {
    /// The cart.
    pub const CART: &str = "pos.cart";
    /// The checkout flow state machine.
    pub const CHECKOUT: &str = "pos.checkout";
}

/// Create the POS routes router.
pub fn pos_routes() -> Router<AppState> {
    Router::new()
        .route("/cart", get(pos::show))
        .route("/cart/items", post(pos::add_item))
        .route("/cart/items/{id}/quantity", put(pos::set_quantity))
        .route("/cart/items/{id}/step", post(pos::step))
        .route("/cart/items/{id}", delete(pos::remove_item))
        .route("/cart/items/{id}/discount", put(pos::set_discount))
        .route("/cart/channel", put(pos::set_channel))
        .route("/cart/cancel", post(pos::cancel))
        .route("/cart/checkout-preview", get(pos::checkout_preview))
        .route("/checkout", post(pos::checkout))
}

/// Create the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .nest("/pos", pos_routes())
        .with_state(state)
}
