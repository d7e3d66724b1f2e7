//! Unified error handling for the POS delivery layer.
//!
//! Engine errors are all recovered locally: every handler returns
//! `Result<T, AppError>` and the client receives a transient, dismissible
//! `{"success": false, "message": ...}` payload it can surface as a toast.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use caja_core::{ProductId, SaleUnit};

use crate::checkout::CheckoutError;
use crate::sales::SalesApiError;

/// Validation failures raised by cart store operations.
///
/// Every failing operation leaves the cart exactly as it was before the
/// call; callers re-render from the last valid state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CartError {
    /// The product has no stock at all.
    #[error("this product has no stock available")]
    NoStock,

    /// The requested quantity would exceed the stock snapshot.
    #[error("only {available} {} available", .unit.label())]
    StockExceeded { available: Decimal, unit: SaleUnit },

    /// The quantity is not a positive number meeting the unit's granularity.
    #[error("quantity must be a positive number of {}", .unit.label())]
    InvalidQuantity { unit: SaleUnit },

    /// Per-line discount outside the 0-100 range.
    #[error("discount must be between 0 and 100")]
    InvalidDiscount,

    /// Checkout attempted without a selected client.
    #[error("a client must be selected")]
    NoClientSelected,

    /// Checkout attempted on an empty cart.
    #[error("the cart is empty")]
    EmptyCart,

    /// The tendered amount does not cover the total.
    #[error("the amount tendered is insufficient")]
    InsufficientPayment,

    /// The referenced product is not in the cart.
    #[error("product {0} is not in the cart")]
    MissingLine(ProductId),
}

/// Application-level error type for the POS routes.
#[derive(Debug, Error)]
pub enum AppError {
    /// Cart store validation failed.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Checkout flow failed.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Session store operation failed.
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

/// JSON error envelope sent to the POS screen.
#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    message: String,
}

const fn cart_error_status(err: &CartError) -> StatusCode {
    match err {
        CartError::NoStock | CartError::StockExceeded { .. } => StatusCode::CONFLICT,
        CartError::MissingLine(_) => StatusCode::NOT_FOUND,
        CartError::InvalidQuantity { .. }
        | CartError::InvalidDiscount
        | CartError::NoClientSelected
        | CartError::EmptyCart
        | CartError::InsufficientPayment => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Cart(err) => cart_error_status(err),
            Self::Checkout(err) => match err {
                CheckoutError::Cart(inner) => cart_error_status(inner),
                CheckoutError::SubmissionInFlight => StatusCode::CONFLICT,
                CheckoutError::Sales(_) => StatusCode::BAD_GATEWAY,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "Request error");
        }

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Session(_) => "internal server error".to_string(),
            Self::Checkout(CheckoutError::Sales(SalesApiError::Network(_))) => {
                "could not reach the sales server".to_string()
            }
            _ => self.to_string(),
        };

        (
            status,
            Json(ErrorBody {
                success: false,
                message,
            }),
        )
            .into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
