//! Caja POS - point-of-sale cart engine.
//!
//! The engine keeps an in-memory cart per POS session and exposes it over a
//! small JSON API:
//!
//! - [`cart`] - the cart store: ordered line items plus the sale channel
//! - [`pricing`] - pure totals/tax/change arithmetic over a cart
//! - [`view`] - the rendering bridge: pure projection of a cart into
//!   serializable view-models, the only read surface other components see
//! - [`checkout`] - the checkout command flow and its state machine
//! - [`sales`] - wire types and reqwest client for the external Sales
//!   Submission API
//! - [`catalog`] - the read-only product catalog collaborator
//! - [`routes`] - axum handlers mapping user actions onto the engine
//!
//! Prices are tax-inclusive; see [`pricing::TAX_RATE`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod pricing;
pub mod routes;
pub mod sales;
pub mod session;
pub mod state;
pub mod view;
