//! Core types for Caja.
//!
//! This module provides type-safe wrappers for common domain concepts.

mod id;
mod money;
mod unit;

pub use id::{ClientId, ProductId, SaleId};
pub use money::Money;
pub use unit::SaleUnit;
