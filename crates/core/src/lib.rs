//! Caja Core - Shared types library.
//!
//! This crate provides common types used across all Caja components:
//! - `pos` - The point-of-sale cart engine and its HTTP delivery layer
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no async.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, money, and sale units

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
