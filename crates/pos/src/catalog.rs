//! Read-only product catalog.
//!
//! The catalog is an external collaborator: the POS screen receives it fully
//! materialized at startup and never writes to it. Cart lines snapshot the
//! price and stock they saw at add time, so later catalog edits do not
//! affect lines already in a cart.

use std::collections::HashMap;
use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use caja_core::{ProductId, SaleUnit};

/// Errors loading the catalog document.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Reading the catalog file failed.
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    /// The catalog document is not valid JSON.
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One sellable product as the catalog describes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogProduct {
    pub id: ProductId,
    pub name: String,
    /// Current tax-inclusive price per sale unit.
    pub current_price: Decimal,
    /// Stock on hand, in sale units (fractional for weighed/measured goods).
    pub available_stock: Decimal,
    pub sale_unit: SaleUnit,
}

/// In-memory product catalog keyed by product ID.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: HashMap<ProductId, CatalogProduct>,
}

impl Catalog {
    /// Build a catalog from a list of products.
    #[must_use]
    pub fn new(products: Vec<CatalogProduct>) -> Self {
        Self {
            products: products.into_iter().map(|p| (p.id, p)).collect(),
        }
    }

    /// Parse a catalog from a JSON array of products.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Parse`] if the document is malformed.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let products: Vec<CatalogProduct> = serde_json::from_str(json)?;
        Ok(Self::new(products))
    }

    /// Load a catalog from a JSON file on disk.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Look up a product by ID.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&CatalogProduct> {
        self.products.get(&id)
    }

    /// Number of products in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
