//! Application state shared across handlers.

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::config::PosConfig;
use crate::sales::HttpSalesClient;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; holds the immutable catalog, the sales
/// backend client, and the loaded configuration. Per-session state (cart,
/// checkout flow) lives in the session store, not here.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: PosConfig,
    catalog: Catalog,
    sales: HttpSalesClient,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: PosConfig, catalog: Catalog) -> Self {
        let sales = HttpSalesClient::new(&config.sales);
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                sales,
            }),
        }
    }

    /// Get a reference to the POS configuration.
    #[must_use]
    pub fn config(&self) -> &PosConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the sales backend client.
    #[must_use]
    pub fn sales(&self) -> &HttpSalesClient {
        &self.inner.sales
    }
}
