//! Sales Submission API client.
//!
//! Checkout hands a finished sale to an external backend over HTTP. The POS
//! screen never talks to that backend directly: everything goes through the
//! [`SalesApi`] trait so the checkout flow can be exercised against a mock.

use std::sync::Arc;

use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use caja_core::{ClientId, ProductId, SaleId};

use crate::cart::SaleChannel;
use crate::config::SalesApiConfig;

/// Errors talking to the sales backend.
#[derive(Debug, Error)]
pub enum SalesApiError {
    /// The backend reached us but declined the sale.
    #[error("sale rejected: {0}")]
    Rejected(String),

    /// The backend reported success without a sale ID.
    #[error("sales server returned an incomplete response")]
    IncompleteResponse,

    /// The response body was not the expected JSON.
    #[error("failed to parse sales response: {0}")]
    Parse(#[from] serde_json::Error),

    /// The request never completed.
    #[error("sales request failed: {0}")]
    Network(#[from] reqwest::Error),
}

/// One line of a submitted sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRequestLine {
    pub product_id: ProductId,
    pub quantity: Decimal,
    /// Tax-inclusive unit price, before discount.
    pub unit_price: Decimal,
    pub discount_percent: Decimal,
}

/// The payload submitted at checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRequest {
    pub client_id: ClientId,
    pub sale_channel: SaleChannel,
    pub amount_tendered: Decimal,
    pub lines: Vec<SaleRequestLine>,
}

/// Raw response body from the sales backend.
#[derive(Debug, Clone, Deserialize)]
struct SaleResponseBody {
    success: bool,
    sale_id: Option<SaleId>,
    folio: Option<String>,
    message: Option<String>,
}

/// A confirmed sale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleReceipt {
    pub sale_id: SaleId,
    /// Fiscal document number, when the backend issued one.
    pub folio: Option<String>,
}

/// Abstraction over the sales backend.
pub trait SalesApi {
    /// Submit a completed sale.
    fn submit(
        &self,
        request: SaleRequest,
    ) -> impl Future<Output = Result<SaleReceipt, SalesApiError>> + Send;
}

// =============================================================================
// HttpSalesClient
// =============================================================================

/// `reqwest`-backed client for the sales backend.
#[derive(Clone)]
pub struct HttpSalesClient {
    inner: Arc<HttpSalesClientInner>,
}

struct HttpSalesClientInner {
    client: reqwest::Client,
    endpoint: String,
    token: Option<SecretString>,
}

impl HttpSalesClient {
    /// Create a client from the sales section of the config.
    #[must_use]
    pub fn new(config: &SalesApiConfig) -> Self {
        Self {
            inner: Arc::new(HttpSalesClientInner {
                client: reqwest::Client::new(),
                endpoint: config.url.clone(),
                token: config.token.clone(),
            }),
        }
    }
}

impl SalesApi for HttpSalesClient {
    #[instrument(skip(self, request), fields(lines = request.lines.len()))]
    async fn submit(&self, request: SaleRequest) -> Result<SaleReceipt, SalesApiError> {
        let mut builder = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .json(&request);
        if let Some(token) = &self.inner.token {
            builder = builder.bearer_auth(token.expose_secret());
        }

        let response = builder.send().await?;
        let status = response.status();

        // Read the body as text first so non-JSON error pages still produce
        // a useful Parse error instead of a bare decode failure.
        let text = response.text().await?;
        debug!(%status, "Sales backend responded");

        let body: SaleResponseBody = serde_json::from_str(&text)?;
        if !body.success {
            return Err(SalesApiError::Rejected(
                body.message
                    .unwrap_or_else(|| format!("sales server returned {status}")),
            ));
        }
        let Some(sale_id) = body.sale_id else {
            return Err(SalesApiError::IncompleteResponse);
        };
        Ok(SaleReceipt {
            sale_id,
            folio: body.folio,
        })
    }
}
