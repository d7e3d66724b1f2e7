//! POS configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CAJA_SALES_API_URL` - Endpoint sales are submitted to at checkout
//! - `CAJA_CATALOG_PATH` - Path to the product catalog JSON document
//!
//! ## Optional
//! - `CAJA_HOST` - Bind address (default: 127.0.0.1)
//! - `CAJA_PORT` - Listen port (default: 3000)
//! - `CAJA_SALES_API_TOKEN` - Bearer token for the sales backend

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// POS application configuration.
#[derive(Debug, Clone)]
pub struct PosConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Product catalog JSON document
    pub catalog_path: PathBuf,
    /// Sales backend configuration
    pub sales: SalesApiConfig,
}

/// Sales backend configuration.
///
/// Implements `Debug` manually to redact the bearer token.
#[derive(Clone)]
pub struct SalesApiConfig {
    /// Endpoint sales are POSTed to
    pub url: String,
    /// Optional bearer token
    pub token: Option<SecretString>,
}

impl std::fmt::Debug for SalesApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SalesApiConfig")
            .field("url", &self.url)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl PosConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("CAJA_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("CAJA_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("CAJA_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("CAJA_PORT".to_string(), e.to_string()))?;
        let catalog_path = PathBuf::from(get_required_env("CAJA_CATALOG_PATH")?);
        let sales = SalesApiConfig::from_env()?;

        Ok(Self {
            host,
            port,
            catalog_path,
            sales,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl SalesApiConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: get_required_env("CAJA_SALES_API_URL")?,
            token: get_optional_env("CAJA_SALES_API_TOKEN").map(SecretString::from),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
