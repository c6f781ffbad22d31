//! Metadata API client.
//!
//! Fetches token metadata over HTTP with a per-client deadline. The base
//! URL and timeout are configurable directly or via environment variables.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use tokenlens_core::error::{Result, TokenLensError};
use tokenlens_core::traits::MetadataSource;
use tokenlens_core::types::TokenMetadata;
use tokenlens_core::{DEFAULT_API_URL, DEFAULT_TIMEOUT_MS, ENV_API_URL, ENV_TIMEOUT_MS};

/// Metadata client configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the metadata API
    pub api_url: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl ClientConfig {
    /// Creates a configuration with the given API base URL.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            ..Default::default()
        }
    }

    /// Sets the request timeout in milliseconds.
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Builds a configuration from the environment.
    ///
    /// Honors `TOKENLENS_API_URL` and `TOKENLENS_TIMEOUT_MS`; anything
    /// unset falls back to the defaults.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Ok(url) = std::env::var(ENV_API_URL) {
            if !url.trim().is_empty() {
                config.api_url = url;
            }
        }
        if let Ok(ms) = std::env::var(ENV_TIMEOUT_MS) {
            config.timeout_ms = ms.parse().map_err(|_| {
                TokenLensError::Config(format!("{} must be an integer, got '{}'", ENV_TIMEOUT_MS, ms))
            })?;
        }
        Ok(config)
    }
}

/// HTTP client for the token metadata API.
pub struct MetadataClient {
    config: ClientConfig,
    http_client: reqwest::Client,
}

impl MetadataClient {
    /// Creates a client with default configuration.
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    /// Creates a client with custom configuration.
    pub fn with_config(config: ClientConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            config,
            http_client,
        }
    }

    /// Returns the configured API base URL.
    pub fn api_url(&self) -> &str {
        &self.config.api_url
    }

    /// Fetches metadata for a token by its address.
    ///
    /// # Returns
    ///
    /// The metadata record, or `None` if the API confirms the token does
    /// not exist (HTTP 404).
    ///
    /// # Errors
    ///
    /// `Validation` for an empty address, `Timeout` when the configured
    /// deadline is exceeded, `UnexpectedStatus` for non-success statuses
    /// other than 404, and `Http` for other transport failures.
    #[instrument(skip(self))]
    pub async fn get_token_metadata(&self, address: &str) -> Result<Option<TokenMetadata>> {
        let address = address.trim();
        if address.is_empty() {
            return Err(TokenLensError::Validation(
                "token address is required".into(),
            ));
        }

        let url = format!(
            "{}/tokens/{}",
            self.config.api_url.trim_end_matches('/'),
            address
        );

        let response = self
            .http_client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            debug!(address, "Token not found");
            return Ok(None);
        }
        if !status.is_success() {
            debug!(address, status = status.as_u16(), "Unexpected API status");
            return Err(TokenLensError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        let metadata: TokenMetadata = response
            .json()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        debug!(address, "Fetched token metadata");
        Ok(Some(metadata))
    }

    /// Splits reqwest's single error type into the deadline vs. transport
    /// variants callers are expected to distinguish.
    fn map_transport_error(&self, e: reqwest::Error) -> TokenLensError {
        if e.is_timeout() {
            TokenLensError::Timeout {
                ms: self.config.timeout_ms,
            }
        } else {
            TokenLensError::Http(e.to_string())
        }
    }
}

impl Default for MetadataClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MetadataSource for MetadataClient {
    async fn token_metadata(&self, address: &str) -> Result<Option<TokenMetadata>> {
        self.get_token_metadata(address).await
    }
}
