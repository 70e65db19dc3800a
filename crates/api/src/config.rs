//! Provider endpoint configuration.
//!
//! Every section falls back to the public production endpoints, so an empty
//! (or absent) config file yields working clients.

use crate::error::{ApiError, Result};
use crate::http::DEFAULT_TIMEOUT_MS;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Top-level configuration for all provider clients.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedsConfig {
    /// Fear & greed index provider
    #[serde(default)]
    pub sentiment: SentimentConfig,

    /// Exchange ticker
    #[serde(default)]
    pub ticker: TickerConfig,

    /// DEX aggregator router
    #[serde(default)]
    pub swap_router: SwapRouterConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentConfig {
    #[serde(default = "default_sentiment_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickerConfig {
    #[serde(default = "default_ticker_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapRouterConfig {
    /// Aggregator REST API root (chain id is appended)
    #[serde(default = "default_router_api_url")]
    pub api_url: String,

    /// Transaction gateway root used for broadcasts (chain id is appended)
    #[serde(default = "default_router_gateway_url")]
    pub gateway_url: String,

    #[serde(default = "default_chain_id")]
    pub chain_id: u64,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

pub(crate) fn default_sentiment_url() -> String {
    "https://api.alternative.me/fng/".to_string()
}
pub(crate) fn default_ticker_url() -> String {
    "https://api.kraken.com/0/public/Ticker".to_string()
}
pub(crate) fn default_router_api_url() -> String {
    "https://api.1inch.io/v4.0".to_string()
}
pub(crate) fn default_router_gateway_url() -> String {
    "https://tx-gateway.1inch.io/v1.1".to_string()
}
fn default_chain_id() -> u64 {
    1
}
fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            base_url: default_sentiment_url(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            base_url: default_ticker_url(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl Default for SwapRouterConfig {
    fn default() -> Self {
        Self {
            api_url: default_router_api_url(),
            gateway_url: default_router_gateway_url(),
            chain_id: default_chain_id(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl SentimentConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl TickerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl SwapRouterConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl FeedsConfig {
    /// Parse a TOML document.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ApiError::Config(format!("invalid config: {e}")))
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ApiError::Config(format!("config file {path}: {e}")))?;
        Self::from_toml(&content)
    }

    /// Load from the file named by `FEEDS_CONFIG` (defaults when unset),
    /// then apply the `FEEDS_CHAIN_ID` override.
    pub fn from_env() -> Result<Self> {
        let mut config = match std::env::var("FEEDS_CONFIG") {
            Ok(path) => Self::from_file(&path)?,
            Err(_) => Self::default(),
        };

        if let Ok(chain_id) = std::env::var("FEEDS_CHAIN_ID") {
            config.override_chain_id(&chain_id)?;
        }

        Ok(config)
    }

    /// Replace the router chain id with a decimal string value.
    pub fn override_chain_id(&mut self, raw: &str) -> Result<()> {
        self.swap_router.chain_id = raw
            .trim()
            .parse()
            .map_err(|_| ApiError::Config(format!("invalid FEEDS_CHAIN_ID: {raw:?}")))?;
        Ok(())
    }

    /// Log the current configuration.
    pub fn log_config(&self) {
        tracing::info!(
            base_url = %self.sentiment.base_url,
            timeout_ms = self.sentiment.timeout_ms,
            "Sentiment provider"
        );
        tracing::info!(
            base_url = %self.ticker.base_url,
            timeout_ms = self.ticker.timeout_ms,
            "Ticker provider"
        );
        tracing::info!(
            api_url = %self.swap_router.api_url,
            gateway_url = %self.swap_router.gateway_url,
            chain_id = self.swap_router.chain_id,
            timeout_ms = self.swap_router.timeout_ms,
            "Swap router"
        );
    }
}
