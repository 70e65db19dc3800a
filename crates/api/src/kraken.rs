//! Kraken public ticker client.

use crate::config::{default_ticker_url, TickerConfig};
use crate::error::{ApiError, Result};
use crate::http::{self, DEFAULT_TIMEOUT_MS};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Client for the exchange's public ticker endpoint.
#[derive(Debug, Clone)]
pub struct TickerClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl TickerClient {
    /// Create a client against the public ticker endpoint.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: default_ticker_url(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }

    /// Create a client from the `[ticker]` config section.
    pub fn from_config(config: &TickerConfig) -> Self {
        Self::new()
            .with_base_url(config.base_url.clone())
            .with_timeout(config.timeout())
    }

    /// Use a custom ticker URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the per-request deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Current ask price for `pair` (e.g. "xbtusd"), in the quote currency.
    ///
    /// An embedded `error` list wins over any price in the same payload.
    #[instrument(skip(self))]
    pub async fn get_coin_price(&self, pair: &str) -> Result<f64> {
        let request = self
            .client
            .get(&self.base_url)
            .query(&[("pair", pair)])
            .timeout(self.timeout);
        let body = http::send_json(&self.client, request).await?;

        let price = parse_ask_price(&body, pair)?;
        debug!(pair, price, "Got ask price");

        Ok(price)
    }
}

impl Default for TickerClient {
    fn default() -> Self {
        Self::new()
    }
}

/// First element of `result[PAIR].a`, after checking the `error` list.
fn parse_ask_price(body: &Value, pair: &str) -> Result<f64> {
    if let Some(first) = body
        .get("error")
        .and_then(Value::as_array)
        .and_then(|errors| errors.first())
    {
        warn!(pair, error = %first, "Ticker returned an application error");
        return Err(ApiError::Application(first.clone()));
    }

    let symbol = pair.to_uppercase();
    let ask = http::field(body, "result")?
        .get(&symbol)
        .ok_or_else(|| ApiError::NotFound(format!("pair {symbol} not in ticker result")))?
        .get("a")
        .and_then(Value::as_array)
        .and_then(|ask| ask.first())
        .ok_or_else(|| ApiError::NotFound(format!("no ask price for {symbol}")))?;

    http::to_f64(ask)
}
