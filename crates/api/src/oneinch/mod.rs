//! 1inch DEX aggregator client.
//!
//! Every request targets `<api_url>/<chain_id>/<path>`; broadcasts go to the
//! transaction gateway at `<gateway_url>/<chain_id>/broadcast`. Calls are
//! independent round trips with no retry or caching.
//!
//! # Example
//!
//! ```rust,ignore
//! use feeds_api::{QuoteParams, SwapRouterClient};
//!
//! let router = SwapRouterClient::new(1);
//! let spender = router.get_contract_address().await?;
//! let quote = router.get_quote(&QuoteParams::new(usdc, weth, "1000000")).await?;
//! ```

mod types;

pub use types::{ApproveAmount, LiquiditySource, QuoteParams, SwapParams, Token, TransactionData};

use crate::config::{default_router_api_url, default_router_gateway_url, SwapRouterConfig};
use crate::error::{ApiError, Result};
use crate::http::{self, DEFAULT_TIMEOUT_MS};
use alloy::primitives::U256;
use reqwest::RequestBuilder;
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Client for a single chain of the DEX aggregator.
#[derive(Debug, Clone)]
pub struct SwapRouterClient {
    client: reqwest::Client,
    api_url: String,
    gateway_url: String,
    chain_id: u64,
    timeout: Duration,
}

impl SwapRouterClient {
    /// Create a client for `chain_id` against the public endpoints.
    pub fn new(chain_id: u64) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: default_router_api_url(),
            gateway_url: default_router_gateway_url(),
            chain_id,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }

    /// Create a client from the `[swap_router]` config section.
    pub fn from_config(config: &SwapRouterConfig) -> Self {
        Self::new(config.chain_id)
            .with_api_url(config.api_url.clone())
            .with_gateway_url(config.gateway_url.clone())
            .with_timeout(config.timeout())
    }

    /// Use a custom aggregator API root.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Use a custom transaction gateway root.
    pub fn with_gateway_url(mut self, gateway_url: impl Into<String>) -> Self {
        self.gateway_url = gateway_url.into();
        self
    }

    /// Set the per-request deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Chain this client targets, fixed at construction.
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}/{}", self.api_url.trim_end_matches('/'), self.chain_id, path)
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.client.get(self.endpoint(path)).timeout(self.timeout)
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Value> {
        http::send_json(&self.client, request).await
    }

    /// Build swap calldata. `params` is passed through as query parameters;
    /// returns the `tx` object of the response.
    #[instrument(skip(self, params), fields(chain_id = self.chain_id))]
    pub async fn get_swap_transaction_data<P>(&self, params: &P) -> Result<Value>
    where
        P: Serialize + ?Sized,
    {
        let body = self.execute(self.get("swap").query(params)).await?;
        Ok(http::field(&body, "tx")?.clone())
    }

    /// Typed variant of [`Self::get_swap_transaction_data`].
    pub async fn get_swap_transaction(&self, params: &SwapParams) -> Result<TransactionData> {
        let tx = self.get_swap_transaction_data(params).await?;
        Ok(TransactionData::from_value(&tx))
    }

    /// Fetch a quote. Returns the full response body.
    #[instrument(skip(self, params), fields(chain_id = self.chain_id))]
    pub async fn get_quote<P>(&self, params: &P) -> Result<Value>
    where
        P: Serialize + ?Sized,
    {
        self.execute(self.get("quote").query(params)).await
    }

    /// `true` when the healthcheck succeeds; any failure is an error.
    #[instrument(skip(self), fields(chain_id = self.chain_id))]
    pub async fn get_health_status(&self) -> Result<bool> {
        self.execute(self.get("healthcheck")).await?;
        Ok(true)
    }

    /// Address of the spender contract that approvals must target.
    #[instrument(skip(self), fields(chain_id = self.chain_id))]
    pub async fn get_contract_address(&self) -> Result<String> {
        let body = self.execute(self.get("approve/spender")).await?;
        let address = http::field(&body, "address")?
            .as_str()
            .ok_or_else(|| ApiError::Decode("spender `address` is not a string".to_string()))?;

        debug!(address, "Got spender address");
        Ok(address.to_string())
    }

    /// Supported tokens, in the order the upstream mapping lists them.
    #[instrument(skip(self), fields(chain_id = self.chain_id))]
    pub async fn get_supported_tokens(&self) -> Result<Vec<Token>> {
        let body = self.execute(self.get("tokens")).await?;
        let tokens: Vec<Token> = http::field(&body, "tokens")?
            .as_object()
            .ok_or_else(|| ApiError::Decode("`tokens` is not an object".to_string()))?
            .values()
            .map(Token::from_value)
            .collect();

        info!(count = tokens.len(), "Fetched supported tokens");
        Ok(tokens)
    }

    /// Amount of `token_address` that `wallet_address` has approved for the spender.
    #[instrument(skip(self), fields(chain_id = self.chain_id))]
    pub async fn get_approved_allowance(
        &self,
        token_address: &str,
        wallet_address: &str,
    ) -> Result<U256> {
        let request = self.get("approve/allowance").query(&[
            ("tokenAddress", token_address),
            ("walletAddress", wallet_address),
        ]);
        let body = self.execute(request).await?;
        let allowance = parse_allowance(http::field(&body, "allowance")?)?;

        debug!(%allowance, "Got allowance");
        Ok(allowance)
    }

    /// Build approve calldata. An `amount` of `"-1"` omits the amount
    /// parameter, requesting the aggregator's default (unlimited) approval.
    #[instrument(skip(self), fields(chain_id = self.chain_id))]
    pub async fn get_approve_transaction_data(
        &self,
        token_address: &str,
        amount: &str,
    ) -> Result<Value> {
        let mut query = vec![("tokenAddress", token_address)];
        if amount != ApproveAmount::UNLIMITED_SENTINEL {
            query.push(("amount", amount));
        }

        self.execute(self.get("approve/transaction").query(&query)).await
    }

    /// Typed variant of [`Self::get_approve_transaction_data`].
    pub async fn get_approve_transaction(
        &self,
        token_address: &str,
        amount: ApproveAmount,
    ) -> Result<TransactionData> {
        let body = self
            .get_approve_transaction_data(token_address, &amount.to_string())
            .await?;
        Ok(TransactionData::from_value(&body))
    }

    /// Submit a signed raw transaction. Not idempotent: every call resubmits.
    ///
    /// Returns the transaction hash, or an empty string when the gateway
    /// does not report one.
    #[instrument(skip(self, raw_transaction), fields(chain_id = self.chain_id))]
    pub async fn broadcast_raw_transaction(&self, raw_transaction: &str) -> Result<String> {
        let url = format!(
            "{}/{}/broadcast",
            self.gateway_url.trim_end_matches('/'),
            self.chain_id
        );
        let request = self
            .client
            .post(url)
            .json(&json!({ "rawTransaction": raw_transaction }))
            .timeout(self.timeout);

        let body = self.execute(request).await?;
        let hash = body
            .get("transactionHash")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        info!(tx_hash = %hash, "Broadcast raw transaction");
        Ok(hash)
    }

    /// Protocols the aggregator can route through on this chain.
    #[instrument(skip(self), fields(chain_id = self.chain_id))]
    pub async fn get_liquidity_sources(&self) -> Result<Vec<LiquiditySource>> {
        let body = self.execute(self.get("liquidity-sources")).await?;
        let sources = http::field(&body, "protocols")?
            .as_array()
            .ok_or_else(|| ApiError::Decode("`protocols` is not a list".to_string()))?
            .iter()
            .map(LiquiditySource::from_value)
            .collect();
        Ok(sources)
    }

    /// Routing presets. Returns the full response body.
    #[instrument(skip(self), fields(chain_id = self.chain_id))]
    pub async fn get_presets(&self) -> Result<Value> {
        self.execute(self.get("presets")).await
    }
}

/// Decimal or `0x` hex string, or a JSON integer.
fn parse_allowance(value: &Value) -> Result<U256> {
    match value {
        Value::String(s) => s
            .trim()
            .parse::<U256>()
            .map_err(|e| ApiError::Decode(format!("invalid allowance {s:?}: {e}"))),
        Value::Number(n) => n
            .as_u64()
            .map(U256::from)
            .ok_or_else(|| ApiError::Decode(format!("invalid allowance {n}"))),
        other => Err(ApiError::Decode(format!("invalid allowance {other}"))),
    }
}
