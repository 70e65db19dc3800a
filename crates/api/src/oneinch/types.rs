//! Request and response types for the DEX aggregator API.

use alloy::primitives::U256;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Token supported by the aggregator on a given chain.
///
/// Every field is always populated; missing upstream values become an empty
/// string or zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub id: String,
    pub name: String,
    pub decimals: u32,
    pub symbol: String,
    pub address: String,
}

impl Token {
    /// Normalize an untyped upstream token record.
    pub fn from_value(value: &Value) -> Self {
        Self {
            id: string_field(value, "id"),
            name: string_field(value, "name"),
            decimals: value.get("decimals").map(decimals_from).unwrap_or(0),
            symbol: string_field(value, "symbol"),
            address: string_field(value, "address"),
        }
    }
}

fn decimals_from(value: &Value) -> u32 {
    match value {
        Value::Number(n) => n.as_u64().and_then(|d| u32::try_from(d).ok()).unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

/// Liquidity source (protocol) the aggregator routes through.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquiditySource {
    pub id: String,
    pub title: String,
    /// Logo URL
    pub img: String,
}

impl LiquiditySource {
    pub fn from_value(value: &Value) -> Self {
        Self {
            id: string_field(value, "id"),
            title: string_field(value, "title"),
            img: string_field(value, "img"),
        }
    }
}

/// Transaction fields returned by the swap and approve endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionData {
    pub from: String,
    pub to: String,
    /// Hex calldata
    pub data: String,
    /// Native value in wei
    pub value: String,
    pub gas_price: String,
    pub gas: String,
}

impl TransactionData {
    /// Typed view of a transaction object. Numbers are kept as decimal strings.
    pub fn from_value(value: &Value) -> Self {
        Self {
            from: string_field(value, "from"),
            to: string_field(value, "to"),
            data: string_field(value, "data"),
            value: string_field(value, "value"),
            gas_price: string_field(value, "gasPrice"),
            gas: string_field(value, "gas"),
        }
    }
}

/// Query parameters for the swap endpoint.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapParams {
    pub from_token_address: String,
    pub to_token_address: String,
    /// Raw amount, in the source token's smallest unit
    pub amount: String,
    /// Address that sends the swap transaction
    pub from_address: String,
    /// Slippage tolerance in percent (e.g. 1.0 = 1%)
    pub slippage: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dest_receiver: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocols: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_limit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complexity_level: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connector_tokens: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_route_parts: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parts: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_partial_fill: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_estimate: Option<bool>,
}

impl SwapParams {
    pub fn new(
        from_token_address: impl Into<String>,
        to_token_address: impl Into<String>,
        amount: impl Into<String>,
        from_address: impl Into<String>,
        slippage: f64,
    ) -> Self {
        Self {
            from_token_address: from_token_address.into(),
            to_token_address: to_token_address.into(),
            amount: amount.into(),
            from_address: from_address.into(),
            slippage,
            ..Default::default()
        }
    }

    /// Send the output tokens to a different address.
    pub fn with_dest_receiver(mut self, receiver: impl Into<String>) -> Self {
        self.dest_receiver = Some(receiver.into());
        self
    }

    /// Restrict routing to a comma-separated list of protocols.
    pub fn with_protocols(mut self, protocols: impl Into<String>) -> Self {
        self.protocols = Some(protocols.into());
        self
    }

    pub fn with_gas_price(mut self, gas_price: impl Into<String>) -> Self {
        self.gas_price = Some(gas_price.into());
        self
    }

    /// Skip the aggregator's balance/allowance estimation.
    pub fn with_disable_estimate(mut self, disable: bool) -> Self {
        self.disable_estimate = Some(disable);
        self
    }
}

/// Query parameters for the quote endpoint.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteParams {
    pub from_token_address: String,
    pub to_token_address: String,
    pub amount: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocols: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complexity_level: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connector_tokens: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_route_parts: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parts: Option<u64>,
}

impl QuoteParams {
    pub fn new(
        from_token_address: impl Into<String>,
        to_token_address: impl Into<String>,
        amount: impl Into<String>,
    ) -> Self {
        Self {
            from_token_address: from_token_address.into(),
            to_token_address: to_token_address.into(),
            amount: amount.into(),
            ..Default::default()
        }
    }

    pub fn with_protocols(mut self, protocols: impl Into<String>) -> Self {
        self.protocols = Some(protocols.into());
        self
    }
}

/// Approval amount for the approve-transaction endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApproveAmount {
    /// Let the aggregator pick its default (infinite) approval.
    Unlimited,
    /// Approve exactly this raw amount.
    Exact(U256),
}

impl ApproveAmount {
    /// Sentinel understood by `get_approve_transaction_data` as "omit amount".
    pub const UNLIMITED_SENTINEL: &'static str = "-1";
}

impl fmt::Display for ApproveAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unlimited => f.write_str(Self::UNLIMITED_SENTINEL),
            Self::Exact(amount) => write!(f, "{amount}"),
        }
    }
}

/// String-valued field; numbers are rendered, anything else is empty.
fn string_field(value: &Value, key: &str) -> String {
    match value.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}
