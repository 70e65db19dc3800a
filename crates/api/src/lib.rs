//! Thin clients for external market-data and DEX APIs.
//!
//! This crate provides HTTP clients for:
//! - Alternative.me: crypto fear & greed index
//! - Kraken: public ticker ask prices
//! - 1inch: swap/quote construction, approvals and transaction broadcast
//!
//! Each operation is a single stateless request. Failures are reported as
//! [`ApiError`], which keeps upstream error bodies intact.

mod alternative;
pub mod config;
mod error;
mod http;
mod kraken;
mod oneinch;

pub use alternative::{SentimentClient, SentimentReading};
pub use config::{FeedsConfig, SentimentConfig, SwapRouterConfig, TickerConfig};
pub use error::{ApiError, Result};
pub use kraken::TickerClient;
pub use oneinch::{
    ApproveAmount, LiquiditySource, QuoteParams, SwapParams, SwapRouterClient, Token,
    TransactionData,
};

/// Re-exported so callers can name allowance values without a direct alloy dependency.
pub use alloy::primitives::U256;
