//! Market feeds
//!
//! One-shot binary that queries each provider once and logs the result:
//! - Fear & greed index
//! - Ask price for a ticker pair
//! - Swap router health, spender address and token count

use anyhow::Result;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use feeds_api::{FeedsConfig, SentimentClient, SwapRouterClient, TickerClient};

/// Environment variable names.
mod env {
    pub const PAIR: &str = "FEEDS_PAIR";
    pub const WALLET: &str = "FEEDS_WALLET";
    pub const TOKEN: &str = "FEEDS_TOKEN";
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,feeds_api=debug")),
        )
        .init();

    // FEEDS_CONFIG selects a TOML file, FEEDS_CHAIN_ID overrides the chain
    let config = FeedsConfig::from_env()?;
    config.log_config();

    let sentiment = SentimentClient::from_config(&config.sentiment);
    let ticker = TickerClient::from_config(&config.ticker);
    let router = SwapRouterClient::from_config(&config.swap_router);

    let pair = std::env::var(env::PAIR).unwrap_or_else(|_| "xbtusd".to_string());

    // Independent calls; one failing does not affect the others
    let (fear, price, health, spender, tokens) = tokio::join!(
        sentiment.get_crypto_fear_index(),
        ticker.get_coin_price(&pair),
        router.get_health_status(),
        router.get_contract_address(),
        router.get_supported_tokens(),
    );

    match fear {
        Ok(reading) => info!(
            index = reading.fear_greed_index,
            classification = %reading.fear_greed_index_classification,
            "Fear & greed"
        ),
        Err(e) => error!(error = %e, "Fear & greed request failed"),
    }

    match price {
        Ok(price) => info!(pair = %pair, price, "Ask price"),
        Err(e) => error!(pair = %pair, error = %e, "Ticker request failed"),
    }

    match health {
        Ok(healthy) => info!(chain_id = router.chain_id(), healthy, "Router health"),
        Err(e) => error!(chain_id = router.chain_id(), error = %e, "Router healthcheck failed"),
    }

    match spender {
        Ok(address) => info!(address = %address, "Router spender"),
        Err(e) => error!(error = %e, "Spender lookup failed"),
    }

    match tokens {
        Ok(tokens) => info!(count = tokens.len(), "Router tokens"),
        Err(e) => error!(error = %e, "Token listing failed"),
    }

    if let (Ok(wallet), Ok(token)) = (std::env::var(env::WALLET), std::env::var(env::TOKEN)) {
        match router.get_approved_allowance(&token, &wallet).await {
            Ok(allowance) => info!(token = %token, wallet = %wallet, %allowance, "Allowance"),
            Err(e) => error!(token = %token, error = %e, "Allowance lookup failed"),
        }
    }

    Ok(())
}
