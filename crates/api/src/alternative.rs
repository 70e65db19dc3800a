//! Alternative.me fear & greed index client.

use crate::config::{default_sentiment_url, SentimentConfig};
use crate::error::{ApiError, Result};
use crate::http::{self, DEFAULT_TIMEOUT_MS};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument};

/// A single fear & greed reading.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentReading {
    /// Index value (0 = extreme fear, 100 = extreme greed)
    pub fear_greed_index: f64,
    /// Text classification, e.g. "Extreme Fear"
    pub fear_greed_index_classification: String,
    /// Publication time reported by the provider, if any
    pub timestamp: Option<DateTime<Utc>>,
}

/// Client for the sentiment index provider.
#[derive(Debug, Clone)]
pub struct SentimentClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl SentimentClient {
    /// Create a client against the public endpoint.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: default_sentiment_url(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }

    /// Create a client from the `[sentiment]` config section.
    pub fn from_config(config: &SentimentConfig) -> Self {
        Self::new()
            .with_base_url(config.base_url.clone())
            .with_timeout(config.timeout())
    }

    /// Use a custom endpoint URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the per-request deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Fetch the latest fear & greed index.
    #[instrument(skip(self))]
    pub async fn get_crypto_fear_index(&self) -> Result<SentimentReading> {
        let request = self.client.get(&self.base_url).timeout(self.timeout);
        let body = http::send_json(&self.client, request).await?;

        let reading = parse_reading(&body)?;
        debug!(
            index = reading.fear_greed_index,
            classification = %reading.fear_greed_index_classification,
            "Got fear & greed index"
        );

        Ok(reading)
    }
}

impl Default for SentimentClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Reshape the provider body into a reading, using the first `data` entry.
fn parse_reading(body: &Value) -> Result<SentimentReading> {
    let entry = http::field(body, "data")?
        .as_array()
        .and_then(|data| data.first())
        .ok_or_else(|| ApiError::NotFound("sentiment data list is empty".to_string()))?;

    let fear_greed_index = http::to_f64(http::field(entry, "value")?)?;
    let fear_greed_index_classification = match http::field(entry, "value_classification")? {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };

    Ok(SentimentReading {
        fear_greed_index,
        fear_greed_index_classification,
        timestamp: entry.get("timestamp").and_then(parse_timestamp),
    })
}

/// Unix seconds, given as a string or a number.
fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    let secs = match value {
        Value::Number(n) => n.as_i64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    DateTime::from_timestamp(secs, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> SentimentClient {
        SentimentClient::new().with_base_url(format!("{}/fng/", server.uri()))
    }

    #[test]
    fn test_default_timeout() {
        assert_eq!(SentimentClient::new().timeout, Duration::from_millis(5000));
    }

    #[test]
    fn test_parse_reading_uses_first_entry() {
        let body = json!({
            "name": "Fear and Greed Index",
            "data": [
                {"value": "25", "value_classification": "Extreme Fear", "timestamp": "1700000000"},
                {"value": "60", "value_classification": "Greed", "timestamp": "1699913600"}
            ]
        });

        let reading = parse_reading(&body).unwrap();
        assert_eq!(reading.fear_greed_index, 25.0);
        assert_eq!(reading.fear_greed_index_classification, "Extreme Fear");
        assert_eq!(reading.timestamp.unwrap().timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_parse_reading_empty_data() {
        let err = parse_reading(&json!({"data": []})).unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn test_parse_reading_bad_value() {
        let body = json!({"data": [{"value": "n/a", "value_classification": "Neutral"}]});
        assert!(matches!(parse_reading(&body), Err(ApiError::Decode(_))));
    }

    #[test]
    fn test_timestamp_is_optional() {
        let body = json!({"data": [{"value": 50, "value_classification": "Neutral"}]});
        let reading = parse_reading(&body).unwrap();
        assert_eq!(reading.fear_greed_index, 50.0);
        assert!(reading.timestamp.is_none());
    }

    #[test]
    fn test_reading_serializes_camel_case() {
        let reading = SentimentReading {
            fear_greed_index: 71.0,
            fear_greed_index_classification: "Greed".into(),
            timestamp: None,
        };
        let value = serde_json::to_value(&reading).unwrap();
        assert_eq!(value["fearGreedIndex"], json!(71.0));
        assert_eq!(value["fearGreedIndexClassification"], json!("Greed"));
    }

    #[tokio::test]
    async fn test_get_crypto_fear_index() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/fng/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"value": "54", "value_classification": "Neutral", "timestamp": "1700000000"}],
                "metadata": {"error": null}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let reading = client_for(&server).get_crypto_fear_index().await.unwrap();
        assert_eq!(reading.fear_greed_index, 54.0);
        assert_eq!(reading.fear_greed_index_classification, "Neutral");
    }

    #[tokio::test]
    async fn test_upstream_body_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/fng/"))
            .respond_with(
                ResponseTemplate::new(503).set_body_json(json!({"metadata": {"error": "maintenance"}})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server).get_crypto_fear_index().await.unwrap_err();
        match err {
            ApiError::Upstream { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, json!({"metadata": {"error": "maintenance"}}));
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_error_status_without_body_is_generic() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = client_for(&server).get_crypto_fear_index().await.unwrap_err();
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_transport_failure() {
        let client = SentimentClient::new().with_base_url("http://127.0.0.1:1/fng/");
        let err = client.get_crypto_fear_index().await.unwrap_err();
        assert!(err.is_transport());
        assert!(err.upstream_body().is_none());
    }

    #[tokio::test]
    async fn test_timeout_rejects() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"data": [{"value": "1", "value_classification": "Extreme Fear"}]}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let client = client_for(&server).with_timeout(Duration::from_millis(50));
        let err = client.get_crypto_fear_index().await.unwrap_err();
        assert!(err.is_transport());
    }
}
