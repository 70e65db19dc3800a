//! Request execution and response classification shared by the clients.

use crate::error::{ApiError, Result};
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use tracing::{debug, warn};

/// Default per-request deadline for every provider.
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Execute a request and return its JSON body.
///
/// Non-2xx responses with a body become [`ApiError::Upstream`] carrying that
/// body; everything without a usable response becomes [`ApiError::Transport`].
/// A 2xx body that is not JSON is returned as a JSON string, and an empty one
/// as `Value::Null`.
pub(crate) async fn send_json(client: &Client, builder: RequestBuilder) -> Result<Value> {
    let request = builder.build()?;
    let method = request.method().clone();
    let url = request.url().clone();

    debug!(%method, %url, "Sending request");

    let response = client.execute(request).await.map_err(|e| {
        warn!(%method, %url, error = %e, "Request failed without a response");
        ApiError::from(e)
    })?;

    let status = response.status();
    let bytes = response.bytes().await?;
    let body = parse_body(&bytes);

    if !status.is_success() {
        return match body {
            Some(body) => {
                warn!(%url, status = status.as_u16(), %body, "Upstream returned an error");
                Err(ApiError::Upstream {
                    status: status.as_u16(),
                    body,
                })
            }
            None => {
                warn!(%url, status = status.as_u16(), "Upstream returned an empty error body");
                Err(ApiError::Transport(format!("status {status} with empty body")))
            }
        };
    }

    debug!(%url, status = status.as_u16(), bytes = bytes.len(), "Got response");
    Ok(body.unwrap_or(Value::Null))
}

/// JSON if it parses, the raw text otherwise, `None` when blank.
fn parse_body(bytes: &[u8]) -> Option<Value> {
    let text = String::from_utf8_lossy(bytes);
    if text.trim().is_empty() {
        return None;
    }
    Some(serde_json::from_str::<Value>(&text).unwrap_or_else(|_| Value::String(text.into_owned())))
}

/// Look up `key` in a JSON object. A body that is not an object (e.g. a
/// non-JSON page wrapped as a string) is a decode error.
pub(crate) fn field<'a>(body: &'a Value, key: &str) -> Result<&'a Value> {
    let object = body
        .as_object()
        .ok_or_else(|| ApiError::Decode(format!("expected a JSON object with `{key}`, got {body}")))?;
    object
        .get(key)
        .ok_or_else(|| ApiError::NotFound(format!("`{key}` missing from response")))
}

/// Numeric conversion accepting both JSON numbers and numeric strings.
pub(crate) fn to_f64(value: &Value) -> Result<f64> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| ApiError::Decode(format!("number out of range: {n}"))),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| ApiError::Decode(format!("not a number: {s:?}"))),
        other => Err(ApiError::Decode(format!("expected a number, got {other}"))),
    }
}
