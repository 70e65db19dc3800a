//! Error type shared by all provider clients.

use serde_json::Value;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Failure of a single provider call.
///
/// Upstream bodies are kept verbatim so callers can inspect whatever
/// shape the provider chose for its error payload.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Non-2xx response that carried a body.
    #[error("upstream error (status {status}): {body}")]
    Upstream { status: u16, body: Value },

    /// No usable response: connect failure, timeout, or an empty error body.
    #[error("request failed: {0}")]
    Transport(String),

    /// 2xx response whose payload embeds an application-level error.
    #[error("application error: {0}")]
    Application(Value),

    /// An expected key or list entry is missing from the response.
    #[error("not found: {0}")]
    NotFound(String),

    /// The response body or one of its fields has an unexpected shape.
    #[error("decode error: {0}")]
    Decode(String),

    /// The request could not be built (e.g. a parameter bag that does not
    /// serialize to a flat query string). Nothing was sent.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Configuration could not be read or parsed.
    #[error("config error: {0}")]
    Config(String),
}

impl ApiError {
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Upstream { .. })
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Upstream body, if this error came from a non-2xx response.
    pub fn upstream_body(&self) -> Option<&Value> {
        match self {
            Self::Upstream { body, .. } => Some(body),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            Self::InvalidRequest(err.to_string())
        } else if err.is_timeout() {
            Self::Transport(format!("timed out: {err}"))
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}
