//! API key verification against the Unbound models endpoint

use crate::config::VERIFY_TIMEOUT_SECS;
use crate::error::Result;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// Shape of a successful models response.
///
/// The acceptance policy is deliberately lenient: besides a proper model
/// list, any non-empty array or object counts as proof of a working key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// Object with a non-empty `data` array
    ModelList(usize),
    /// Object whose `data` key is empty or not an array
    EmptyModelList,
    /// Non-empty top-level array
    Array(usize),
    /// Any other non-empty object
    Object,
    /// Empty object or array, null, or a scalar
    Empty,
}

impl ResponseShape {
    #[must_use]
    pub fn classify(body: &Value) -> Self {
        match body {
            Value::Object(map) if map.contains_key("data") => match map.get("data") {
                Some(Value::Array(models)) if !models.is_empty() => Self::ModelList(models.len()),
                _ => Self::EmptyModelList,
            },
            Value::Object(map) if !map.is_empty() => Self::Object,
            Value::Array(items) if !items.is_empty() => Self::Array(items.len()),
            _ => Self::Empty,
        }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        matches!(self, Self::ModelList(_) | Self::Array(_) | Self::Object)
    }
}

/// Result of a single verification attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    /// 200 with an accepted body
    Valid(ResponseShape),
    /// Nothing to verify; no request was made
    EmptyKey,
    /// Non-200 status, with the server's error message when it sent one
    Rejected { status: u16, message: Option<String> },
    /// 200 but the body shape was not accepted
    UnexpectedBody(ResponseShape),
    /// 200 but the body was not JSON
    MalformedBody(String),
    /// Request never completed
    Network(String),
}

impl Verification {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Verifies API keys with one bounded GET per call. No retries.
#[derive(Debug, Clone)]
pub struct ApiKeyVerifier {
    client: reqwest::Client,
    models_url: String,
    timeout: Duration,
}

impl ApiKeyVerifier {
    pub fn new(models_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(models_url, Duration::from_secs(VERIFY_TIMEOUT_SECS))
    }

    /// Same as [`ApiKeyVerifier::new`] with a custom total request timeout
    pub fn with_timeout(models_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            models_url: models_url.into(),
            timeout,
        })
    }

    /// Check `api_key` against the models endpoint
    pub async fn verify(&self, api_key: &str) -> Verification {
        if api_key.is_empty() {
            return Verification::EmptyKey;
        }

        tracing::debug!(url = %self.models_url, "verifying API key");

        let response = match self
            .client
            .get(&self.models_url)
            .header("Authorization", format!("Bearer {api_key}"))
            .header("Content-Type", "application/json")
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return Verification::Network(describe_network_error(&e, self.timeout)),
        };

        let status = response.status();
        tracing::debug!(%status, "models endpoint responded");

        if status != StatusCode::OK {
            // Error bodies are best-effort; anything unexpected is ignored
            let message = response
                .text()
                .await
                .ok()
                .and_then(|text| serde_json::from_str::<ErrorEnvelope>(&text).ok())
                .map(|envelope| envelope.error.message);

            return Verification::Rejected {
                status: status.as_u16(),
                message,
            };
        }

        match response.json::<Value>().await {
            Ok(body) => {
                let shape = ResponseShape::classify(&body);
                tracing::debug!(?shape, "classified models response");
                if shape.is_valid() {
                    Verification::Valid(shape)
                } else {
                    Verification::UnexpectedBody(shape)
                }
            }
            Err(e) => Verification::MalformedBody(e.to_string()),
        }
    }
}

fn describe_network_error(e: &reqwest::Error, timeout: Duration) -> String {
    if e.is_timeout() {
        format!("Request timed out after {timeout:?}. Check your network connection.")
    } else if e.is_connect() {
        "Could not connect to the Unbound API. Check network/firewall settings.".to_string()
    } else {
        format!("Network error: {e}")
    }
}
