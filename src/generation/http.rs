//! HTTP generation client.
//!
//! Talks to a single `POST` endpoint that answers with one JSON document,
//! usually `{"reply": "..."}`. The one-shot answer is adapted to the chunk
//! sequence expected by [`GenerationClient`] by sending it as a single chunk.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::mpsc::Sender;

use crate::core::config::ResolvedConfig;
use crate::generation::{GenerationClient, GenerationError};

/// Header understood by ngrok-style tunnels; skips the interstitial warning page.
pub const TUNNEL_BYPASS_HEADER: &str = "ngrok-skip-browser-warning";

/// The request body: `{"prompt": "..."}`.
#[derive(Serialize, Debug)]
struct GenerateRequest<'a> {
    prompt: &'a str,
}

/// JavaScript-style truthiness, used to decide whether `reply` is usable.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Extracts the reply text from a response body.
///
/// Prefers a truthy `reply` field. Falls back to the body itself when it is a
/// JSON string, and to the serialized body for any other shape.
pub fn reply_text(body: &Value) -> String {
    let chosen = body.get("reply").filter(|r| is_truthy(r)).unwrap_or(body);
    match chosen {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Generation client backed by a single HTTP endpoint.
pub struct HttpGenerationClient {
    endpoint: String,
    bypass_tunnel_warning: bool,
    timeout: Option<Duration>,
    client: reqwest::Client,
}

impl HttpGenerationClient {
    /// Creates a client for `endpoint` with the tunnel bypass header enabled
    /// and no request timeout.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            bypass_tunnel_warning: true,
            timeout: None,
            client: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &ResolvedConfig) -> Self {
        Self::new(config.endpoint.clone())
            .with_tunnel_bypass(config.bypass_tunnel_warning)
            .with_timeout(config.timeout)
    }

    pub fn with_tunnel_bypass(mut self, enabled: bool) -> Self {
        self.bypass_tunnel_warning = enabled;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends the request and returns the raw body of a successful response.
    async fn fetch_body(&self, prompt: &str) -> Result<String, GenerationError> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(&GenerateRequest { prompt });

        if self.bypass_tunnel_warning {
            request = request.header(TUNNEL_BYPASS_HEADER, "true");
        }
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .await
            .map_err(|e| GenerationError::Network(e.to_string()))?;

        debug!("Generation endpoint status: {}", response.status());

        if !response.status().is_success() {
            let status = response.status();
            let reason = status.canonical_reason().unwrap_or("").to_string();
            warn!("Generation endpoint error: {} {}", status.as_u16(), reason);
            return Err(GenerationError::Backend {
                status: status.as_u16(),
                reason,
            });
        }

        response
            .text()
            .await
            .map_err(|e| GenerationError::Network(e.to_string()))
    }
}

#[async_trait]
impl GenerationClient for HttpGenerationClient {
    fn name(&self) -> &str {
        "http"
    }

    async fn generate(&self, prompt: &str, sender: Sender<String>) -> Result<(), GenerationError> {
        info!(
            "Generation request: endpoint={}, prompt_len={}",
            self.endpoint,
            prompt.len()
        );

        let body = self.fetch_body(prompt).await?;

        let reply = match serde_json::from_str::<Value>(&body) {
            Ok(json) => reply_text(&json),
            Err(e) => {
                warn!("Response body is not JSON ({e}), using raw text");
                body
            }
        };

        debug!("Sending reply chunk (len={})", reply.len());
        if sender.send(reply).await.is_err() {
            warn!("Reply chunk send failed: receiver dropped");
            return Err(GenerationError::ChannelClosed);
        }

        info!("Generation complete");
        Ok(())
    }
}
