//! The transport seam and its reqwest implementation.
//!
//! Works with any OpenAI-compatible `/v1/chat/completions` endpoint: cloud
//! providers as well as llama.cpp/Ollama-style local servers. The transport
//! enforces the per-request timeout the core loop deliberately has no notion
//! of.

use async_trait::async_trait;
use tracing::{debug, warn};

use scenepilot_config::AppConfig;
use scenepilot_core::error::{Error, ProtocolError};

use crate::codec::ChatRequest;

/// The seam between the orchestration loop and the network.
///
/// Returns raw response bytes so the codec stays the single decode point.
/// Test doubles script this trait instead of standing up an HTTP server.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send(&self, request: &ChatRequest) -> Result<Vec<u8>, ProtocolError>;
}

/// HTTP transport over reqwest with bearer auth and an explicit timeout.
#[derive(Debug)]
pub struct HttpTransport {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a transport from configuration.
    ///
    /// A missing API key fails fast here, before any request is sent. Local
    /// servers that ignore auth still take a placeholder key.
    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                Error::Config(
                    "api_key is not configured (set it in config.toml or SCENEPILOT_API_KEY)"
                        .into(),
                )
            })?;

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| Error::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn send(&self, request: &ChatRequest) -> Result<Vec<u8>, ProtocolError> {
        let url = format!("{}/chat/completions", self.base_url);

        debug!(model = %request.model, messages = request.messages.len(), "Sending chat request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProtocolError::Timeout(e.to_string())
                } else {
                    ProtocolError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();

        if status == 429 {
            return Err(ProtocolError::RateLimited { retry_after_secs: 5 });
        }

        if status == 401 || status == 403 {
            return Err(ProtocolError::AuthenticationFailed(
                "Invalid API key or insufficient permissions".into(),
            ));
        }

        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Backend returned error");
            return Err(ProtocolError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ProtocolError::Network(e.to_string()))?;

        Ok(bytes.to_vec())
    }
}
