//! HTTP completion gateway for OpenAI-compatible endpoints

use super::error::GatewaySetupError;
use super::protocol::{ChatRequest, ChatResponse, ErrorEnvelope};
use async_trait::async_trait;
use consensus_application::ports::completion_gateway::{CompletionGateway, GatewayError};
use consensus_domain::{CompletionRequest, CompletionResult};
use reqwest::{Client, StatusCode, Url};
use std::time::{Duration, Instant};
use tracing::debug;

/// Maximum characters of an error body carried into `GatewayError::HttpStatus`
const MAX_ERROR_EXCERPT: usize = 200;

const USER_AGENT: &str = concat!("llm-consensus/", env!("CARGO_PKG_VERSION"));

/// Completion gateway speaking `POST {base_url}/chat/completions`
pub struct HttpCompletionGateway {
    client: Client,
    endpoint: Url,
    api_key: String,
}

impl HttpCompletionGateway {
    /// Create a gateway for `base_url` authenticated with `api_key`.
    ///
    /// `timeout` bounds the whole HTTP exchange at the client level; the
    /// batch fetcher applies its own per-request deadline on top.
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GatewaySetupError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(GatewaySetupError::MissingApiKey);
        }

        let endpoint = Self::endpoint_for(base_url)?;
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        debug!(endpoint = %endpoint, "HttpCompletionGateway initialized");

        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }

    /// Resolved `chat/completions` URL
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn endpoint_for(base_url: &str) -> Result<Url, GatewaySetupError> {
        let invalid = |reason: String| GatewaySetupError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason,
        };

        let trimmed = base_url.trim().trim_end_matches('/');
        let url = if trimmed.ends_with("/chat/completions") {
            trimmed.to_string()
        } else {
            format!("{trimmed}/chat/completions")
        };

        let parsed = Url::parse(&url).map_err(|e| invalid(e.to_string()))?;
        match parsed.scheme() {
            "http" | "https" => Ok(parsed),
            other => Err(invalid(format!("unsupported scheme '{other}'"))),
        }
    }

    fn map_transport_error(err: reqwest::Error) -> GatewayError {
        if err.is_timeout() {
            GatewayError::Timeout
        } else if err.is_connect() {
            GatewayError::ConnectionError(err.to_string())
        } else {
            GatewayError::RequestFailed(err.to_string())
        }
    }

    fn status_error(status: StatusCode, body: &str) -> GatewayError {
        let message = serde_json::from_str::<ErrorEnvelope>(body)
            .map(|envelope| envelope.error.message)
            .unwrap_or_else(|_| body.trim().to_string());

        let message = if message.chars().count() > MAX_ERROR_EXCERPT {
            let excerpt: String = message.chars().take(MAX_ERROR_EXCERPT).collect();
            format!("{excerpt}...")
        } else if message.is_empty() {
            status
                .canonical_reason()
                .unwrap_or("no response body")
                .to_string()
        } else {
            message
        };

        GatewayError::HttpStatus {
            status: status.as_u16(),
            message,
        }
    }
}

#[async_trait]
impl CompletionGateway for HttpCompletionGateway {
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResult, GatewayError> {
        let started = Instant::now();

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&ChatRequest::from(request))
            .send()
            .await
            .map_err(Self::map_transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(Self::map_transport_error)?;
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        if !status.is_success() {
            debug!(model = %request.model, status = status.as_u16(), "Gateway returned error status");
            return Err(Self::status_error(status, &body));
        }

        let parsed: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or(GatewayError::NoChoices)?;

        let mut result = CompletionResult::new(choice.message.content.unwrap_or_default(), elapsed_ms);
        if let Some(usage) = parsed.usage {
            result = result.with_usage(usage.into());
        }

        debug!(model = %request.model, elapsed_ms, "Completion received");
        Ok(result)
    }
}
