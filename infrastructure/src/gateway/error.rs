//! Error types for constructing the HTTP gateway

use thiserror::Error;

/// Errors raised while building an [`HttpCompletionGateway`](super::HttpCompletionGateway)
#[derive(Error, Debug)]
pub enum GatewaySetupError {
    #[error("API key is empty")]
    MissingApiKey,

    #[error("Invalid gateway base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
