//! Completion gateway port
//!
//! Defines the interface for requesting a single text completion from the
//! external model gateway.

use async_trait::async_trait;
use consensus_domain::{CompletionRequest, CompletionResult};
use thiserror::Error;

/// Errors that can occur during a completion request
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Gateway returned HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("Gateway returned no completion choices")]
    NoChoices,

    #[error("Model returned an empty response")]
    EmptyResponse,

    #[error("Invalid gateway response: {0}")]
    InvalidResponse(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Timeout")]
    Timeout,
}

/// Gateway for model completions
///
/// This port defines how the application layer talks to the completion
/// service. Implementations (adapters) live in the infrastructure layer and
/// receive their credentials at construction time.
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    /// Request one completion for one model
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResult, GatewayError>;
}
