//! Completion gateway adapters
//!
//! [`HttpCompletionGateway`] implements the
//! [`CompletionGateway`](consensus_application::CompletionGateway) port over
//! an OpenAI-compatible `chat/completions` endpoint.

pub mod error;
pub mod http_gateway;
mod protocol;

pub use error::GatewaySetupError;
pub use http_gateway::HttpCompletionGateway;
