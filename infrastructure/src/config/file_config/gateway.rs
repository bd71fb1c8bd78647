//! Gateway configuration from TOML (`[gateway]` section)

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Default OpenAI-compatible gateway
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Default environment variable holding the gateway credential
pub const DEFAULT_API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// Credential lookup failure
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("No API key configured: set ${0} or `gateway.api_key`")]
    Missing(String),
}

/// Raw gateway configuration from TOML
///
/// # Example
///
/// ```toml
/// [gateway]
/// base_url = "https://openrouter.ai/api/v1"
/// api_key_env = "OPENROUTER_API_KEY"
/// http_timeout_secs = 120
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGatewayConfig {
    /// Base URL; `/chat/completions` is appended
    pub base_url: String,
    /// Environment variable name for the API key
    pub api_key_env: String,
    /// Direct API key (not recommended, use the env var instead)
    pub api_key: Option<String>,
    /// Client-level HTTP timeout in seconds
    pub http_timeout_secs: u64,
}

impl Default for FileGatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            api_key: None,
            http_timeout_secs: 120,
        }
    }
}

impl FileGatewayConfig {
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Resolve the credential: inline `api_key` first, then the env var.
    pub fn resolve_api_key(&self) -> Result<String, CredentialError> {
        self.resolve_api_key_with(|name| std::env::var(name).ok())
    }

    fn resolve_api_key_with(
        &self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<String, CredentialError> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| lookup(&self.api_key_env).filter(|k| !k.trim().is_empty()))
            .ok_or_else(|| CredentialError::Missing(self.api_key_env.clone()))
    }
}
