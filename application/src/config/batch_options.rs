//! Batch options: completion fan-out control.
//!
//! [`BatchOptions`] groups the parameters of one batch fetch: what to send
//! to each model (sampling, token limit, system prompt) and how to pace the
//! requests (timeout, concurrency, inter-chunk delay).

use consensus_domain::{CompletionRequest, ModelId, Prompt};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(30_000);
/// Default number of requests in flight per chunk
pub const DEFAULT_CONCURRENCY: usize = 5;
/// Default sampling temperature
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
/// Default pause between chunks
pub const DEFAULT_CHUNK_DELAY: Duration = Duration::from_millis(100);

/// Highest temperature accepted by the gateway
const MAX_TEMPERATURE: f32 = 2.0;

/// Invalid option values
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BatchOptionsError {
    #[error("concurrency must be at least 1")]
    ZeroConcurrency,

    #[error("timeout must be greater than zero")]
    ZeroTimeout,

    #[error("temperature must be between 0 and 2, got {0}")]
    TemperatureOutOfRange(f32),

    #[error("max_tokens must be greater than zero")]
    ZeroMaxTokens,
}

/// Batch fetch parameters.
///
/// | Field        | Default  |
/// |--------------|----------|
/// | timeout      | 30 s     |
/// | concurrency  | 5        |
/// | temperature  | 0.7      |
/// | chunk_delay  | 100 ms   |
/// | max_tokens   | gateway  |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchOptions {
    /// Completion token limit per model (gateway default when `None`).
    pub max_tokens: Option<u32>,
    /// Sampling temperature.
    pub temperature: f32,
    /// System prompt sent ahead of the user prompt.
    pub system_prompt: Option<String>,
    /// Upper bound for a single model's request.
    pub timeout: Duration,
    /// Requests issued together per chunk.
    pub concurrency: usize,
    /// Pause between consecutive chunks.
    pub chunk_delay: Duration,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            max_tokens: None,
            temperature: DEFAULT_TEMPERATURE,
            system_prompt: None,
            timeout: DEFAULT_TIMEOUT,
            concurrency: DEFAULT_CONCURRENCY,
            chunk_delay: DEFAULT_CHUNK_DELAY,
        }
    }
}

impl BatchOptions {
    // ==================== Builder Methods ====================

    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_chunk_delay(mut self, delay: Duration) -> Self {
        self.chunk_delay = delay;
        self
    }

    // ==================== Validation ====================

    /// Check every field, returning the first problem found
    pub fn validate(&self) -> Result<(), BatchOptionsError> {
        if self.concurrency == 0 {
            return Err(BatchOptionsError::ZeroConcurrency);
        }
        if self.timeout.is_zero() {
            return Err(BatchOptionsError::ZeroTimeout);
        }
        if !(0.0..=MAX_TEMPERATURE).contains(&self.temperature) {
            return Err(BatchOptionsError::TemperatureOutOfRange(self.temperature));
        }
        if self.max_tokens == Some(0) {
            return Err(BatchOptionsError::ZeroMaxTokens);
        }
        Ok(())
    }

    /// Consume the builder, returning it only if valid
    pub fn validated(self) -> Result<Self, BatchOptionsError> {
        self.validate()?;
        Ok(self)
    }

    /// Build the gateway request for one model
    pub fn request_for(&self, model: ModelId, prompt: &Prompt) -> CompletionRequest {
        CompletionRequest {
            model,
            prompt: prompt.content().to_string(),
            system_prompt: self.system_prompt.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}
