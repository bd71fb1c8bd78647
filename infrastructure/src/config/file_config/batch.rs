//! Batch configuration from TOML (`[batch]` section)

use consensus_application::BatchOptions;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw batch configuration from TOML
///
/// Unset fields fall back to the [`BatchOptions`] defaults.
///
/// # Example
///
/// ```toml
/// [batch]
/// timeout_ms = 30000
/// concurrency = 5
/// chunk_delay_ms = 100
/// temperature = 0.7
/// max_tokens = 256
/// system_prompt = "Answer with a single word."
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBatchConfig {
    pub timeout_ms: Option<u64>,
    pub concurrency: Option<usize>,
    pub chunk_delay_ms: Option<u64>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub system_prompt: Option<String>,
}

impl FileBatchConfig {
    /// Overlay the configured values onto the defaults.
    ///
    /// No validation happens here; see [`BatchOptions::validate`].
    pub fn to_batch_options(&self) -> BatchOptions {
        let mut options = BatchOptions::default();
        if let Some(ms) = self.timeout_ms {
            options = options.with_timeout(Duration::from_millis(ms));
        }
        if let Some(n) = self.concurrency {
            options = options.with_concurrency(n);
        }
        if let Some(ms) = self.chunk_delay_ms {
            options = options.with_chunk_delay(Duration::from_millis(ms));
        }
        if let Some(t) = self.temperature {
            options = options.with_temperature(t);
        }
        if let Some(max) = self.max_tokens {
            options = options.with_max_tokens(max);
        }
        if let Some(prompt) = self.system_prompt.as_deref().filter(|p| !p.trim().is_empty()) {
            options = options.with_system_prompt(prompt);
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_section_yields_defaults() {
        assert_eq!(FileBatchConfig::default().to_batch_options(), BatchOptions::default());
    }

    #[test]
    fn test_overrides_apply() {
        let config = FileBatchConfig {
            timeout_ms: Some(1500),
            concurrency: Some(2),
            system_prompt: Some("   ".to_string()),
            ..Default::default()
        };
        let options = config.to_batch_options();
        assert_eq!(options.timeout, Duration::from_millis(1500));
        assert_eq!(options.concurrency, 2);
        assert!(options.system_prompt.is_none());
    }
}
