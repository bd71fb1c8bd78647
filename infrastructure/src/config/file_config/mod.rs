//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod analysis;
mod batch;
mod gateway;
mod models;
mod output;
mod record;

pub use analysis::FileAnalysisConfig;
pub use batch::FileBatchConfig;
pub use gateway::{CredentialError, DEFAULT_API_KEY_ENV, DEFAULT_BASE_URL, FileGatewayConfig};
pub use models::{FileModelEntry, FileModelsConfig, parse_model_list};
pub use output::FileOutputConfig;
pub use record::FileRecordConfig;

use super::validation::{ConfigIssue, ConfigIssueCode};
use consensus_application::BatchOptionsError;
use consensus_domain::{ModelCatalog, ModelId};
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Completion gateway endpoint and credential
    pub gateway: FileGatewayConfig,
    /// Per-request parameters and pacing
    pub batch: FileBatchConfig,
    /// Model selection and catalog
    pub models: FileModelsConfig,
    /// Grouping settings
    pub analysis: FileAnalysisConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Run recording
    pub record: FileRecordConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Checks model ids, the gateway endpoint, batch option ranges and the
    /// similarity threshold.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        issues.extend(self.models.parse_selected().1);
        issues.extend(self.models.parse_catalog().1);

        if self.gateway.base_url.trim().is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyBaseUrl,
                "gateway.base_url cannot be empty",
            ));
        }
        if self.gateway.http_timeout_secs == 0 {
            issues.push(out_of_range(
                "gateway.http_timeout_secs",
                "gateway.http_timeout_secs must be greater than 0",
            ));
        }

        if let Err(e) = self.batch.to_batch_options().validate() {
            let field = match e {
                BatchOptionsError::ZeroConcurrency => "batch.concurrency",
                BatchOptionsError::ZeroTimeout => "batch.timeout_ms",
                BatchOptionsError::TemperatureOutOfRange(_) => "batch.temperature",
                BatchOptionsError::ZeroMaxTokens => "batch.max_tokens",
            };
            issues.push(out_of_range(field, format!("{field}: {e}")));
        }

        let threshold = self.analysis.similarity_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            issues.push(out_of_range(
                "analysis.similarity_threshold",
                format!("analysis.similarity_threshold must be between 0 and 1, got {threshold}"),
            ));
        }

        issues
    }

    /// Effective model catalog
    pub fn catalog(&self) -> ModelCatalog {
        self.models.parse_catalog().0
    }

    /// Models to query when none are given explicitly
    ///
    /// Falls back to one model per provider from the catalog.
    pub fn default_models(&self) -> Vec<ModelId> {
        let (selected, _) = self.models.parse_selected();
        if selected.is_empty() {
            self.catalog().default_selection()
        } else {
            selected
        }
    }
}

fn out_of_range(field: &str, message: impl Into<String>) -> ConfigIssue {
    ConfigIssue::error(
        ConfigIssueCode::OutOfRange {
            field: field.to_string(),
        },
        message,
    )
}
