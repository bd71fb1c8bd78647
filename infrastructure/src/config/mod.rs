//! Configuration file loading for llm-consensus
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `--config <path>` specified file
//! 2. Project root: `./consensus.toml` or `./.consensus.toml`
//! 3. Global: `<config dir>/llm-consensus/config.toml`
//! 4. Default values

mod file_config;
mod loader;
mod validation;

pub use file_config::{
    CredentialError, DEFAULT_API_KEY_ENV, DEFAULT_BASE_URL, FileAnalysisConfig, FileBatchConfig,
    FileConfig, FileGatewayConfig, FileModelEntry, FileModelsConfig, FileOutputConfig,
    FileRecordConfig, parse_model_list,
};
pub use loader::ConfigLoader;
pub use validation::{ConfigIssue, ConfigIssueCode, Severity};
