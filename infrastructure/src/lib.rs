//! Infrastructure layer for llm-consensus
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod gateway;
pub mod logging;

// Re-export commonly used types
pub use config::{
    ConfigIssue, ConfigLoader, CredentialError, FileConfig, FileGatewayConfig, FileOutputConfig,
    Severity,
};
pub use gateway::{GatewaySetupError, HttpCompletionGateway};
pub use logging::JsonlRunRecorder;
