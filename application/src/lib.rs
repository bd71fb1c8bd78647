//! Application layer for llm-consensus
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{BatchOptions, BatchOptionsError};
pub use ports::{
    completion_gateway::{CompletionGateway, GatewayError},
    progress::{BatchProgressNotifier, NoProgress},
    run_recorder::{NoRunRecorder, RunRecorder},
};
pub use use_cases::fetch_batch::{CANCELLED_MESSAGE, FetchBatchUseCase, FetchError};
pub use use_cases::run_consensus::{
    ConsensusRun, RunConsensusError, RunConsensusInput, RunConsensusUseCase, response_records,
};
