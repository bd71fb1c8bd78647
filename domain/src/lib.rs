//! Domain layer for llm-consensus
//!
//! This crate contains the core entities and the consensus grouping
//! algorithm. It has no dependencies on infrastructure or presentation
//! concerns and performs no I/O.
//!
//! # Core Concepts
//!
//! - **Model catalog**: opaque gateway model ids plus display name and
//!   provider metadata ([`ModelCatalog`])
//! - **Batch outcome**: one result-or-error per requested model
//!   ([`BatchOutcome`])
//! - **Consensus analysis**: greedy similarity grouping of the successful
//!   answers, ranked by size, with insights and summary statistics
//!   ([`ConsensusAnalysis`])

pub mod completion;
pub mod config;
pub mod consensus;
pub mod core;

// Re-export commonly used types
pub use completion::{BatchOutcome, CompletionRequest, CompletionResult, TokenUsage};
pub use config::OutputFormat;
pub use consensus::{
    ConsensusAnalysis, ConsensusAnalyzer, ConsensusGroup, DEFAULT_SIMILARITY_THRESHOLD,
    DistributionEntry, NO_RESPONSES_INSIGHT, PALETTE, ResponseRecord, SummaryStatistics, analyze,
    color_for, generate_insights, hex_to_rgb,
};
pub use core::{
    error::DomainError,
    model::{ModelCatalog, ModelId, ModelInfo},
    prompt::Prompt,
};
