//! Analysis configuration from TOML (`[analysis]` section)

use consensus_domain::{ConsensusAnalyzer, DEFAULT_SIMILARITY_THRESHOLD};
use serde::{Deserialize, Serialize};

/// Raw analysis configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAnalysisConfig {
    /// Minimum normalized similarity for two answers to share a group
    pub similarity_threshold: f64,
}

impl Default for FileAnalysisConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }
}

impl FileAnalysisConfig {
    pub fn analyzer(&self) -> ConsensusAnalyzer {
        ConsensusAnalyzer::with_threshold(self.similarity_threshold)
    }
}
