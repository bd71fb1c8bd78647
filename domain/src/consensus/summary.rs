//! Summary statistics for display and export

use super::analyzer::ConsensusAnalysis;
use serde::{Deserialize, Serialize};

/// One row of the answer distribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionEntry {
    pub name: String,
    pub count: usize,
    pub percentage: f64,
}

/// Flattened view of an analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStatistics {
    pub total_models: usize,
    pub unique_response_count: usize,
    pub consensus_level: f64,
    pub top_response_name: String,
    pub distribution: Vec<DistributionEntry>,
}

impl SummaryStatistics {
    pub fn from_analysis(analysis: &ConsensusAnalysis) -> Self {
        Self {
            total_models: analysis.total_responses,
            unique_response_count: analysis.groups.len(),
            consensus_level: analysis.consensus_level,
            top_response_name: analysis.top_response_name.clone(),
            distribution: analysis
                .groups
                .iter()
                .map(|g| DistributionEntry {
                    name: g.display_name.clone(),
                    count: g.count,
                    percentage: g.percentage_of_total,
                })
                .collect(),
        }
    }
}
