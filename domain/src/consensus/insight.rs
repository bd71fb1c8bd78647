//! Natural-language insights derived from a [`ConsensusAnalysis`]

use super::analyzer::{ConsensusAnalysis, ConsensusGroup};

/// Insight returned when there is nothing to analyze
pub const NO_RESPONSES_INSIGHT: &str = "No responses to analyze.";

/// Gap (in percentage points) below which the top two groups are "close"
const CLOSE_COMPETITION_GAP: f64 = 10.0;

/// Minimum distinct providers for a cross-provider agreement insight
const CROSS_PROVIDER_MIN: usize = 3;

/// Consensus strength bands, keyed on the top group's percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsensusStrength {
    Strong,
    Moderate,
    Weak,
    NoConsensus,
}

impl ConsensusStrength {
    pub fn from_level(level: f64) -> Self {
        if level >= 80.0 {
            Self::Strong
        } else if level >= 60.0 {
            Self::Moderate
        } else if level >= 40.0 {
            Self::Weak
        } else {
            Self::NoConsensus
        }
    }
}

/// Diversity bands, keyed on groups / responses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiversityBand {
    VeryHigh,
    High,
    Moderate,
    Low,
}

impl DiversityBand {
    pub fn from_index(index: f64) -> Self {
        if index >= 0.8 {
            Self::VeryHigh
        } else if index >= 0.6 {
            Self::High
        } else if index >= 0.4 {
            Self::Moderate
        } else {
            Self::Low
        }
    }
}

/// Produce the ordered insight strings for an analysis
pub fn generate_insights(analysis: &ConsensusAnalysis) -> Vec<String> {
    let Some(top) = analysis.top_group() else {
        return vec![NO_RESPONSES_INSIGHT.to_string()];
    };

    let mut insights = vec![
        consensus_insight(analysis, top),
        diversity_insight(analysis),
    ];

    if let [first, second, ..] = analysis.groups.as_slice()
        && first.percentage_of_total - second.percentage_of_total < CLOSE_COMPETITION_GAP
    {
        insights.push(format!(
            "Close competition: \"{}\" ({:.1}%) and \"{}\" ({:.1}%) are within 10 percentage points.",
            first.display_name,
            first.percentage_of_total,
            second.display_name,
            second.percentage_of_total
        ));
    }

    if let Some(insight) = provider_insight(top) {
        insights.push(insight);
    }

    insights
}

fn consensus_insight(analysis: &ConsensusAnalysis, top: &ConsensusGroup) -> String {
    let name = &top.display_name;
    let pct = analysis.consensus_level;
    match ConsensusStrength::from_level(pct) {
        ConsensusStrength::Strong => {
            format!("Strong consensus: {pct:.1}% of models agree on \"{name}\".")
        }
        ConsensusStrength::Moderate => {
            format!("Moderate consensus: \"{name}\" was chosen by {pct:.1}% of models.")
        }
        ConsensusStrength::Weak => {
            format!("Weak consensus: \"{name}\" leads with only {pct:.1}% of responses.")
        }
        ConsensusStrength::NoConsensus => format!(
            "No clear consensus: the most common answer \"{name}\" has just {pct:.1}% of responses."
        ),
    }
}

fn diversity_insight(analysis: &ConsensusAnalysis) -> String {
    let groups = analysis.groups.len();
    let total = analysis.total_responses;
    let label = match DiversityBand::from_index(analysis.diversity_index) {
        DiversityBand::VeryHigh => "Very high diversity",
        DiversityBand::High => "High diversity",
        DiversityBand::Moderate => "Moderate diversity",
        DiversityBand::Low => "Low diversity",
    };
    let noun = if groups == 1 { "answer" } else { "answers" };
    format!("{label}: {groups} distinct {noun} across {total} responses.")
}

/// Provider bias / cross-provider agreement for the top group.
///
/// Skipped entirely when any member lacks a provider label.
fn provider_insight(top: &ConsensusGroup) -> Option<String> {
    let mut providers: Vec<&str> = Vec::new();
    for member in &top.members {
        let provider = member.provider.as_deref()?;
        if !providers.contains(&provider) {
            providers.push(provider);
        }
    }

    match providers.as_slice() {
        [single] => Some(format!(
            "Provider bias: every response in \"{}\" came from {} models.",
            top.display_name, single
        )),
        many if many.len() >= CROSS_PROVIDER_MIN => Some(format!(
            "Cross-provider agreement: \"{}\" was chosen by models from {} providers ({}).",
            top.display_name,
            many.len(),
            many.join(", ")
        )),
        _ => None,
    }
}
