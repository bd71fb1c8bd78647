//! Consensus grouping
//!
//! Responses are clustered greedily in input order: each response joins the
//! first existing group whose representative is similar enough, otherwise it
//! founds a new group. Matching is first-match-wins, not best-match, so
//! reordering the input can change the grouping.

use super::normalize::normalize;
use super::palette::color_for;
use super::similarity::similarity;
use crate::core::model::ModelId;
use serde::{Deserialize, Serialize};

/// Minimum similarity for a response to join an existing group
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.8;

/// A successful model response fed to the analyzer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseRecord {
    pub model_id: ModelId,
    /// Original response text, kept for display
    pub text: String,
    /// Provider label attached by the caller from the model catalog
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// Human-readable model name attached by the caller
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
}

impl ResponseRecord {
    pub fn new(model_id: ModelId, text: impl Into<String>) -> Self {
        Self {
            model_id,
            text: text.into(),
            provider: None,
            model_name: None,
        }
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    pub fn with_model_name(mut self, name: impl Into<String>) -> Self {
        self.model_name = Some(name.into());
        self
    }

    /// Catalog name if known, else the model id
    pub fn label(&self) -> &str {
        self.model_name
            .as_deref()
            .unwrap_or_else(|| self.model_id.as_str())
    }
}

/// Responses treated as the same answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsensusGroup {
    /// Normalized text of the first response that founded the group
    pub display_name: String,
    /// Members in insertion order
    pub members: Vec<ResponseRecord>,
    pub count: usize,
    pub percentage_of_total: f64,
    pub color_token: String,
}

impl ConsensusGroup {
    fn founded_by(display_name: String, record: ResponseRecord) -> Self {
        Self {
            display_name,
            members: vec![record],
            count: 1,
            percentage_of_total: 0.0,
            color_token: String::new(),
        }
    }

    fn push(&mut self, record: ResponseRecord) {
        self.members.push(record);
        self.count = self.members.len();
    }
}

/// Result of clustering a set of responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsensusAnalysis {
    /// Groups sorted by count, largest first; ties keep creation order
    pub groups: Vec<ConsensusGroup>,
    pub total_responses: usize,
    /// Percentage share of the largest group
    pub consensus_level: f64,
    /// Distinct groups divided by total responses
    pub diversity_index: f64,
    pub top_response_name: String,
}

impl ConsensusAnalysis {
    pub fn empty() -> Self {
        Self {
            groups: Vec::new(),
            total_responses: 0,
            consensus_level: 0.0,
            diversity_index: 0.0,
            top_response_name: String::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_responses == 0
    }

    pub fn top_group(&self) -> Option<&ConsensusGroup> {
        self.groups.first()
    }
}

/// Greedy similarity clustering of responses
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConsensusAnalyzer {
    threshold: f64,
}

impl Default for ConsensusAnalyzer {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }
}

impl ConsensusAnalyzer {
    /// Create an analyzer with a custom threshold (clamped to `[0, 1]`)
    pub fn with_threshold(threshold: f64) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn analyze(&self, responses: &[ResponseRecord]) -> ConsensusAnalysis {
        if responses.is_empty() {
            return ConsensusAnalysis::empty();
        }

        let mut groups: Vec<ConsensusGroup> = Vec::new();

        for record in responses {
            let normalized = normalize(&record.text);
            let matching = groups
                .iter_mut()
                .find(|group| self.is_match(&group.display_name, &normalized));

            match matching {
                Some(group) => group.push(record.clone()),
                None => groups.push(ConsensusGroup::founded_by(normalized, record.clone())),
            }
        }

        let total = responses.len();
        // stable: equal counts keep creation order
        groups.sort_by(|a, b| b.count.cmp(&a.count));

        for (index, group) in groups.iter_mut().enumerate() {
            group.percentage_of_total = 100.0 * group.count as f64 / total as f64;
            group.color_token = color_for(index).to_string();
        }

        let consensus_level = groups.first().map_or(0.0, |g| g.percentage_of_total);
        let top_response_name = groups
            .first()
            .map(|g| g.display_name.clone())
            .unwrap_or_default();

        ConsensusAnalysis {
            diversity_index: groups.len() as f64 / total as f64,
            groups,
            total_responses: total,
            consensus_level,
            top_response_name,
        }
    }

    fn is_match(&self, representative: &str, candidate: &str) -> bool {
        similarity(representative, candidate) + f64::EPSILON >= self.threshold
    }
}

/// Analyze with the default threshold
pub fn analyze(responses: &[ResponseRecord]) -> ConsensusAnalysis {
    ConsensusAnalyzer::default().analyze(responses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consensus::palette::PALETTE;

    fn records(texts: &[&str]) -> Vec<ResponseRecord> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| ResponseRecord::new(ModelId::new(format!("p/model-{i}")).unwrap(), *t))
            .collect()
    }

    #[test]
    fn test_empty_input() {
        let analysis = analyze(&[]);
        assert_eq!(analysis, ConsensusAnalysis::empty());
        assert!(analysis.groups.is_empty());
        assert_eq!(analysis.total_responses, 0);
        assert_eq!(analysis.consensus_level, 0.0);
        assert_eq!(analysis.diversity_index, 0.0);
        assert_eq!(analysis.top_response_name, "");
    }

    #[test]
    fn test_paris_example() {
        let analysis = analyze(&records(&["Paris", "paris", "Paris!", "Lyon"]));

        assert_eq!(analysis.groups.len(), 2);
        let top = &analysis.groups[0];
        assert_eq!(top.display_name, "paris");
        assert_eq!(top.count, 3);
        assert_eq!(top.percentage_of_total, 75.0);
        // original text is kept for display
        let texts: Vec<_> = top.members.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["Paris", "paris", "Paris!"]);

        assert_eq!(analysis.groups[1].display_name, "lyon");
        assert_eq!(analysis.groups[1].percentage_of_total, 25.0);
        assert_eq!(analysis.consensus_level, 75.0);
        assert_eq!(analysis.top_response_name, "paris");
        assert_eq!(analysis.diversity_index, 0.5);
    }

    #[test]
    fn test_forty_two_example() {
        let analysis = analyze(&records(&["42", "forty-two", "42"]));

        assert_eq!(analysis.groups.len(), 2);
        assert_eq!(analysis.groups[0].display_name, "42");
        assert_eq!(analysis.groups[0].count, 2);
        assert!((analysis.groups[0].percentage_of_total - 66.666_666).abs() < 1e-3);
        assert_eq!(analysis.groups[1].display_name, "fortytwo");
        assert_eq!(analysis.groups[1].count, 1);
        assert!((analysis.diversity_index - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_threshold_boundary_exactly_point_eight_merges() {
        // one edit over five characters = 0.8
        let analysis = analyze(&records(&["paris", "parix"]));
        assert_eq!(analysis.groups.len(), 1);
        assert_eq!(analysis.groups[0].count, 2);
    }

    #[test]
    fn test_threshold_just_below_does_not_merge() {
        // three edits over fourteen characters ~ 0.786
        let analysis = analyze(&records(&["abcdefghijklmn", "abcdefghijkxyz"]));
        assert_eq!(analysis.groups.len(), 2);

        // two edits over nine characters ~ 0.778
        let analysis = analyze(&records(&["abcdefghi", "abcdefgxy"]));
        assert_eq!(analysis.groups.len(), 2);
    }

    #[test]
    fn test_first_match_wins_over_best_match() {
        // "aaaaaaaabb" is 0.8 from the first group and 0.9 from the second;
        // it still joins the first group it qualifies for.
        let analysis = analyze(&records(&["aaaaaaaaaa", "aaaaaaabbb", "aaaaaaaabb"]));
        assert_eq!(analysis.groups.len(), 2);
        assert_eq!(analysis.groups[0].display_name, "aaaaaaaaaa");
        assert_eq!(analysis.groups[0].count, 2);
        assert_eq!(analysis.groups[1].display_name, "aaaaaaabbb");
        assert_eq!(analysis.groups[1].count, 1);
    }

    #[test]
    fn test_earlier_group_wins_when_two_qualify() {
        // "aaaab" matches both "aaaaa" (0.8) and "aaabb" (0.8); the
        // earlier-created group takes it.
        let analysis = analyze(&records(&["aaaaa", "aaabb", "aaaab"]));
        assert_eq!(analysis.groups.len(), 2);
        assert_eq!(analysis.groups[0].display_name, "aaaaa");
        assert_eq!(analysis.groups[0].count, 2);
        assert_eq!(analysis.groups[1].display_name, "aaabb");
    }

    #[test]
    fn test_ties_keep_creation_order() {
        let analysis = analyze(&records(&["red", "blue", "green", "blue", "red"]));
        let names: Vec<_> = analysis.groups.iter().map(|g| g.display_name.as_str()).collect();
        assert_eq!(names, vec!["red", "blue", "green"]);
    }

    #[test]
    fn test_colors_follow_sorted_order() {
        let analysis = analyze(&records(&["one", "two", "two"]));
        assert_eq!(analysis.groups[0].display_name, "two");
        assert_eq!(analysis.groups[0].color_token, PALETTE[0]);
        assert_eq!(analysis.groups[1].color_token, PALETTE[1]);
    }

    #[test]
    fn test_colors_cycle_past_palette() {
        let analysis = analyze(&records(&[
            "alpha", "bravo", "charlie", "delta", "echo", "foxtrot", "golf", "hotel", "india",
            "juliett", "kilo", "lima",
        ]));
        assert_eq!(analysis.groups.len(), 12);
        assert_eq!(analysis.groups[10].color_token, PALETTE[0]);
        assert_eq!(analysis.groups[11].color_token, PALETTE[1]);
    }

    #[test]
    fn test_partition_is_exhaustive_and_percentages_sum() {
        let input = records(&["Yes", "yes.", "No", "Maybe", "no", "YES!", "perhaps"]);
        let analysis = analyze(&input);

        let total: usize = analysis.groups.iter().map(|g| g.count).sum();
        assert_eq!(total, input.len());
        for group in &analysis.groups {
            assert_eq!(group.count, group.members.len());
        }
        let pct: f64 = analysis.groups.iter().map(|g| g.percentage_of_total).sum();
        assert!((pct - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_reanalysis_is_deterministic() {
        let input = records(&["Blue", "blue", "Azure", "Blu", "navy"]);
        assert_eq!(analyze(&input), analyze(&input));
    }

    #[test]
    fn test_blank_responses_group_together() {
        let analysis = analyze(&records(&["...", "!!", "ok"]));
        assert_eq!(analysis.groups[0].display_name, "");
        assert_eq!(analysis.groups[0].count, 2);
    }

    #[test]
    fn test_custom_threshold() {
        let strict = ConsensusAnalyzer::with_threshold(1.0);
        assert_eq!(strict.analyze(&records(&["paris", "parix"])).groups.len(), 2);

        let clamped = ConsensusAnalyzer::with_threshold(3.0);
        assert_eq!(clamped.threshold(), 1.0);
    }
}
