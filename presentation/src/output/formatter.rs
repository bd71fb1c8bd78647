//! Output formatter trait

use consensus_application::ConsensusRun;
use consensus_domain::OutputFormat;

/// Trait for formatting consensus runs
pub trait OutputFormatter {
    /// Format the complete run: responses, groups, insights, statistics
    fn format(&self, run: &ConsensusRun) -> String;

    /// Format as JSON
    fn format_json(&self, run: &ConsensusRun) -> String;

    /// Format groups and insights only (concise output)
    fn format_summary(&self, run: &ConsensusRun) -> String;

    /// Dispatch on the selected output format
    fn render(&self, run: &ConsensusRun, format: OutputFormat) -> String {
        match format {
            OutputFormat::Full => self.format(run),
            OutputFormat::Summary => self.format_summary(run),
            OutputFormat::Json => self.format_json(run),
        }
    }
}
