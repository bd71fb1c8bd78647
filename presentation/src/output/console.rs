//! Console output formatter for consensus runs

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use consensus_application::ConsensusRun;
use consensus_domain::{ConsensusGroup, ModelCatalog, hex_to_rgb};

/// Width of the group-name column
const NAME_WIDTH: usize = 24;

/// Formats consensus runs for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete run
    pub fn format(run: &ConsensusRun) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("LLM Consensus Results"));
        output.push('\n');
        output.push_str(&Self::prompt_block(run));

        output.push_str(&Self::section_header("Responses"));
        for outcome in &run.outcomes {
            match &outcome.outcome {
                Ok(result) => output.push_str(&format!(
                    "\n{} {}\n{}\n",
                    format!("── {} ──", outcome.model_id).yellow().bold(),
                    format!("{}ms", result.elapsed_ms).dimmed(),
                    result.text.trim()
                )),
                Err(error) => output.push_str(&format!(
                    "\n{}\n{} {}\n",
                    format!("── {} ──", outcome.model_id).red().bold(),
                    "Error:".red(),
                    error
                )),
            }
        }

        output.push_str(&Self::groups_block(run));
        output.push_str(&Self::insights_block(run));

        output.push_str(&Self::section_header("Statistics"));
        output.push_str(&Self::statistics_block(run));

        output.push_str(&Self::footer());
        output
    }

    /// Format as JSON
    pub fn format_json(run: &ConsensusRun) -> String {
        serde_json::to_string_pretty(run).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format groups and insights only (concise output)
    pub fn format_summary(run: &ConsensusRun) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{}\n\n",
            "=== LLM Consensus ===".cyan().bold()
        ));
        output.push_str(&Self::prompt_block(run));

        let failed: Vec<_> = run.failed().collect();
        if !failed.is_empty() {
            for outcome in &failed {
                output.push_str(&format!(
                    "{} {}: {}\n",
                    "x".red(),
                    outcome.model_id,
                    outcome.error().unwrap_or("Unknown error")
                ));
            }
            output.push('\n');
        }

        output.push_str(&Self::groups_block(run));
        output.push_str(&Self::insights_block(run));
        output
    }

    /// Catalog listing for `--list-models`
    pub fn format_catalog(catalog: &ModelCatalog) -> String {
        let mut output = format!("{}\n", "Available models:".cyan().bold());
        let width = catalog
            .models()
            .iter()
            .map(|m| m.id.as_str().len())
            .max()
            .unwrap_or(0);
        for info in catalog.models() {
            output.push_str(&format!(
                "  {:<width$}  {} {}\n",
                info.id.as_str(),
                info.name,
                format!("({})", info.provider).dimmed(),
            ));
        }
        output
    }

    fn prompt_block(run: &ConsensusRun) -> String {
        let responded = run.succeeded().count();
        format!(
            "{} {}\n{} {} queried, {} responded, {} failed\n",
            "Prompt:".cyan().bold(),
            run.prompt,
            "Models:".cyan().bold(),
            run.outcomes.len(),
            responded,
            run.outcomes.len() - responded
        )
    }

    fn groups_block(run: &ConsensusRun) -> String {
        let mut output = Self::section_header("Consensus Groups");
        if run.analysis.groups.is_empty() {
            output.push_str(&format!("\n  {}\n", "(no responses)".dimmed()));
            return output;
        }
        output.push('\n');
        for group in &run.analysis.groups {
            output.push_str(&Self::group_line(group));
            output.push('\n');
        }
        output
    }

    fn group_line(group: &ConsensusGroup) -> String {
        let members = group
            .members
            .iter()
            .map(|m| m.label())
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "  {} {:<NAME_WIDTH$} {:>3} {:>6.1}%  {}",
            Self::swatch(&group.color_token),
            Self::truncate(&group.display_name, NAME_WIDTH),
            group.count,
            group.percentage_of_total,
            members.dimmed()
        )
    }

    fn insights_block(run: &ConsensusRun) -> String {
        let mut output = Self::section_header("Insights");
        output.push('\n');
        for insight in &run.insights {
            output.push_str(&format!("  * {}\n", insight));
        }
        output
    }

    fn statistics_block(run: &ConsensusRun) -> String {
        let summary = &run.summary;
        let top = if summary.top_response_name.is_empty() {
            "-"
        } else {
            summary.top_response_name.as_str()
        };
        format!(
            "\n  Total responses:  {}\n  Unique answers:   {}\n  Consensus level:  {:.1}%\n  Diversity index:  {:.2}\n  Top answer:       {}\n  Duration:         {}ms\n",
            summary.total_models,
            summary.unique_response_count,
            summary.consensus_level,
            run.analysis.diversity_index,
            top,
            run.duration_ms()
        )
    }

    /// Colored block for a `#RRGGBB` token; plain block if the token is malformed
    fn swatch(token: &str) -> String {
        match hex_to_rgb(token) {
            Some((r, g, b)) => "██".truecolor(r, g, b).to_string(),
            None => "██".to_string(),
        }
    }

    fn truncate(text: &str, max: usize) -> String {
        if text.chars().count() <= max {
            text.to_string()
        } else {
            let head: String = text.chars().take(max.saturating_sub(3)).collect();
            format!("{head}...")
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, run: &ConsensusRun) -> String {
        Self::format(run)
    }

    fn format_json(&self, run: &ConsensusRun) -> String {
        Self::format_json(run)
    }

    fn format_summary(&self, run: &ConsensusRun) -> String {
        Self::format_summary(run)
    }
}
