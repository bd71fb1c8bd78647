//! Progress reporting for batch fetches

use colored::Colorize;
use consensus_application::ports::progress::BatchProgressNotifier;
use consensus_domain::ModelId;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;

/// Reports batch progress with an indicatif progress bar
pub struct ProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.bar.lock()
            && let Some(pb) = guard.as_ref()
        {
            f(pb);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchProgressNotifier for ProgressReporter {
    fn on_batch_start(&self, total_models: usize) {
        let pb = ProgressBar::new(total_models as u64);
        pb.set_style(Self::bar_style());
        pb.set_prefix("Querying models");
        pb.set_message("Starting...");

        if let Ok(mut guard) = self.bar.lock() {
            *guard = Some(pb);
        }
    }

    fn on_chunk_start(&self, chunk_index: usize, chunk_size: usize) {
        self.with_bar(|pb| {
            pb.set_message(format!("chunk {} ({} requests)", chunk_index + 1, chunk_size));
        });
    }

    fn on_model_complete(&self, model: &ModelId, success: bool) {
        self.with_bar(|pb| {
            let status = if success {
                format!("{} {}", "v".green(), model)
            } else {
                format!("{} {}", "x".red(), model)
            };
            pb.set_message(status);
            pb.inc(1);
        });
    }

    fn on_batch_complete(&self, succeeded: usize, total: usize) {
        let Ok(mut guard) = self.bar.lock() else {
            return;
        };
        if let Some(pb) = guard.take() {
            let summary = format!("{succeeded}/{total} responded");
            let message = if succeeded == total {
                summary.green()
            } else {
                summary.yellow()
            };
            pb.finish_with_message(message.to_string());
        }
    }
}

/// Simple text-based progress (no fancy UI)
///
/// Writes to stderr so JSON on stdout stays clean. Used when stderr is not
/// a terminal, where a redrawing bar would only produce noise.
pub struct SimpleProgress;

impl SimpleProgress {
    fn start_line(total_models: usize) -> String {
        format!(
            "{} {} ({} models)",
            "->".cyan(),
            "Querying models".bold(),
            total_models
        )
    }

    fn model_line(model: &ModelId, success: bool) -> String {
        if success {
            format!("  {} {}", "v".green(), model)
        } else {
            format!("  {} {} (failed)", "x".red(), model)
        }
    }
}

impl BatchProgressNotifier for SimpleProgress {
    fn on_batch_start(&self, total_models: usize) {
        eprintln!("{}", Self::start_line(total_models));
    }

    fn on_model_complete(&self, model: &ModelId, success: bool) {
        eprintln!("{}", Self::model_line(model, success));
    }

    fn on_batch_complete(&self, succeeded: usize, total: usize) {
        eprintln!("  {succeeded}/{total} responded");
        eprintln!();
    }
}
