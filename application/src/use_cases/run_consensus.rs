//! Run Consensus use case
//!
//! Orchestrates one prompt submission: fan the prompt out to every selected
//! model, keep the successful answers, join them against the model catalog,
//! then cluster them into consensus groups.

use crate::config::BatchOptions;
use crate::ports::completion_gateway::CompletionGateway;
use crate::ports::progress::{BatchProgressNotifier, NoProgress};
use crate::ports::run_recorder::{NoRunRecorder, RunRecorder};
use crate::use_cases::fetch_batch::{FetchBatchUseCase, FetchError};
use chrono::{DateTime, Utc};
use consensus_domain::{
    BatchOutcome, ConsensusAnalysis, ConsensusAnalyzer, ModelCatalog, ModelId, Prompt,
    ResponseRecord, SummaryStatistics, generate_insights,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Errors that can occur while running a consensus round
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RunConsensusError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Input for the RunConsensus use case
#[derive(Debug, Clone)]
pub struct RunConsensusInput {
    pub prompt: Prompt,
    /// Selected models, in display order
    pub models: Vec<ModelId>,
    pub options: BatchOptions,
}

impl RunConsensusInput {
    pub fn new(prompt: Prompt, models: Vec<ModelId>) -> Self {
        Self {
            prompt,
            models,
            options: BatchOptions::default(),
        }
    }

    pub fn with_options(mut self, options: BatchOptions) -> Self {
        self.options = options;
        self
    }
}

/// Complete record of one prompt submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsensusRun {
    pub prompt: String,
    pub models: Vec<ModelId>,
    /// One outcome per model, in `models` order
    pub outcomes: Vec<BatchOutcome>,
    pub analysis: ConsensusAnalysis,
    pub insights: Vec<String>,
    pub summary: SummaryStatistics,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

impl ConsensusRun {
    pub fn succeeded(&self) -> impl Iterator<Item = &BatchOutcome> {
        self.outcomes.iter().filter(|o| o.is_success())
    }

    pub fn failed(&self) -> impl Iterator<Item = &BatchOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    pub fn duration_ms(&self) -> i64 {
        (self.completed_at - self.started_at).num_milliseconds()
    }
}

/// Build analyzer input from the successful outcomes.
///
/// Failed outcomes are dropped; provider and display name come from the
/// catalog (provider falls back to the id's namespace prefix).
pub fn response_records(outcomes: &[BatchOutcome], catalog: &ModelCatalog) -> Vec<ResponseRecord> {
    outcomes
        .iter()
        .filter_map(|outcome| {
            let result = outcome.result()?;
            let mut record = ResponseRecord::new(outcome.model_id.clone(), result.text.clone())
                .with_model_name(catalog.display_name(&outcome.model_id));
            if let Some(provider) = catalog.provider_for(&outcome.model_id) {
                record = record.with_provider(provider);
            }
            Some(record)
        })
        .collect()
}

/// Use case for running a consensus round
pub struct RunConsensusUseCase<G: CompletionGateway + 'static> {
    fetcher: FetchBatchUseCase<G>,
    catalog: ModelCatalog,
    analyzer: ConsensusAnalyzer,
    recorder: Arc<dyn RunRecorder>,
}

impl<G: CompletionGateway + 'static> RunConsensusUseCase<G> {
    pub fn new(gateway: Arc<G>, catalog: ModelCatalog) -> Self {
        Self {
            fetcher: FetchBatchUseCase::new(gateway),
            catalog,
            analyzer: ConsensusAnalyzer::default(),
            recorder: Arc::new(NoRunRecorder),
        }
    }

    pub fn with_analyzer(mut self, analyzer: ConsensusAnalyzer) -> Self {
        self.analyzer = analyzer;
        self
    }

    pub fn with_recorder(mut self, recorder: Arc<dyn RunRecorder>) -> Self {
        self.recorder = recorder;
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, input: RunConsensusInput) -> Result<ConsensusRun, RunConsensusError> {
        self.execute_with_progress(input, &NoProgress, &CancellationToken::new())
            .await
    }

    /// Execute the use case with progress callbacks and cancellation
    pub async fn execute_with_progress(
        &self,
        input: RunConsensusInput,
        progress: &dyn BatchProgressNotifier,
        cancel: &CancellationToken,
    ) -> Result<ConsensusRun, RunConsensusError> {
        let started_at = Utc::now();
        info!(models = input.models.len(), "Starting consensus run");

        let outcomes = self
            .fetcher
            .execute_with_progress(&input.models, &input.prompt, &input.options, progress, cancel)
            .await?;

        let records = response_records(&outcomes, &self.catalog);
        if records.is_empty() {
            warn!("No model produced a usable response");
        }

        let analysis = self.analyzer.analyze(&records);
        let insights = generate_insights(&analysis);
        let summary = SummaryStatistics::from_analysis(&analysis);

        info!(
            responses = analysis.total_responses,
            groups = analysis.groups.len(),
            consensus_level = analysis.consensus_level,
            top = %analysis.top_response_name,
            "Consensus analysis complete"
        );

        let run = ConsensusRun {
            prompt: input.prompt.into_content(),
            models: input.models,
            outcomes,
            analysis,
            insights,
            summary,
            started_at,
            completed_at: Utc::now(),
        };

        self.recorder.record(&run);

        Ok(run)
    }
}
