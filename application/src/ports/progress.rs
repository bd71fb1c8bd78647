//! Progress notification port
//!
//! Defines the interface for reporting progress while a batch of completion
//! requests is in flight.

use consensus_domain::ModelId;

/// Callback for progress updates during a batch fetch
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console, web UI, etc.)
pub trait BatchProgressNotifier: Send + Sync {
    /// Called once before any request is issued
    fn on_batch_start(&self, total_models: usize);

    /// Called when a chunk of concurrent requests is dispatched
    fn on_chunk_start(&self, _chunk_index: usize, _chunk_size: usize) {}

    /// Called when one model's request settles
    fn on_model_complete(&self, model: &ModelId, success: bool);

    /// Called after every model has an outcome
    fn on_batch_complete(&self, succeeded: usize, total: usize);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl BatchProgressNotifier for NoProgress {
    fn on_batch_start(&self, _total_models: usize) {}
    fn on_model_complete(&self, _model: &ModelId, _success: bool) {}
    fn on_batch_complete(&self, _succeeded: usize, _total: usize) {}
}
