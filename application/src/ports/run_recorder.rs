//! Port for persisting completed consensus runs.
//!
//! Persistence of runs is owned by whatever store the deployment uses; the
//! use case only hands each finished [`ConsensusRun`] to this port.

use crate::use_cases::run_consensus::ConsensusRun;

/// Port for recording completed runs.
///
/// `record` is synchronous and non-fallible: a recording failure must never
/// turn a successful run into an error. Implementations log and move on.
pub trait RunRecorder: Send + Sync {
    /// Record a completed run.
    fn record(&self, run: &ConsensusRun);
}

/// No-op implementation for tests and when recording is disabled.
pub struct NoRunRecorder;

impl RunRecorder for NoRunRecorder {
    fn record(&self, _run: &ConsensusRun) {}
}
