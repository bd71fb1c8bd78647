//! Completion entities exchanged with the model gateway.
//!
//! - [`CompletionRequest`] - one prompt addressed to one model
//! - [`CompletionResult`] - successful completion text plus timing/usage
//! - [`BatchOutcome`] - per-model result-or-error produced by a batch fetch

use crate::core::model::ModelId;
use serde::{Deserialize, Serialize};

/// A single completion request for one model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionRequest {
    pub model: ModelId,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    pub temperature: f32,
}

/// Token accounting reported by the gateway
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Successful completion from one model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionResult {
    pub text: String,
    pub elapsed_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
}

impl CompletionResult {
    pub fn new(text: impl Into<String>, elapsed_ms: u64) -> Self {
        Self {
            text: text.into(),
            elapsed_ms,
            usage: None,
        }
    }

    pub fn with_usage(mut self, usage: TokenUsage) -> Self {
        self.usage = Some(usage);
        self
    }
}

/// Outcome of one model's request within a batch
///
/// Serialized as `{"modelId": .., "result": {..}}` or
/// `{"modelId": .., "error": ".."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "BatchOutcomeRepr", try_from = "BatchOutcomeRepr")]
pub struct BatchOutcome {
    pub model_id: ModelId,
    pub outcome: Result<CompletionResult, String>,
}

impl BatchOutcome {
    pub fn success(model_id: ModelId, result: CompletionResult) -> Self {
        Self {
            model_id,
            outcome: Ok(result),
        }
    }

    pub fn failure(model_id: ModelId, error: impl Into<String>) -> Self {
        Self {
            model_id,
            outcome: Err(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn result(&self) -> Option<&CompletionResult> {
        self.outcome.as_ref().ok()
    }

    pub fn error(&self) -> Option<&str> {
        self.outcome.as_ref().err().map(String::as_str)
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BatchOutcomeRepr {
    model_id: ModelId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    result: Option<CompletionResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl From<BatchOutcome> for BatchOutcomeRepr {
    fn from(outcome: BatchOutcome) -> Self {
        let (result, error) = match outcome.outcome {
            Ok(result) => (Some(result), None),
            Err(error) => (None, Some(error)),
        };
        Self {
            model_id: outcome.model_id,
            result,
            error,
        }
    }
}

impl TryFrom<BatchOutcomeRepr> for BatchOutcome {
    type Error = String;

    fn try_from(repr: BatchOutcomeRepr) -> Result<Self, Self::Error> {
        let outcome = match (repr.result, repr.error) {
            (Some(result), None) => Ok(result),
            (None, Some(error)) => Err(error),
            _ => {
                return Err(format!(
                    "outcome for {} must carry exactly one of result/error",
                    repr.model_id
                ));
            }
        };
        Ok(Self {
            model_id: repr.model_id,
            outcome,
        })
    }
}
