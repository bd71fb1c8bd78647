//! Fetch Batch use case
//!
//! Requests one completion per model, bounded by a concurrency limit, and
//! returns one [`BatchOutcome`] per model in input order.
//!
//! Models are processed in consecutive chunks of `concurrency`. Every request
//! in a chunk runs as its own task; the next chunk starts only after the
//! slowest member of the current one has settled (success, error or
//! timeout), followed by a short `chunk_delay` pause. A failure, timeout or
//! panic in one request only ever affects that model's outcome.

use crate::config::{BatchOptions, BatchOptionsError};
use crate::ports::completion_gateway::{CompletionGateway, GatewayError};
use crate::ports::progress::{BatchProgressNotifier, NoProgress};
use consensus_domain::{BatchOutcome, CompletionRequest, CompletionResult, ModelId, Prompt};
use futures::StreamExt;
use futures::stream::FuturesUnordered;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Error message recorded for models that never ran or were interrupted
pub const CANCELLED_MESSAGE: &str = "Request cancelled";

/// Misuse errors; per-model failures never surface here
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("No models requested")]
    NoModels,

    #[error("Invalid batch options: {0}")]
    InvalidOptions(#[from] BatchOptionsError),
}

/// Use case for fetching completions from many models
pub struct FetchBatchUseCase<G: CompletionGateway + 'static> {
    gateway: Arc<G>,
}

impl<G: CompletionGateway + 'static> FetchBatchUseCase<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    /// Execute with no progress reporting and no cancellation
    pub async fn execute(
        &self,
        models: &[ModelId],
        prompt: &Prompt,
        options: &BatchOptions,
    ) -> Result<Vec<BatchOutcome>, FetchError> {
        self.execute_with_progress(models, prompt, options, &NoProgress, &CancellationToken::new())
            .await
    }

    /// Execute with progress callbacks and a cancellation token
    ///
    /// Cancelling resolves every unsettled model to [`CANCELLED_MESSAGE`];
    /// the returned sequence still holds one outcome per model.
    pub async fn execute_with_progress(
        &self,
        models: &[ModelId],
        prompt: &Prompt,
        options: &BatchOptions,
        progress: &dyn BatchProgressNotifier,
        cancel: &CancellationToken,
    ) -> Result<Vec<BatchOutcome>, FetchError> {
        if models.is_empty() {
            return Err(FetchError::NoModels);
        }
        options.validate()?;

        info!(
            models = models.len(),
            concurrency = options.concurrency,
            timeout_ms = options.timeout.as_millis() as u64,
            "Starting batch fetch"
        );
        progress.on_batch_start(models.len());

        let mut outcomes = Vec::with_capacity(models.len());

        for (chunk_index, chunk) in models.chunks(options.concurrency).enumerate() {
            if chunk_index > 0 && !options.chunk_delay.is_zero() {
                tokio::select! {
                    _ = cancel.cancelled() => {}
                    _ = tokio::time::sleep(options.chunk_delay) => {}
                }
            }

            if cancel.is_cancelled() {
                for model in chunk {
                    progress.on_model_complete(model, false);
                    outcomes.push(BatchOutcome::failure(model.clone(), CANCELLED_MESSAGE));
                }
                continue;
            }

            debug!(chunk = chunk_index, size = chunk.len(), "Dispatching chunk");
            progress.on_chunk_start(chunk_index, chunk.len());

            let mut pending: FuturesUnordered<_> = chunk
                .iter()
                .enumerate()
                .map(|(slot, model)| {
                    let gateway = Arc::clone(&self.gateway);
                    let request = options.request_for(model.clone(), prompt);
                    let timeout = options.timeout;
                    let cancel = cancel.clone();
                    let handle = tokio::spawn(async move {
                        Self::complete_one(gateway.as_ref(), request, timeout, &cancel).await
                    });
                    async move { (slot, handle.await) }
                })
                .collect();

            // Progress follows settle order; outcomes keep their input slot
            let mut slots: Vec<Option<BatchOutcome>> = (0..chunk.len()).map(|_| None).collect();
            while let Some((slot, joined)) = pending.next().await {
                let model = &chunk[slot];
                let outcome = match joined {
                    Ok(Ok(result)) => {
                        debug!(model = %model, elapsed_ms = result.elapsed_ms, "Model responded");
                        BatchOutcome::success(model.clone(), result)
                    }
                    Ok(Err(message)) => {
                        warn!(model = %model, error = %message, "Model failed");
                        BatchOutcome::failure(model.clone(), message)
                    }
                    Err(e) => {
                        warn!(model = %model, "Request task aborted: {}", e);
                        BatchOutcome::failure(model.clone(), format!("Request task failed: {}", e))
                    }
                };
                progress.on_model_complete(model, outcome.is_success());
                slots[slot] = Some(outcome);
            }
            outcomes.extend(slots.into_iter().flatten());
        }

        let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
        info!(succeeded, total = outcomes.len(), "Batch fetch complete");
        progress.on_batch_complete(succeeded, outcomes.len());

        Ok(outcomes)
    }

    /// Run one request under its own timer, folding every failure into a message
    async fn complete_one(
        gateway: &G,
        request: CompletionRequest,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<CompletionResult, String> {
        let call = tokio::time::timeout(timeout, gateway.complete(&request));

        let settled = tokio::select! {
            _ = cancel.cancelled() => return Err(CANCELLED_MESSAGE.to_string()),
            settled = call => settled,
        };

        match settled {
            Err(_) => Err(format!(
                "Request timed out after {}ms",
                timeout.as_millis()
            )),
            Ok(Err(e)) => Err(e.to_string()),
            Ok(Ok(result)) if result.text.trim().is_empty() => {
                Err(GatewayError::EmptyResponse.to_string())
            }
            Ok(Ok(result)) => Ok(result),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Instant;

    // ==================== Test Mocks ====================

    #[derive(Clone)]
    enum Behavior {
        Reply(&'static str, u64),
        Fail(GatewayError),
        Hang,
        Panic,
    }

    struct MockGateway {
        behaviors: HashMap<String, Behavior>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        events: Mutex<Vec<String>>,
    }

    impl MockGateway {
        fn new(behaviors: &[(&str, Behavior)]) -> Self {
            Self {
                behaviors: behaviors
                    .iter()
                    .map(|(id, b)| (id.to_string(), b.clone()))
                    .collect(),
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
                events: Mutex::new(Vec::new()),
            }
        }

        fn event_index(&self, event: &str) -> usize {
            self.events
                .lock()
                .unwrap()
                .iter()
                .position(|e| e == event)
                .unwrap_or_else(|| panic!("missing event {event}"))
        }
    }

    #[async_trait]
    impl CompletionGateway for MockGateway {
        async fn complete(
            &self,
            request: &CompletionRequest,
        ) -> Result<CompletionResult, GatewayError> {
            let id = request.model.to_string();
            let behavior = self
                .behaviors
                .get(&id)
                .cloned()
                .unwrap_or(Behavior::Reply("default", 0));

            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            self.events.lock().unwrap().push(format!("start:{id}"));

            let result = match behavior {
                Behavior::Reply(text, delay_ms) => {
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                    Ok(CompletionResult::new(text, delay_ms))
                }
                Behavior::Fail(e) => Err(e),
                Behavior::Hang => std::future::pending().await,
                Behavior::Panic => panic!("gateway blew up"),
            };

            self.events.lock().unwrap().push(format!("end:{id}"));
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            result
        }
    }

    fn ids(names: &[&str]) -> Vec<ModelId> {
        names.iter().map(|n| ModelId::new(*n).unwrap()).collect()
    }

    fn prompt() -> Prompt {
        Prompt::try_new("Capital of France? One word.").unwrap()
    }

    fn fast_options() -> BatchOptions {
        BatchOptions::default().with_chunk_delay(Duration::ZERO)
    }

    // ==================== Tests ====================

    #[tokio::test]
    async fn test_outcomes_match_input_order() {
        // later models finish first
        let gateway = Arc::new(MockGateway::new(&[
            ("a", Behavior::Reply("Paris", 60)),
            ("b", Behavior::Reply("paris", 30)),
            ("c", Behavior::Reply("Paris!", 1)),
        ]));
        let use_case = FetchBatchUseCase::new(gateway);
        let models = ids(&["a", "b", "c"]);

        let outcomes = use_case
            .execute(&models, &prompt(), &fast_options())
            .await
            .unwrap();

        assert_eq!(outcomes.len(), 3);
        for (outcome, model) in outcomes.iter().zip(&models) {
            assert_eq!(&outcome.model_id, model);
        }
        assert_eq!(outcomes[0].result().unwrap().text, "Paris");
        assert_eq!(outcomes[2].result().unwrap().text, "Paris!");
    }

    #[tokio::test]
    async fn test_failure_is_isolated() {
        let gateway = Arc::new(MockGateway::new(&[
            ("a", Behavior::Reply("Paris", 1)),
            (
                "b",
                Behavior::Fail(GatewayError::HttpStatus {
                    status: 500,
                    message: "upstream exploded".to_string(),
                }),
            ),
            ("c", Behavior::Reply("Paris", 1)),
        ]));
        let use_case = FetchBatchUseCase::new(gateway);

        let outcomes = use_case
            .execute(&ids(&["a", "b", "c"]), &prompt(), &fast_options())
            .await
            .unwrap();

        assert!(outcomes[0].is_success());
        assert!(outcomes[2].is_success());
        let error = outcomes[1].error().unwrap();
        assert!(error.contains("500"));
        assert!(error.contains("upstream exploded"));
    }

    #[tokio::test]
    async fn test_panic_is_isolated() {
        let gateway = Arc::new(MockGateway::new(&[
            ("a", Behavior::Reply("Paris", 1)),
            ("b", Behavior::Panic),
            ("c", Behavior::Reply("Paris", 1)),
        ]));
        let use_case = FetchBatchUseCase::new(gateway);

        let outcomes = use_case
            .execute(&ids(&["a", "b", "c"]), &prompt(), &fast_options())
            .await
            .unwrap();

        assert!(outcomes[0].is_success());
        assert!(outcomes[1].error().unwrap().starts_with("Request task failed"));
        assert!(outcomes[2].is_success());
    }

    #[tokio::test]
    async fn test_hanging_model_times_out() {
        let gateway = Arc::new(MockGateway::new(&[
            ("a", Behavior::Reply("Paris", 1)),
            ("slow", Behavior::Hang),
        ]));
        let use_case = FetchBatchUseCase::new(gateway);
        let options = fast_options().with_timeout(Duration::from_millis(50));

        let started = Instant::now();
        let outcomes = use_case
            .execute(&ids(&["a", "slow"]), &prompt(), &options)
            .await
            .unwrap();

        assert!(started.elapsed() < Duration::from_secs(2));
        assert!(outcomes[0].is_success());
        assert_eq!(outcomes[1].error(), Some("Request timed out after 50ms"));
    }

    #[tokio::test]
    async fn test_blank_text_becomes_error() {
        let gateway = Arc::new(MockGateway::new(&[
            ("a", Behavior::Reply("   \n", 1)),
            ("b", Behavior::Reply("Paris", 1)),
        ]));
        let use_case = FetchBatchUseCase::new(gateway);

        let outcomes = use_case
            .execute(&ids(&["a", "b"]), &prompt(), &fast_options())
            .await
            .unwrap();

        assert_eq!(outcomes[0].error(), Some("Model returned an empty response"));
        assert!(outcomes[1].is_success());
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let behaviors: Vec<(&str, Behavior)> = ["a", "b", "c", "d", "e"]
            .iter()
            .map(|id| (*id, Behavior::Reply("x", 20)))
            .collect();
        let gateway = Arc::new(MockGateway::new(&behaviors));
        let use_case = FetchBatchUseCase::new(Arc::clone(&gateway));

        let outcomes = use_case
            .execute(
                &ids(&["a", "b", "c", "d", "e"]),
                &prompt(),
                &fast_options().with_concurrency(2),
            )
            .await
            .unwrap();

        assert_eq!(outcomes.len(), 5);
        assert_eq!(gateway.max_in_flight.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_next_chunk_waits_for_slowest_member() {
        let gateway = Arc::new(MockGateway::new(&[
            ("slow", Behavior::Reply("x", 80)),
            ("fast", Behavior::Reply("x", 1)),
            ("next", Behavior::Reply("x", 1)),
        ]));
        let use_case = FetchBatchUseCase::new(Arc::clone(&gateway));

        use_case
            .execute(
                &ids(&["slow", "fast", "next"]),
                &prompt(),
                &fast_options().with_concurrency(2),
            )
            .await
            .unwrap();

        assert!(gateway.event_index("end:slow") < gateway.event_index("start:next"));
        assert!(gateway.event_index("start:fast") < gateway.event_index("end:slow"));
    }

    #[tokio::test]
    async fn test_chunk_delay_pauses_between_chunks() {
        let gateway = Arc::new(MockGateway::new(&[
            ("a", Behavior::Reply("x", 0)),
            ("b", Behavior::Reply("x", 0)),
            ("c", Behavior::Reply("x", 0)),
        ]));
        let use_case = FetchBatchUseCase::new(Arc::clone(&gateway));
        let options = BatchOptions::default()
            .with_concurrency(1)
            .with_chunk_delay(Duration::from_millis(120));

        let started = Instant::now();
        let outcomes = use_case
            .execute(&ids(&["a", "b", "c"]), &prompt(), &options)
            .await
            .unwrap();
        let elapsed = started.elapsed();

        // three chunks, two pauses
        assert_eq!(outcomes.len(), 3);
        assert!(elapsed >= Duration::from_millis(240), "elapsed {elapsed:?}");
        assert!(gateway.event_index("end:a") < gateway.event_index("start:b"));
        assert!(gateway.event_index("end:b") < gateway.event_index("start:c"));
    }

    #[tokio::test]
    async fn test_zero_chunk_delay_skips_pause() {
        let gateway = Arc::new(MockGateway::new(&[]));
        let use_case = FetchBatchUseCase::new(gateway);
        let options = fast_options().with_concurrency(1);

        let started = Instant::now();
        use_case
            .execute(&ids(&["a", "b", "c"]), &prompt(), &options)
            .await
            .unwrap();

        assert!(started.elapsed() < Duration::from_millis(240));
    }

    #[tokio::test]
    async fn test_empty_model_list_is_misuse() {
        let gateway = Arc::new(MockGateway::new(&[]));
        let use_case = FetchBatchUseCase::new(gateway);

        let result = use_case.execute(&[], &prompt(), &fast_options()).await;
        assert_eq!(result.unwrap_err(), FetchError::NoModels);
    }

    #[tokio::test]
    async fn test_invalid_options_rejected() {
        let gateway = Arc::new(MockGateway::new(&[]));
        let use_case = FetchBatchUseCase::new(gateway);

        let result = use_case
            .execute(&ids(&["a"]), &prompt(), &fast_options().with_concurrency(0))
            .await;
        assert_eq!(
            result.unwrap_err(),
            FetchError::InvalidOptions(BatchOptionsError::ZeroConcurrency)
        );
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let gateway = Arc::new(MockGateway::new(&[]));
        let use_case = FetchBatchUseCase::new(Arc::clone(&gateway));
        let cancel = CancellationToken::new();
        cancel.cancel();

        let outcomes = use_case
            .execute_with_progress(&ids(&["a", "b"]), &prompt(), &fast_options(), &NoProgress, &cancel)
            .await
            .unwrap();

        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(|o| o.error() == Some(CANCELLED_MESSAGE)));
        assert!(gateway.events.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_interrupts_in_flight_requests() {
        let gateway = Arc::new(MockGateway::new(&[
            ("a", Behavior::Reply("Paris", 1)),
            ("hang", Behavior::Hang),
            ("later", Behavior::Reply("Paris", 1)),
        ]));
        let use_case = FetchBatchUseCase::new(gateway);
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(30)).await;
            trigger.cancel();
        });

        let outcomes = use_case
            .execute_with_progress(
                &ids(&["a", "hang", "later"]),
                &prompt(),
                &fast_options().with_concurrency(2),
                &NoProgress,
                &cancel,
            )
            .await
            .unwrap();

        assert!(outcomes[0].is_success());
        assert_eq!(outcomes[1].error(), Some(CANCELLED_MESSAGE));
        assert_eq!(outcomes[2].error(), Some(CANCELLED_MESSAGE));
    }

    #[tokio::test]
    async fn test_progress_callbacks() {
        struct Recording {
            completed: Mutex<Vec<(String, bool)>>,
            summary: Mutex<Option<(usize, usize)>>,
        }

        impl BatchProgressNotifier for Recording {
            fn on_batch_start(&self, total_models: usize) {
                assert_eq!(total_models, 2);
            }
            fn on_model_complete(&self, model: &ModelId, success: bool) {
                self.completed
                    .lock()
                    .unwrap()
                    .push((model.to_string(), success));
            }
            fn on_batch_complete(&self, succeeded: usize, total: usize) {
                *self.summary.lock().unwrap() = Some((succeeded, total));
            }
        }

        // "a" settles well after "b"
        let gateway = Arc::new(MockGateway::new(&[
            ("a", Behavior::Reply("Paris", 60)),
            ("b", Behavior::Fail(GatewayError::NoChoices)),
        ]));
        let use_case = FetchBatchUseCase::new(gateway);
        let progress = Recording {
            completed: Mutex::new(Vec::new()),
            summary: Mutex::new(None),
        };

        let outcomes = use_case
            .execute_with_progress(
                &ids(&["a", "b"]),
                &prompt(),
                &fast_options(),
                &progress,
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        // reported as each request settles, without waiting for the chunk
        assert_eq!(
            *progress.completed.lock().unwrap(),
            vec![("b".to_string(), false), ("a".to_string(), true)]
        );
        assert_eq!(outcomes[0].model_id.as_str(), "a");
        assert_eq!(outcomes[1].model_id.as_str(), "b");
        assert_eq!(*progress.summary.lock().unwrap(), Some((1, 2)));
    }
}
