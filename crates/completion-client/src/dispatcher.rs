//! Bounded completion dispatcher.
//!
//! The completion call is the only external I/O the pipeline blocks on, and
//! this is its single throughput-control point: a semaphore caps how many
//! completions are in flight at once (excess callers queue on the permit,
//! they do not spawn more network calls), and a per-call timeout guarantees
//! no call blocks forever. No retry here; that is a caller decision.

use std::sync::Arc;
use std::time::Duration;

use docbot_core::{CompletionError, PipelineError};
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use super::CompletionClient;

/// Default cap on concurrent in-flight completion calls.
pub const DEFAULT_MAX_IN_FLIGHT: usize = 10;

/// Default per-call timeout.
pub const DEFAULT_COMPLETION_TIMEOUT: Duration = Duration::from_secs(60);

/// Wraps a [`CompletionClient`] with a fixed-size permit pool and a per-call
/// timeout. Cheap to clone; clones share the permit pool.
#[derive(Clone)]
pub struct CompletionDispatcher {
    client: Arc<dyn CompletionClient>,
    permits: Arc<Semaphore>,
    timeout: Duration,
}

impl CompletionDispatcher {
    /// Creates a dispatcher with the default bound and timeout.
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        // Defaults are valid, so this cannot fail.
        Self {
            client,
            permits: Arc::new(Semaphore::new(DEFAULT_MAX_IN_FLIGHT)),
            timeout: DEFAULT_COMPLETION_TIMEOUT,
        }
    }

    /// Creates a dispatcher with an explicit in-flight cap and timeout.
    /// A zero cap or zero timeout is a configuration error.
    pub fn with_limits(
        client: Arc<dyn CompletionClient>,
        max_in_flight: usize,
        timeout: Duration,
    ) -> Result<Self, PipelineError> {
        if max_in_flight == 0 {
            return Err(PipelineError::Config(
                "completion max_in_flight must be at least 1".to_string(),
            ));
        }
        if timeout.is_zero() {
            return Err(PipelineError::Config(
                "completion timeout must be non-zero".to_string(),
            ));
        }
        Ok(Self {
            client,
            permits: Arc::new(Semaphore::new(max_in_flight)),
            timeout,
        })
    }

    /// Sends one rendered prompt, queueing while the in-flight cap is
    /// reached. Times out with [`CompletionError::Timeout`]; the timeout
    /// clock starts once a permit is held, so queueing never eats the call's
    /// own budget.
    pub async fn dispatch(&self, prompt: &str) -> Result<String, CompletionError> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| CompletionError::Service("dispatcher is shut down".to_string()))?;

        debug!(
            prompt_len = prompt.len(),
            available_permits = self.permits.available_permits(),
            "Dispatching completion request"
        );

        match tokio::time::timeout(self.timeout, self.client.complete(prompt)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(timeout = ?self.timeout, "Completion request timed out");
                Err(CompletionError::Timeout(self.timeout))
            }
        }
    }
}
