//! Bounded retry around single Slack requests.

use std::future::Future;
use tokio_retry::strategy::FixedInterval;
use tokio_retry::RetryIf;
use tracing::{debug, warn};

use crate::errors::{Result, SlackError};
use crate::response::ResponseRecord;

/// How many times a request is attempted
///
/// Failed attempts are retried immediately, without backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RetryPolicy {
    /// Maximum number of attempts, including the first one. Never below 1.
    pub(crate) max_attempts: u32,
}

/// Why a single attempt did not produce a final record
enum AttemptError {
    Failed(SlackError),
    /// Slack answered with a 5xx or 429
    Transient(ResponseRecord),
}

impl AttemptError {
    fn is_retryable(&self) -> bool {
        match self {
            Self::Failed(err) => err.is_retryable(),
            Self::Transient(_) => true,
        }
    }
}

impl RetryPolicy {
    pub(crate) const DEFAULT_MAX_ATTEMPTS: u32 = 3;

    pub(crate) const fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: if max_attempts == 0 { 1 } else { max_attempts },
        }
    }

    /// Run `attempt` until it yields a final record, fails permanently, or the budget is spent
    ///
    /// `attempt` builds and sends a fresh request every time, since multipart
    /// bodies cannot be replayed. A 5xx or 429 record is retried; when the
    /// budget runs out the last record is returned as is.
    pub(crate) async fn run<F, Fut>(&self, mut attempt: F) -> Result<ResponseRecord>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<ResponseRecord>>,
    {
        let strategy = FixedInterval::from_millis(0).take(self.max_attempts as usize - 1);

        let outcome = RetryIf::spawn(
            strategy,
            || {
                let sent = attempt();
                async move {
                    match sent.await {
                        Ok(record) if record.is_transient() => {
                            Err(AttemptError::Transient(record))
                        }
                        Ok(record) => Ok(record),
                        Err(err) => Err(AttemptError::Failed(err)),
                    }
                }
            },
            |err: &AttemptError| {
                let retry = err.is_retryable();
                if retry {
                    match err {
                        AttemptError::Failed(err) => {
                            warn!(max_attempts = self.max_attempts, error = %err, "Retrying Slack request")
                        }
                        AttemptError::Transient(record) => {
                            warn!(max_attempts = self.max_attempts, status = %record.status, "Retrying Slack request")
                        }
                    }
                }
                retry
            },
        )
        .await;

        match outcome {
            Ok(record) => Ok(record),
            Err(AttemptError::Transient(record)) => {
                debug!(status = %record.status, "Retries exhausted, returning last response");
                Ok(record)
            }
            Err(AttemptError::Failed(err)) => {
                debug!(error = %err, "Slack request failed");
                Err(err)
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_ATTEMPTS)
    }
}
