use std::future::Future;
use std::time::Duration;

use crate::errors::{TaskDeskError, TaskDeskResult};

/// Bounded retry with a fixed backoff between attempts.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    pub const fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts,
            backoff,
        }
    }
}

/// Tagged result of one retry attempt.
pub enum AttemptOutcome<T> {
    Success(T),
    Failure(TaskDeskError),
}

impl<T> AttemptOutcome<T> {
    fn from_result(result: TaskDeskResult<T>) -> Self {
        match result {
            Ok(value) => AttemptOutcome::Success(value),
            Err(error) => AttemptOutcome::Failure(error),
        }
    }
}

/// Runs `action` up to `policy.max_attempts` times. Non-retryable errors
/// (structural validation, configuration) fail immediately; on exhaustion the
/// last captured error is re-raised unchanged.
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    description: &str,
    action: F,
) -> TaskDeskResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = TaskDeskResult<T>>,
{
    with_retry_or(policy, description, action, || async {}).await
}

/// Like [`with_retry`], but runs `on_exhaustion` exactly once before
/// re-raising the final error; used to capture a diagnostic snapshot when the
/// send action runs out of attempts.
pub async fn with_retry_or<T, F, Fut, H, HFut>(
    policy: &RetryPolicy,
    description: &str,
    mut action: F,
    on_exhaustion: H,
) -> TaskDeskResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = TaskDeskResult<T>>,
    H: FnOnce() -> HFut,
    HFut: Future<Output = ()>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut last_error: Option<TaskDeskError> = None;

    for attempt in 1..=max_attempts {
        match AttemptOutcome::from_result(action().await) {
            AttemptOutcome::Success(value) => {
                if attempt > 1 {
                    tracing::debug!(attempt, description, "succeeded after retry");
                }
                return Ok(value);
            }
            AttemptOutcome::Failure(error) if !error.is_retryable() => return Err(error),
            AttemptOutcome::Failure(error) => {
                tracing::warn!(attempt, max_attempts, %error, "{description} failed");
                last_error = Some(error);
                if attempt < max_attempts {
                    tokio::time::sleep(policy.backoff).await;
                }
            }
        }
    }

    on_exhaustion().await;
    Err(last_error.unwrap_or_else(|| {
        TaskDeskError::Automation(format!("{description}: retries exhausted"))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn policy() -> RetryPolicy {
        RetryPolicy::new(3, Duration::from_secs(1))
    }

    #[tokio::test(start_paused = true)]
    async fn success_after_k_failures_takes_k_plus_one_attempts() {
        let attempts = Arc::new(AtomicU32::new(0));
        let counter = attempts.clone();

        let result = with_retry(&policy(), "fill field", || {
            let counter = counter.clone();
            async move {
                let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                if n <= 2 {
                    Err(TaskDeskError::Automation("transient".into()))
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        assert_eq!(result.expect("third attempt succeeds"), 3);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn exhaustion_runs_hook_once_and_reraises_original_error() {
        let attempts = Arc::new(AtomicU32::new(0));
        let hook_runs = Arc::new(AtomicU32::new(0));
        let counter = attempts.clone();
        let hook_counter = hook_runs.clone();

        let result: TaskDeskResult<()> = with_retry_or(
            &policy(),
            "send email",
            || {
                let counter = counter.clone();
                async move {
                    let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                    Err(TaskDeskError::Automation(format!("boom {n}")))
                }
            },
            || {
                let hook_counter = hook_counter.clone();
                async move {
                    hook_counter.fetch_add(1, Ordering::SeqCst);
                }
            },
        )
        .await;

        let error = result.expect_err("all attempts fail");
        // The original (last) error comes back, not a generic wrapper.
        assert_eq!(error.to_string(), "Automation error: boom 3");
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
        assert_eq!(hook_runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn structural_errors_are_not_retried() {
        let attempts = Arc::new(AtomicU32::new(0));
        let hook_runs = Arc::new(AtomicU32::new(0));
        let counter = attempts.clone();
        let hook_counter = hook_runs.clone();

        let result: TaskDeskResult<()> = with_retry_or(
            &policy(),
            "send email",
            || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err(TaskDeskError::Validation("no recipient".into()))
                }
            },
            || {
                let hook_counter = hook_counter.clone();
                async move {
                    hook_counter.fetch_add(1, Ordering::SeqCst);
                }
            },
        )
        .await;

        assert!(matches!(result, Err(TaskDeskError::Validation(_))));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
        assert_eq!(hook_runs.load(Ordering::SeqCst), 0);
    }
}
