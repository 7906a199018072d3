//! Generic long-running task polling
//!
//! Vendor "create async job, poll for completion" workflows (image, video,
//! audio generation) all share the same skeleton: invoke a status poll,
//! stop when a terminal predicate holds, otherwise wait an interval and
//! poll again, bounded by an optional timeout and attempt budget.
//!
//! The poller retries on not-yet-terminal only. Errors raised by the poll
//! operation itself (HTTP failures, parse failures) propagate immediately
//! and are never swallowed or retried here.

use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

use crate::error::ProviderError;
use crate::utils::cancel::CancelHandle;

/// Bounds for one polling loop.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Wait between polls; must be > 0
    pub interval: Duration,
    /// Wall-clock bound on the whole wait
    pub timeout: Option<Duration>,
    /// Bound on the number of poll invocations
    pub max_attempts: Option<u32>,
}

impl PollConfig {
    /// Config polling every `interval`, unbounded until cancelled.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            timeout: None,
            max_attempts: None,
        }
    }

    /// Bound the total wall-clock wait.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Bound the number of poll invocations.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }
}

/// Poll `poll` until `is_terminal` holds for its result.
///
/// - The first poll happens immediately; a terminal first result returns
///   without any wait.
/// - Cancellation is raced against the in-flight poll and the inter-poll
///   wait, and wins at the next suspension point.
/// - Timeout produces [`ProviderError::PollingTimeout`] carrying the last
///   non-terminal result (debug-formatted) for diagnostics; attempt
///   exhaustion produces [`ProviderError::PollingExhausted`]; cancellation
///   produces [`ProviderError::Cancelled`]. The three are distinct.
pub async fn poll_until_terminal<R, F, Fut, P>(
    mut poll: F,
    mut is_terminal: P,
    config: &PollConfig,
    cancel: &CancelHandle,
) -> Result<R, ProviderError>
where
    R: std::fmt::Debug,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<R, ProviderError>>,
    P: FnMut(&R) -> bool,
{
    if config.interval.is_zero() {
        return Err(ProviderError::ConfigurationError(
            "poll interval must be greater than zero".to_string(),
        ));
    }

    let started = Instant::now();
    let deadline = config.timeout.map(|t| started + t);
    let mut attempts: u32 = 0;

    loop {
        if cancel.is_cancelled() {
            return Err(ProviderError::Cancelled(
                "polling cancelled by caller".to_string(),
            ));
        }

        attempts += 1;
        let result = tokio::select! {
            _ = cancel.cancelled() => {
                return Err(ProviderError::Cancelled(
                    "polling cancelled by caller".to_string(),
                ));
            }
            result = poll() => result?,
        };

        if is_terminal(&result) {
            tracing::debug!(attempts, "poll reached terminal state");
            return Ok(result);
        }

        if let Some(max) = config.max_attempts {
            if attempts >= max {
                return Err(ProviderError::PollingExhausted { attempts });
            }
        }

        let timeout_error = |last: &R| ProviderError::PollingTimeout {
            elapsed_ms: started.elapsed().as_millis() as u64,
            last_status: format!("{last:?}"),
        };

        // Cap the wait at the deadline so the loop fails at ~timeout
        // instead of overshooting by up to one interval.
        let wait = match deadline {
            Some(d) => {
                let now = Instant::now();
                if now >= d {
                    return Err(timeout_error(&result));
                }
                config.interval.min(d - now)
            }
            None => config.interval,
        };

        tokio::select! {
            _ = cancel.cancelled() => {
                return Err(ProviderError::Cancelled(
                    "polling cancelled by caller".to_string(),
                ));
            }
            _ = tokio::time::sleep(wait) => {}
        }

        if let Some(d) = deadline {
            if Instant::now() >= d {
                return Err(timeout_error(&result));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[derive(Debug, Clone, PartialEq)]
    struct Status(&'static str);

    fn done(status: &Status) -> bool {
        status.0 == "COMPLETED"
    }

    #[tokio::test]
    async fn terminal_on_first_check_returns_without_waiting() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = calls.clone();

        let started = std::time::Instant::now();
        let result = poll_until_terminal(
            move || {
                let calls = calls_clone.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(Status("COMPLETED"))
                }
            },
            done,
            &PollConfig::new(Duration::from_secs(60)),
            &CancelHandle::new(),
        )
        .await
        .expect("terminal result");

        assert_eq!(result, Status("COMPLETED"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        // No interval wait happened before or after the only poll.
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_fails_at_deadline_with_bounded_attempts() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = calls.clone();

        let config = PollConfig::new(Duration::from_secs(2)).with_timeout(Duration::from_secs(7));
        let err = poll_until_terminal(
            move || {
                let calls = calls_clone.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(Status("IN_PROGRESS"))
                }
            },
            done,
            &config,
            &CancelHandle::new(),
        )
        .await
        .expect_err("must time out");

        match err {
            ProviderError::PollingTimeout {
                elapsed_ms,
                last_status,
            } => {
                assert!(elapsed_ms >= 7_000);
                assert!(last_status.contains("IN_PROGRESS"));
            }
            other => panic!("unexpected error variant: {other:?}"),
        }

        // Polls at t = 0, 2, 4, 6; the capped wait ends at t = 7.
        let n = calls.load(Ordering::SeqCst);
        assert!(n >= 1);
        assert!(n <= 5, "polled {n} times, expected at most ceil(7/2) + 1");
    }

    #[tokio::test(start_paused = true)]
    async fn attempt_budget_is_exact_regardless_of_timeout() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = calls.clone();

        let config = PollConfig::new(Duration::from_millis(10))
            .with_timeout(Duration::from_secs(3600))
            .with_max_attempts(4);
        let err = poll_until_terminal(
            move || {
                let calls = calls_clone.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(Status("IN_PROGRESS"))
                }
            },
            done,
            &config,
            &CancelHandle::new(),
        )
        .await
        .expect_err("must exhaust attempts");

        assert!(matches!(
            err,
            ProviderError::PollingExhausted { attempts: 4 }
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn poll_error_propagates_immediately() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = calls.clone();

        let err = poll_until_terminal(
            move || {
                let calls = calls_clone.clone();
                async move {
                    let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                    if n == 2 {
                        Err(ProviderError::api_error(500, "backend exploded"))
                    } else {
                        Ok(Status("IN_PROGRESS"))
                    }
                }
            },
            done,
            &PollConfig::new(Duration::from_millis(10)).with_max_attempts(100),
            &CancelHandle::new(),
        )
        .await
        .expect_err("must propagate");

        assert!(matches!(err, ProviderError::ApiError { status: 500, .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn cancel_during_wait_stops_without_another_poll() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = calls.clone();
        let cancel = CancelHandle::new();
        let cancel_clone = cancel.clone();

        let task = tokio::spawn(async move {
            poll_until_terminal(
                move || {
                    let calls = calls_clone.clone();
                    async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        Ok(Status("IN_PROGRESS"))
                    }
                },
                done,
                &PollConfig::new(Duration::from_secs(3600)),
                &cancel_clone,
            )
            .await
        });

        // Let the first poll complete and the loop settle into its wait.
        tokio::time::sleep(Duration::from_millis(50)).await;
        cancel.cancel();

        let err = tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .expect("cancel should end the poll loop")
            .expect("task ok")
            .expect_err("must be cancelled");

        assert!(err.is_cancelled());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn zero_interval_is_a_configuration_error() {
        let err = poll_until_terminal(
            || async { Ok(Status("COMPLETED")) },
            done,
            &PollConfig::new(Duration::ZERO),
            &CancelHandle::new(),
        )
        .await
        .expect_err("must reject");

        assert!(matches!(err, ProviderError::ConfigurationError(_)));
    }
}
