//! Bounded fixed-interval polling for eventually-consistent operations
//!
//! The control plane applies mutations asynchronously; after every
//! create, update, or delete the client polls the resource until it
//! reaches a terminal state. Two budgets exist: a fixed attempt count
//! (deletion) and a wall-clock timeout (creation and update, whose
//! completion time varies widely).
//!
//! An operation reports one of three things per attempt:
//! - `Ok(PollState::Settled)` - terminal success, stop.
//! - `Ok(PollState::Pending)` - still settling, sleep and retry.
//! - `Err(e)` - stop immediately when `!e.is_retryable()`; otherwise the
//!   error is remembered and polling continues.
//!
//! Exhausting the budget is always an explicit [`Error::Timeout`]
//! carrying the last retryable error, never a silent success.
//!
//! There is no cancellation token: polling runs to its budget. The
//! budget is the caller's only escape hatch.

use std::time::{Duration, Instant};

use tracing::{debug, error, warn};

use crate::error::Error;

/// Default sleep between poll attempts
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Outcome of a single poll attempt
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PollState {
    /// The operation reached its terminal state
    Settled,
    /// The operation is still settling; poll again
    Pending,
}

/// Poll until settled or a fixed attempt count is exhausted
///
/// Returns the number of attempts used on success. Non-retryable errors
/// propagate immediately; retryable errors keep polling and surface
/// inside the final [`Error::Timeout`] if the budget runs out.
pub async fn poll_with_attempts<F, Fut>(
    interval: Duration,
    max_attempts: u32,
    operation_name: &str,
    mut operation: F,
) -> Result<u32, Error>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<PollState, Error>>,
{
    let start = Instant::now();
    let mut last_error: Option<Error> = None;

    for attempt in 1..=max_attempts {
        match operation().await {
            Ok(PollState::Settled) => {
                debug!(operation = %operation_name, attempt, "operation settled");
                return Ok(attempt);
            }
            Ok(PollState::Pending) => {
                debug!(operation = %operation_name, attempt, "still settling");
                last_error = None;
            }
            Err(e) if e.is_retryable() => {
                warn!(operation = %operation_name, attempt, error = %e, "poll attempt failed, retrying");
                last_error = Some(e);
            }
            Err(e) => {
                error!(operation = %operation_name, attempt, error = %e, "operation failed terminally");
                return Err(e);
            }
        }

        if attempt < max_attempts {
            tokio::time::sleep(interval).await;
        }
    }

    error!(operation = %operation_name, attempts = max_attempts, "attempt budget exhausted");
    Err(Error::timeout(operation_name, start.elapsed(), last_error))
}

/// Poll until settled or a wall-clock timeout elapses
///
/// Same per-attempt contract as [`poll_with_attempts`], bounded by
/// elapsed time instead of attempt count. The elapsed check runs after
/// each attempt, so the operation is always tried at least once.
pub async fn poll_until_timeout<F, Fut>(
    interval: Duration,
    timeout: Duration,
    operation_name: &str,
    mut operation: F,
) -> Result<(), Error>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<PollState, Error>>,
{
    let start = Instant::now();
    let mut last_error: Option<Error> = None;

    loop {
        match operation().await {
            Ok(PollState::Settled) => {
                debug!(operation = %operation_name, "operation settled");
                return Ok(());
            }
            Ok(PollState::Pending) => {
                debug!(operation = %operation_name, "still settling");
                last_error = None;
            }
            Err(e) if e.is_retryable() => {
                warn!(operation = %operation_name, error = %e, "poll attempt failed, retrying");
                last_error = Some(e);
            }
            Err(e) => {
                error!(operation = %operation_name, error = %e, "operation failed terminally");
                return Err(e);
            }
        }

        if start.elapsed() >= timeout {
            error!(operation = %operation_name, waited = ?start.elapsed(), "timeout exhausted");
            return Err(Error::timeout(operation_name, start.elapsed(), last_error));
        }

        tokio::time::sleep(interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    const TICK: Duration = Duration::from_millis(1);

    #[tokio::test]
    async fn test_settles_immediately() {
        let used = poll_with_attempts(TICK, 3, "op", || async { Ok(PollState::Settled) })
            .await
            .unwrap();
        assert_eq!(used, 1);
    }

    #[tokio::test]
    async fn test_settles_after_pending_attempts() {
        let count = Arc::new(AtomicU32::new(0));
        let c = count.clone();

        let used = poll_with_attempts(TICK, 5, "op", || {
            let c = c.clone();
            async move {
                if c.fetch_add(1, Ordering::SeqCst) < 2 {
                    Ok(PollState::Pending)
                } else {
                    Ok(PollState::Settled)
                }
            }
        })
        .await
        .unwrap();

        assert_eq!(used, 3);
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    /// Story: exhausting attempts is an explicit timeout, never success
    ///
    /// An operation that stayed pending through the whole budget never
    /// confirmed success; reporting Ok would hide an unfinished delete.
    #[tokio::test]
    async fn test_exhaustion_without_error_is_a_timeout() {
        let err = poll_with_attempts(TICK, 3, "delete nodepool np-1", || async {
            Ok(PollState::Pending)
        })
        .await
        .unwrap_err();

        match err {
            Error::Timeout { operation, last_error, .. } => {
                assert_eq!(operation, "delete nodepool np-1");
                assert!(last_error.is_none());
            }
            other => panic!("expected Timeout, got {other}"),
        }
    }

    /// Story: transient errors keep polling and surface in the timeout
    #[tokio::test]
    async fn test_retryable_errors_surface_in_the_timeout() {
        let err = poll_with_attempts(TICK, 3, "op", || async {
            Err(Error::api("bad gateway", Some(502)))
        })
        .await
        .unwrap_err();

        match err {
            Error::Timeout { last_error, .. } => {
                let last = last_error.expect("last error should be captured");
                assert!(last.contains("bad gateway"));
            }
            other => panic!("expected Timeout, got {other}"),
        }
    }

    /// Story: a terminal error stops polling at once
    #[tokio::test]
    async fn test_non_retryable_error_stops_immediately() {
        let count = Arc::new(AtomicU32::new(0));
        let c = count.clone();

        let err = poll_with_attempts(TICK, 5, "op", || {
            let c = c.clone();
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err(Error::terminal("np-1", "CREATE_FAILED", "boom"))
            }
        })
        .await
        .unwrap_err();

        assert!(matches!(err, Error::Terminal { .. }));
        assert_eq!(count.load(Ordering::SeqCst), 1, "must not retry a terminal error");
    }

    #[tokio::test]
    async fn test_timeout_mode_settles_before_deadline() {
        let count = Arc::new(AtomicU32::new(0));
        let c = count.clone();

        poll_until_timeout(TICK, Duration::from_secs(5), "op", || {
            let c = c.clone();
            async move {
                if c.fetch_add(1, Ordering::SeqCst) < 1 {
                    Ok(PollState::Pending)
                } else {
                    Ok(PollState::Settled)
                }
            }
        })
        .await
        .unwrap();

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_timeout_mode_expires() {
        let err = poll_until_timeout(TICK, Duration::from_millis(5), "cluster dev ready", || async {
            Ok(PollState::Pending)
        })
        .await
        .unwrap_err();

        assert!(matches!(err, Error::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_zero_timeout_still_tries_once() {
        let result = poll_until_timeout(TICK, Duration::ZERO, "op", || async {
            Ok(PollState::Settled)
        })
        .await;
        assert!(result.is_ok());
    }
}
