//! Post-login copy retry protocol

use std::future::Future;

use log::debug;
use tokio::time::sleep;

use crate::config::RetryConfig;
use crate::error::Result;
use crate::ops::copy::CopySummary;

/// Re-run the copy pipeline after a successful login. A copy that
/// succeeds with zero attempted cookies means the session cookie is not
/// yet visible to the store; wait out the fixed delay and try again, up
/// to the configured budget. Copy *failure* is final here; the
/// orchestrator's own per-item policy already covers partial failure.
/// The last attempt's outcome is returned regardless of remaining
/// budget.
pub async fn copy_with_retry<F, Fut>(retry: &RetryConfig, mut attempt: F) -> Result<CopySummary>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<CopySummary>>,
{
    let mut summary = attempt().await?;
    for round in 1..=retry.attempts {
        if summary.attempted > 0 {
            break;
        }
        debug!(
            "no cookies visible yet, retry {}/{} after {}ms",
            round,
            retry.attempts,
            retry.delay.as_millis()
        );
        sleep(retry.delay).await;
        summary = attempt().await?;
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CookieportError;
    use std::cell::Cell;
    use std::time::Duration;
    use tokio::time::Instant;

    fn retry() -> RetryConfig {
        RetryConfig {
            attempts: 3,
            delay: Duration::from_millis(700),
        }
    }

    fn summary(attempted: usize, copied: usize) -> CopySummary {
        CopySummary {
            attempted,
            copied,
            skipped: 0,
            errors: Vec::new(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn zero_attempted_is_retried_after_the_delay() {
        let calls = Cell::new(0u32);
        let start = Instant::now();

        let result = copy_with_retry(&retry(), || {
            calls.set(calls.get() + 1);
            let call = calls.get();
            async move {
                if call == 1 {
                    Ok(summary(0, 0))
                } else {
                    Ok(summary(2, 2))
                }
            }
        })
        .await
        .expect("second attempt");

        assert_eq!(calls.get(), 2);
        assert_eq!(result.attempted, 2);
        assert_eq!(result.copied, 2);
        assert!(start.elapsed() >= Duration::from_millis(700));
    }

    #[tokio::test(start_paused = true)]
    async fn non_empty_first_attempt_is_returned_immediately() {
        let calls = Cell::new(0u32);

        let result = copy_with_retry(&retry(), || {
            calls.set(calls.get() + 1);
            async { Ok(summary(1, 1)) }
        })
        .await
        .expect("first attempt");

        assert_eq!(calls.get(), 1);
        assert_eq!(result.attempted, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn budget_exhaustion_surfaces_the_last_empty_summary() {
        let calls = Cell::new(0u32);

        let result = copy_with_retry(&retry(), || {
            calls.set(calls.get() + 1);
            async { Ok(summary(0, 0)) }
        })
        .await
        .expect("empty but successful");

        // first attempt plus three retries
        assert_eq!(calls.get(), 4);
        assert_eq!(result.attempted, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn copy_failure_is_not_retried() {
        let calls = Cell::new(0u32);

        let err = copy_with_retry(&retry(), || {
            calls.set(calls.get() + 1);
            async { Err(CookieportError::Lookup("store went away".to_string())) }
        })
        .await
        .expect_err("failure is final");

        assert_eq!(calls.get(), 1);
        assert!(matches!(err, CookieportError::Lookup(_)));
    }
}
