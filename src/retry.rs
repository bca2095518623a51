//! Bounded retry with squared backoff.
//!
//! Cluster deletion races the upstream control plane: GKE refuses the delete
//! while another cluster operation is still running. This module retries a
//! single retryable error class with growing `attempt * attempt` second gaps
//! and gives up after a fixed number of attempts. Any other error stops the
//! loop immediately.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

/// Execute an async operation, retrying on a caller-selected error class.
///
/// The operation runs up to `max_attempts` times. After a retryable failure
/// on attempt `i` the loop sleeps `i * i` seconds before trying again
/// (1s, 4s, 9s, ...). Non-retryable errors and the final attempt's error are
/// returned as-is.
pub async fn retry_with_squared_backoff<F, Fut, T, E, P>(
    max_attempts: u32,
    operation_name: &str,
    mut is_retryable: P,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: FnMut(&E) -> bool,
    E: std::fmt::Display,
{
    let mut attempt = 0u32;

    loop {
        attempt += 1;

        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) if attempt < max_attempts && is_retryable(&e) => {
                let delay = Duration::from_secs(u64::from(attempt * attempt));
                warn!(
                    operation = %operation_name,
                    attempt = attempt,
                    delay_secs = delay.as_secs(),
                    error = %e,
                    "operation busy, retrying"
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn succeeds_immediately_without_sleeping() {
        let result: Result<i32, String> =
            retry_with_squared_backoff(11, "op", |_| true, || async { Ok(42) }).await;
        assert_eq!(result, Ok(42));
    }

    #[tokio::test(start_paused = true)]
    async fn retries_with_squared_gaps_until_success() {
        let count = Arc::new(AtomicU32::new(0));
        let c = count.clone();
        let start = tokio::time::Instant::now();

        let result: Result<i32, String> = retry_with_squared_backoff(
            11,
            "op",
            |e: &String| e.contains("busy"),
            || {
                let c = c.clone();
                async move {
                    if c.fetch_add(1, Ordering::SeqCst) < 2 {
                        Err("busy".to_string())
                    } else {
                        Ok(7)
                    }
                }
            },
        )
        .await;

        assert_eq!(result, Ok(7));
        assert_eq!(count.load(Ordering::SeqCst), 3);
        // two transient failures: gaps of 1s then 4s
        assert_eq!(start.elapsed(), Duration::from_secs(5));
    }

    #[tokio::test]
    async fn non_retryable_error_stops_after_one_attempt() {
        let count = Arc::new(AtomicU32::new(0));
        let c = count.clone();

        let result: Result<i32, String> = retry_with_squared_backoff(
            11,
            "op",
            |e: &String| e.contains("busy"),
            || {
                let c = c.clone();
                async move {
                    c.fetch_add(1, Ordering::SeqCst);
                    Err("permission denied".to_string())
                }
            },
        )
        .await;

        assert_eq!(result, Err("permission denied".to_string()));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn attempt_bound_is_respected() {
        let count = Arc::new(AtomicU32::new(0));
        let c = count.clone();

        let result: Result<i32, String> = retry_with_squared_backoff(
            11,
            "op",
            |_: &String| true,
            || {
                let c = c.clone();
                async move {
                    c.fetch_add(1, Ordering::SeqCst);
                    Err("busy".to_string())
                }
            },
        )
        .await;

        assert_eq!(result, Err("busy".to_string()));
        assert_eq!(count.load(Ordering::SeqCst), 11);
    }
}
