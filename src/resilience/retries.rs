//! Retry logic.
//!
//! # Responsibilities
//! - Run a fallible async operation a bounded number of times
//! - Wait a fixed delay between attempts
//! - Report the last failure once attempts are exhausted
//!
//! # Design Decisions
//! - Fixed delay, no backoff or jitter: the only caller is the store
//!   connector, which waits for a store that is still booting
//! - No sleep after the final attempt

use std::fmt;
use std::future::Future;
use std::time::Duration;

/// All attempts failed.
#[derive(Debug)]
pub struct Exhausted<E> {
    /// Number of attempts made.
    pub attempts: u32,
    /// Error returned by the final attempt.
    pub last_error: E,
}

/// Run `op` up to `max_attempts` times, sleeping `delay` between attempts.
///
/// `op` receives the 1-based attempt number. A `max_attempts` of zero is
/// treated as one.
pub async fn retry_fixed<T, E, F, Fut>(
    operation: &'static str,
    max_attempts: u32,
    delay: Duration,
    mut op: F,
) -> Result<T, Exhausted<E>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: fmt::Display,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) => {
                tracing::warn!(
                    operation,
                    attempt,
                    max_attempts,
                    error = %e,
                    "Attempt failed"
                );
                if attempt >= max_attempts {
                    return Err(Exhausted {
                        attempts: attempt,
                        last_error: e,
                    });
                }
                tokio::time::sleep(delay).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_first_success_stops_retrying() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = calls.clone();
        let result: Result<u32, Exhausted<String>> =
            retry_fixed("test", 5, Duration::from_millis(1), move |attempt| {
                let c = c.clone();
                async move {
                    c.fetch_add(1, Ordering::SeqCst);
                    if attempt < 3 {
                        Err(format!("not yet ({})", attempt))
                    } else {
                        Ok(attempt)
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exhaustion_reports_last_error() {
        let result: Result<(), _> = retry_fixed("test", 4, Duration::from_millis(1), |attempt| async move {
            Err::<(), _>(format!("fail {}", attempt))
        })
        .await;

        let exhausted = result.unwrap_err();
        assert_eq!(exhausted.attempts, 4);
        assert_eq!(exhausted.last_error, "fail 4");
    }

    #[tokio::test]
    async fn test_zero_attempts_runs_once() {
        let result: Result<(), _> =
            retry_fixed("test", 0, Duration::from_millis(1), |_| async { Err::<(), _>("down") }).await;
        assert_eq!(result.unwrap_err().attempts, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fixed_delay_between_attempts() {
        let start = tokio::time::Instant::now();
        let _: Result<(), _> =
            retry_fixed("test", 3, Duration::from_secs(1), |_| async { Err::<(), _>("down") }).await;
        // Two sleeps for three attempts.
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(2));
        assert!(elapsed < Duration::from_secs(3));
    }
}
