//! Retry with exponential back-off and jitter for listing fetches.
//!
//! Transient failures (network errors, 429, 5xx) are retried up to
//! `max_retries` additional times. Everything else, including a page that
//! loads but carries no status signal, is returned on the first failure.

use std::future::Future;
use std::time::Duration;

use crate::error::ScraperError;

const MAX_DELAY_MS: u64 = 60_000;

/// Returns `true` if `err` represents a transient condition that should be
/// retried after a backoff delay.
pub(crate) fn is_retriable(err: &ScraperError) -> bool {
    match err {
        ScraperError::Http(_) | ScraperError::RateLimited { .. } => true,
        ScraperError::UnexpectedStatus { status, .. } => (500..600).contains(status),
        ScraperError::NotFound { .. }
        | ScraperError::StatusUnavailable { .. }
        | ScraperError::InvalidUrl { .. } => false,
    }
}

/// Delay before retry number `attempt` (1-based), before jitter.
fn base_delay_ms(backoff_base_ms: u64, attempt: u32) -> u64 {
    backoff_base_ms
        .saturating_mul(1u64 << attempt.saturating_sub(1).min(10))
        .min(MAX_DELAY_MS)
}

/// Sleep before retry number `attempt`.
///
/// `unit_jitter` in `[0, 1)` scales the back-off by 0.75 to 1.25. A 429 that
/// carried `Retry-After` waits at least that long, still capped at 60 s.
fn retry_delay_ms(err: &ScraperError, backoff_base_ms: u64, attempt: u32, unit_jitter: f64) -> u64 {
    let capped = base_delay_ms(backoff_base_ms, attempt);
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let jittered = (capped as f64 * (unit_jitter * 0.5 + 0.75)) as u64;

    match err {
        ScraperError::RateLimited {
            retry_after_secs: Some(secs),
            ..
        } => jittered.max(secs.saturating_mul(1_000).min(MAX_DELAY_MS)),
        _ => jittered,
    }
}

/// Runs `operation` with up to `max_retries` additional attempts on transient
/// errors.
///
/// Back-off schedule with `backoff_base_ms = 2_000`:
///
/// | Retry | Sleep before it              |
/// |-------|------------------------------|
/// | 1     | 2 000 ms × 2⁰ ± 25 % jitter |
/// | 2     | 2 000 ms × 2¹ ± 25 % jitter |
///
/// Delay is capped at 60 s.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, ScraperError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScraperError>>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let delay_ms = retry_delay_ms(&err, backoff_base_ms, attempt, rand::random::<f64>());
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "transient listing fetch error, retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn server_error() -> ScraperError {
        ScraperError::UnexpectedStatus {
            status: 503,
            url: "https://example.com/listing".to_owned(),
        }
    }

    #[test]
    fn server_errors_and_rate_limits_are_retriable() {
        assert!(is_retriable(&server_error()));
        assert!(is_retriable(&ScraperError::RateLimited {
            url: "https://example.com".to_owned(),
            retry_after_secs: Some(1),
        }));
    }

    #[test]
    fn client_errors_are_not_retriable() {
        assert!(!is_retriable(&ScraperError::UnexpectedStatus {
            status: 403,
            url: "https://example.com".to_owned(),
        }));
        assert!(!is_retriable(&ScraperError::NotFound {
            url: "https://example.com".to_owned(),
        }));
    }

    #[test]
    fn missing_status_is_not_retriable() {
        assert!(!is_retriable(&ScraperError::StatusUnavailable {
            url: "https://example.com".to_owned(),
        }));
    }

    #[test]
    fn delay_doubles_and_caps() {
        assert_eq!(base_delay_ms(2_000, 1), 2_000);
        assert_eq!(base_delay_ms(2_000, 2), 4_000);
        assert_eq!(base_delay_ms(2_000, 3), 8_000);
        assert_eq!(base_delay_ms(2_000, 20), MAX_DELAY_MS);
    }

    fn rate_limited(retry_after_secs: Option<u64>) -> ScraperError {
        ScraperError::RateLimited {
            url: "https://example.com/listing".to_owned(),
            retry_after_secs,
        }
    }

    #[test]
    fn retry_after_raises_the_delay_above_backoff() {
        assert_eq!(retry_delay_ms(&rate_limited(Some(5)), 2_000, 1, 0.5), 5_000);
        assert_eq!(retry_delay_ms(&rate_limited(Some(5)), 0, 1, 0.5), 5_000);
    }

    #[test]
    fn backoff_wins_when_longer_than_retry_after() {
        assert_eq!(retry_delay_ms(&rate_limited(Some(1)), 8_000, 1, 0.5), 8_000);
    }

    #[test]
    fn retry_after_is_capped() {
        assert_eq!(
            retry_delay_ms(&rate_limited(Some(3_600)), 0, 1, 0.5),
            MAX_DELAY_MS
        );
    }

    #[test]
    fn missing_retry_after_uses_jittered_backoff() {
        assert_eq!(retry_delay_ms(&rate_limited(None), 2_000, 1, 0.0), 1_500);
        assert_eq!(retry_delay_ms(&server_error(), 2_000, 2, 0.5), 4_000);
    }

    #[tokio::test]
    async fn succeeds_immediately_on_first_try() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(3, 0, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Ok::<u32, ScraperError>(42)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_server_error_then_succeeds() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(3, 0, || {
            let c = Arc::clone(&c);
            async move {
                if c.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(server_error())
                } else {
                    Ok::<u32, ScraperError>(99)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 99);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn propagates_last_error_after_exhausting_retries() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(2, 0, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<u32, ScraperError>(server_error())
            }
        })
        .await;
        // max_retries=2 → 3 total attempts
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(matches!(
            result,
            Err(ScraperError::UnexpectedStatus { status: 503, .. })
        ));
    }

    #[tokio::test]
    async fn does_not_retry_status_unavailable() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(3, 0, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<u32, ScraperError>(ScraperError::StatusUnavailable {
                    url: "https://example.com".to_owned(),
                })
            }
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(ScraperError::StatusUnavailable { .. })));
    }
}
