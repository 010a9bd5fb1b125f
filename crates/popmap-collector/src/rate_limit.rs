//! Retry with exponential back-off and jitter for local search requests.
//!
//! Transient failures (429, 5xx, timeouts, refused connections) are retried;
//! everything else is returned on the first attempt.

use std::future::Future;
use std::time::Duration;

use crate::error::CollectorError;

/// Returns `true` if `err` represents a transient condition that should be
/// retried after a backoff delay.
fn is_retriable(err: &CollectorError) -> bool {
    match err {
        CollectorError::RateLimited { .. } => true,
        CollectorError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        CollectorError::UnexpectedStatus { status, .. } => *status >= 500,
        CollectorError::Deserialize { .. }
        | CollectorError::InvalidBaseUrl { .. }
        | CollectorError::SnapshotIo { .. }
        | CollectorError::SnapshotDecode { .. }
        | CollectorError::SnapshotEncode(_) => false,
    }
}

/// Upper bound for any single wait between attempts.
const MAX_DELAY_MS: u64 = 30_000;

/// Wait before retry `attempt` (1-based): `backoff_base_ms * 2^(attempt-1)`
/// with ±25 % jitter, raised to the server's `Retry-After` on a 429, capped
/// at 30 s.
fn retry_delay_ms(err: &CollectorError, attempt: u32, backoff_base_ms: u64) -> u64 {
    let computed = backoff_base_ms.saturating_mul(1u64 << attempt.saturating_sub(1).min(10));
    let capped = computed.min(MAX_DELAY_MS);
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let jittered = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;

    let requested = match err {
        CollectorError::RateLimited { retry_after_secs } => retry_after_secs.saturating_mul(1000),
        _ => 0,
    };
    jittered.max(requested).min(MAX_DELAY_MS)
}

/// Runs `operation` with up to `max_retries` additional attempts on
/// transient errors. With `max_retries = 3` the operation runs at most
/// four times.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, CollectorError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, CollectorError>>,
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
                let delay_ms = retry_delay_ms(&err, attempt, backoff_base_ms);
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "transient local search error, retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}
