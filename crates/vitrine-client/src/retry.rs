//! Bounded retry with exponential back-off and jitter for catalog API calls.
//!
//! Transport failures, non-2xx statuses and malformed envelopes are all
//! retried with the same request. Each failed attempt is tagged with a fresh
//! [`ErrorId`] and logged before the next attempt; once the bound is hit the
//! last failure is wrapped in [`ClientError::ExhaustedRetries`].

use std::future::Future;
use std::time::Duration;

use vitrine_core::ErrorId;

use crate::error::ClientError;

/// Returns `true` for errors that a retry of the identical request may fix.
///
/// Construction errors and already-wrapped exhaustion errors are final.
pub(crate) fn is_retriable(err: &ClientError) -> bool {
    match err {
        ClientError::Http(_)
        | ClientError::UnexpectedStatus { .. }
        | ClientError::Deserialize { .. } => true,
        ClientError::InvalidBaseUrl { .. } | ClientError::ExhaustedRetries { .. } => false,
    }
}

/// Runs `operation` with up to `max_retries` additional attempts.
///
/// Back-off schedule with `backoff_base_ms = 250`:
///
/// | Retry | Sleep before it               |
/// |-------|-------------------------------|
/// | 1     | 250 ms × 2⁰ ± 25 % jitter     |
/// | 2     | 250 ms × 2¹ ± 25 % jitter     |
///
/// Delay is capped at 30 s. A base of `0` retries immediately.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    action: &'static str,
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, ClientError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
{
    const MAX_DELAY_MS: u64 = 30_000;
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) {
                    return Err(err);
                }
                let error_id = ErrorId::new();
                if attempt >= max_retries {
                    tracing::error!(
                        action,
                        attempts = attempt + 1,
                        %error_id,
                        error = %err,
                        "catalog API call failed, retries exhausted"
                    );
                    return Err(ClientError::ExhaustedRetries {
                        action,
                        attempts: attempt + 1,
                        error_id,
                        source: Box::new(err),
                    });
                }
                attempt += 1;
                let computed = backoff_base_ms.saturating_mul(1u64 << (attempt - 1).min(10));
                let capped = computed.min(MAX_DELAY_MS);
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_precision_loss
                )]
                let delay_ms = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
                tracing::warn!(
                    action,
                    attempt,
                    max_retries,
                    delay_ms,
                    %error_id,
                    error = %err,
                    "catalog API transient error, retrying"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}
