// src/error_recovery.rs
//! Bounded retry of transient request timeouts.

use crate::error::AppError;

/// Runs `operation` until it succeeds, retrying only transient timeouts.
///
/// A timeout is repeated immediately, up to `max_retries` times. When the
/// last attempt also times out the final timeout is surfaced wrapped in
/// `AppError::FetchFailed`. Any other error is returned as soon as it occurs.
pub async fn retry_on_timeout<F, T, Fut>(
    mut operation: F,
    max_retries: u32,
    what: &str,
) -> Result<T, AppError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, AppError>>,
{
    let mut attempt: u32 = 1;
    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) if e.is_transient_timeout() => {
                if attempt > max_retries {
                    log::error!("{} timed out {} times, giving up", what, attempt);
                    return Err(AppError::FetchFailed {
                        attempts: attempt,
                        source: Box::new(e),
                    });
                }
                log::warn!(
                    "{} timed out (attempt {} of {}), retrying",
                    what,
                    attempt,
                    max_retries + 1
                );
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
