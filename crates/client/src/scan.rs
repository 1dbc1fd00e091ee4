//! Chunked block-range scans with retries.

use std::{fmt::Display, future::Future};
use tokio_retry::{strategy::ExponentialBackoff, RetryIf};
use tracing::{debug, warn};

/// Largest block range requested in one `eth_getLogs` call.
pub const CHUNK_SIZE: u64 = 9_500;

/// Scan `from..=to` in chunks of [`CHUNK_SIZE`] blocks and concatenate the
/// results in block order.
///
/// Each chunk is retried with exponential backoff (5 attempts, starting at
/// 100ms) as long as `retryable` accepts the error. The first error that is
/// not retryable, or that survives every attempt, aborts the scan.
pub async fn scan_in_chunks<T, E, F, Fut>(
    from_block: u64,
    to_block: u64,
    retryable: fn(&E) -> bool,
    mut scan: F,
) -> Result<Vec<T>, E>
where
    E: Display,
    F: FnMut(u64, u64) -> Fut,
    Fut: Future<Output = Result<Vec<T>, E>>,
{
    let mut all = Vec::new();
    let mut current = from_block;

    while current <= to_block {
        let chunk_end = current.saturating_add(CHUNK_SIZE - 1).min(to_block);
        debug!(from = current, to = chunk_end, "Scanning chunk");

        let retry_strategy = ExponentialBackoff::from_millis(100).take(5);
        let chunk = RetryIf::spawn(
            retry_strategy,
            || {
                let attempt = scan(current, chunk_end);
                async move {
                    attempt.await.map_err(|e| {
                        if retryable(&e) {
                            warn!(
                                from = current,
                                to = chunk_end,
                                error = %e,
                                "Chunk scan failed, will retry"
                            );
                        } else {
                            warn!(from = current, to = chunk_end, error = %e, "Chunk scan failed");
                        }
                        e
                    })
                }
            },
            retryable,
        )
        .await?;

        all.extend(chunk);
        if chunk_end == u64::MAX {
            break;
        }
        current = chunk_end + 1;
    }

    Ok(all)
}
