//! Fixed-size concurrent batches with a pause between them.

use crate::config::ResolverSettings;
use futures::future::join_all;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// Runs an async operation over a list of items, `batch_size` at a time.
///
/// Every future in a batch is driven to completion before the next batch
/// starts, and the batcher sleeps for `delay` between batches (never after
/// the last one). This is a fixed-interval throttle, not adaptive backoff.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitedBatcher {
    batch_size: usize,
    delay: Duration,
}

impl RateLimitedBatcher {
    pub fn new(batch_size: usize, delay: Duration) -> Self {
        Self {
            batch_size: batch_size.max(1),
            delay,
        }
    }

    /// Outputs are returned in input order, one per item.
    pub async fn run<T, F, Fut>(&self, items: &[T], mut op: F) -> Vec<Fut::Output>
    where
        F: FnMut(&T) -> Fut,
        Fut: Future,
    {
        let mut outputs = Vec::with_capacity(items.len());
        let total_batches = items.len().div_ceil(self.batch_size);

        for (index, batch) in items.chunks(self.batch_size).enumerate() {
            tracing::debug!(
                "Running batch {}/{} ({} items)",
                index + 1,
                total_batches,
                batch.len()
            );
            outputs.extend(join_all(batch.iter().map(&mut op)).await);

            if index + 1 < total_batches {
                sleep(self.delay).await;
            }
        }

        outputs
    }
}

impl From<ResolverSettings> for RateLimitedBatcher {
    fn from(settings: ResolverSettings) -> Self {
        Self::new(settings.batch_size, settings.batch_delay)
    }
}

impl Default for RateLimitedBatcher {
    fn default() -> Self {
        ResolverSettings::default().into()
    }
}
