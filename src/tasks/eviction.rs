//! Cache Eviction Task
//!
//! Background task that periodically removes expired strings cache entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::StringsCache;

/// Spawns a background task that sweeps expired entries from `cache`.
///
/// Each iteration sweeps first, then sleeps for `interval`. The loop never
/// ends on its own; abort the returned handle during shutdown.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(StringsCache::new(Duration::from_secs(5)));
/// let eviction_handle = spawn_eviction_task(cache.clone(), Duration::from_secs(5));
/// // Later, during shutdown:
/// eviction_handle.abort();
/// ```
pub fn spawn_eviction_task(cache: Arc<StringsCache>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            interval_ms = interval.as_millis() as u64,
            "Starting strings cache eviction task"
        );

        loop {
            let removed = cache.evict_expired();

            if removed > 0 {
                info!(removed, remaining = cache.len(), "evicted expired strings");
            } else {
                debug!("eviction sweep: no expired entries found");
            }

            tokio::time::sleep(interval).await;
        }
    })
}
