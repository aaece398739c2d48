//! Cache Module
//!
//! Short-lived in-memory cache for generated connected-content responses.

mod entry;
mod key;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use key::CacheKey;
pub use stats::CacheStats;
pub use store::StringsCache;

// == Public Constants ==
/// Default lifetime of a cached response, in seconds
pub const DEFAULT_TTL_SECS: u64 = 5;
