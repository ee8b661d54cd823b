//! Cache Module
//!
//! Provides in-memory request coalescing for asynchronous fetches.

mod entry;
mod key;
mod stats;
mod store;


// Re-export public types
pub use entry::{CacheEntry, Operation};
pub use key::{FetchSource, ResolvedSource};
pub use stats::CacheStats;
pub use store::{EntryState, FetchCoalescingCache};
