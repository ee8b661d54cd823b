//! Cache Entry Module
//!
//! Defines the record kept for one generation of fetches of a key.

use std::fmt;

use bytes::Bytes;
use futures::future::{BoxFuture, Shared};

use crate::error::Result;

/// Handle to a single fetch that any number of observers may await.
pub type Operation = Shared<BoxFuture<'static, Result<Bytes>>>;

// == Cache Entry ==
/// One generation of a key: the in-flight or completed fetch plus metadata.
///
/// Entries are never updated in place. A retry after failure inserts a fresh
/// entry with a new generation.
#[derive(Clone)]
pub struct CacheEntry {
    key: String,
    /// Attempt counter, unique across the cache
    pub generation: u64,
    operation: Operation,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry wrapping an already started operation.
    pub fn new(key: String, generation: u64, operation: Operation) -> Self {
        Self {
            key,
            generation,
            operation,
        }
    }

    /// Returns a new observer of this entry's operation.
    pub fn operation(&self) -> Operation {
        self.operation.clone()
    }

    /// True once some observer has seen the operation complete.
    fn is_resolved(&self) -> bool {
        self.operation.peek().is_some()
    }

    /// True if the operation completed successfully.
    pub fn is_cached(&self) -> bool {
        matches!(self.operation.peek(), Some(Ok(_)))
    }
}

impl fmt::Debug for CacheEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheEntry")
            .field("key", &self.key)
            .field("generation", &self.generation)
            .field("resolved", &self.is_resolved())
            .finish()
    }
}
