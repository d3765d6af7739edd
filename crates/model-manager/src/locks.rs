//! Per-identifier async locks

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Lazily created async mutex per model identifier
///
/// Serializes train and cache-miss loads for one identifier while leaving
/// other identifiers free to proceed. Locks are kept for the lifetime of
/// the map, like the cache entries they guard.
#[derive(Debug, Default)]
pub struct IdentifierLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl IdentifierLocks {
    /// Creates an empty lock map
    pub fn new() -> Self {
        Self::default()
    }
    
    /// Waits for exclusive access to an identifier
    pub async fn acquire(&self, model_id: &str) -> OwnedMutexGuard<()> {
        // Clone the mutex out so the map shard is not held across the await
        let lock = self
            .locks
            .entry(model_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .value()
            .clone();
        
        lock.lock_owned().await
    }
    
    /// Number of identifiers that have been locked at least once
    pub fn len(&self) -> usize {
        self.locks.len()
    }
    
    /// Returns true if no identifier was ever locked
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
