//! In-memory cache of live model instances

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::model::Model;

/// Model instance shared between the cache and in-flight requests
pub type SharedModel = Arc<dyn Model>;

/// Cached model with its population metadata
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The live instance
    pub model: SharedModel,
    
    /// Position in population order
    pub sequence: u64,
    
    /// When the entry was last populated
    pub loaded_at: DateTime<Utc>,
}

/// Identifier to model map that never evicts
///
/// Entries remember the order in which identifiers were first cached.
/// Replacing an entry swaps the instance but keeps its position.
#[derive(Debug, Default)]
pub struct ModelCache {
    entries: DashMap<String, CacheEntry>,
    next_sequence: AtomicU64,
}

impl ModelCache {
    /// Creates an empty cache
    pub fn new() -> Self {
        Self::default()
    }
    
    /// Returns the cached entry for an identifier
    pub fn get(&self, model_id: &str) -> Option<CacheEntry> {
        self.entries.get(model_id).map(|entry| entry.value().clone())
    }
    
    /// Returns the cached instance for an identifier
    pub fn get_model(&self, model_id: &str) -> Option<SharedModel> {
        self.entries.get(model_id).map(|entry| Arc::clone(&entry.model))
    }
    
    /// Inserts or replaces the instance for an identifier
    pub fn insert(&self, model_id: &str, model: SharedModel) {
        let loaded_at = Utc::now();
        
        match self.entries.entry(model_id.to_string()) {
            Entry::Occupied(mut occupied) => {
                let entry = occupied.get_mut();
                entry.model = model;
                entry.loaded_at = loaded_at;
            }
            Entry::Vacant(vacant) => {
                let sequence = self.next_sequence.fetch_add(1, Ordering::Relaxed);
                vacant.insert(CacheEntry { model, sequence, loaded_at });
            }
        }
    }
    
    /// Returns true if the identifier is cached
    pub fn contains(&self, model_id: &str) -> bool {
        self.entries.contains_key(model_id)
    }
    
    /// Number of cached models
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    
    /// Returns true if nothing is cached
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
    
    /// Cached identifiers in population order
    pub fn model_ids(&self) -> Vec<String> {
        let mut ids: Vec<(u64, String)> = self
            .entries
            .iter()
            .map(|entry| (entry.sequence, entry.key().clone()))
            .collect();
        
        ids.sort_unstable_by_key(|(sequence, _)| *sequence);
        ids.into_iter().map(|(_, id)| id).collect()
    }
}
