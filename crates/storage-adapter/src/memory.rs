//! In-memory artifact store

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;

use common::error::{Error, Result};

use crate::store::ArtifactStore;

/// Location scheme used by the in-memory store
const MEMORY_SCHEME: &str = "memory://";

/// Artifact store that keeps artifacts in process memory
///
/// Artifacts do not survive a restart.
#[derive(Debug, Default)]
pub struct MemoryAdapter {
    /// Artifacts by location
    artifacts: DashMap<String, Value>,
}

impl MemoryAdapter {
    /// Creates an empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }
    
    /// Gets the number of stored artifacts
    pub fn len(&self) -> usize {
        self.artifacts.len()
    }
    
    /// Returns true if no artifact has been saved
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}

#[async_trait]
impl ArtifactStore for MemoryAdapter {
    fn name(&self) -> &str {
        "memory"
    }
    
    fn location_for(&self, model_id: &str) -> String {
        format!("{}{}", MEMORY_SCHEME, model_id)
    }
    
    async fn save(&self, location: &str, artifact: &Value) -> Result<()> {
        self.artifacts.insert(location.to_string(), artifact.clone());
        Ok(())
    }
    
    async fn load(&self, location: &str) -> Result<Value> {
        self.artifacts
            .get(location)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| Error::ArtifactNotFound(location.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_round_trip_and_missing() {
        let store = MemoryAdapter::new();
        let location = store.location_for("demo");
        assert_eq!(location, "memory://demo");
        assert!(store.is_empty());
        
        store.save(&location, &json!({"task": "sentiment-analysis"})).await.unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.load(&location).await.unwrap()["task"], "sentiment-analysis");
        
        assert!(store.load("memory://other").await.unwrap_err().is_artifact_not_found());
    }
}
