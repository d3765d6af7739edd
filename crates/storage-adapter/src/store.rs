//! Artifact store abstraction

use async_trait::async_trait;
use serde_json::Value;

use common::error::Result;

/// Durable storage of serialized fitted parameters, keyed by location
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Gets the name of the backend, for logging
    fn name(&self) -> &str;
    
    /// Derives the artifact location for a model identifier
    fn location_for(&self, model_id: &str) -> String;
    
    /// Creates or overwrites the artifact at a location
    async fn save(&self, location: &str, artifact: &Value) -> Result<()>;
    
    /// Reads the artifact at a location
    ///
    /// Fails with `Error::ArtifactNotFound` when nothing was saved there.
    async fn load(&self, location: &str) -> Result<Value>;
}
