//! Model lifecycle manager
//!
//! Drives the train → persist → cache and load → cache → predict flows.
//! Train and cache-miss loads for one identifier are serialized through
//! [`IdentifierLocks`]; cache hits never wait on them.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use common::error::{Error, Result};
use common::models::{ModelVariant, Prediction, TrainingMetrics};
use common::utils::{format_duration, measure_execution_time_async, validate_model_id};
use service_config::{ConfigManager, StorageBackend};
use storage_adapter::{ArtifactStore, FilesystemAdapter, MemoryAdapter};

use crate::cache::{ModelCache, SharedModel};
use crate::locks::IdentifierLocks;
use crate::model::create_model;

/// Result of a successful training run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainOutcome {
    /// Identifier the model was registered under
    pub model_id: String,
    
    /// Metrics reported by the model
    pub metrics: TrainingMetrics,
    
    /// Where the artifact was persisted
    pub artifact_location: String,
}

/// Model manager
pub struct ModelManager {
    /// Live model instances
    cache: Arc<ModelCache>,
    
    /// Artifact persistence
    store: Arc<dyn ArtifactStore>,
    
    /// Per-identifier train/load serialization
    locks: IdentifierLocks,
}

impl ModelManager {
    /// Creates a manager with an empty cache
    pub fn new(store: Arc<dyn ArtifactStore>) -> Self {
        Self::with_cache(store, Arc::new(ModelCache::new()))
    }
    
    /// Creates a manager around an existing cache
    pub fn with_cache(store: Arc<dyn ArtifactStore>, cache: Arc<ModelCache>) -> Self {
        Self {
            cache,
            store,
            locks: IdentifierLocks::new(),
        }
    }
    
    /// Creates a manager using the configured storage backend
    pub fn from_config(config: &ConfigManager) -> Self {
        let storage = &config.settings().storage;
        
        let store: Arc<dyn ArtifactStore> = match storage.backend {
            StorageBackend::Filesystem => Arc::new(FilesystemAdapter::new(storage.models_dir.clone())),
            StorageBackend::Memory => Arc::new(MemoryAdapter::new()),
        };
        
        info!("Using {} artifact store", store.name());
        Self::new(store)
    }
    
    /// Gets the model cache
    pub fn cache(&self) -> &Arc<ModelCache> {
        &self.cache
    }
    
    /// Gets the artifact store
    pub fn store(&self) -> &Arc<dyn ArtifactStore> {
        &self.store
    }
    
    /// Trains a fresh model, persists it and registers it in the cache
    ///
    /// An existing model with the same identifier is replaced only when the
    /// whole run succeeds; otherwise it keeps serving.
    pub async fn train(
        &self,
        model_id: &str,
        model_type: &str,
        data: &Value,
        parameters: &Value,
    ) -> Result<TrainOutcome> {
        validate_model_id(model_id)?;
        let variant: ModelVariant = model_type.parse()?;
        
        let _guard = self.locks.acquire(model_id).await;
        info!("Training {} model {}", variant, model_id);
        
        let (result, elapsed) =
            measure_execution_time_async(self.fit_and_persist(model_id, variant, data, parameters)).await;
        
        match result {
            Ok((model, metrics, artifact_location)) => {
                self.cache.insert(model_id, model);
                info!(
                    "Model {} trained in {} and saved to {}",
                    model_id,
                    format_duration(elapsed),
                    artifact_location
                );
                
                Ok(TrainOutcome {
                    model_id: model_id.to_string(),
                    metrics,
                    artifact_location,
                })
            }
            Err(e) => {
                warn!("Training model {} failed: {}", model_id, e);
                Err(Error::TrainingFailed(e.to_string()))
            }
        }
    }
    
    async fn fit_and_persist(
        &self,
        model_id: &str,
        variant: ModelVariant,
        data: &Value,
        parameters: &Value,
    ) -> Result<(SharedModel, TrainingMetrics, String)> {
        let mut model = create_model(variant);
        let metrics = model.train(data, parameters)?;
        let artifact = model.artifact()?;
        
        let location = self.store.location_for(model_id);
        self.store.save(&location, &artifact).await?;
        
        Ok((Arc::from(model), metrics, location))
    }
    
    /// Runs a prediction, loading the model from its artifact on a cache miss
    ///
    /// On a cache hit the declared type and location are ignored. An empty or
    /// missing location falls back to the store's default for the identifier.
    /// Locations the store refuses surface as `InvalidInput`.
    pub async fn predict(
        &self,
        model_id: &str,
        model_type: &str,
        location: Option<&str>,
        input: &Value,
    ) -> Result<Prediction> {
        validate_model_id(model_id)?;
        
        let model = match self.cache.get(model_id) {
            Some(entry) => {
                debug!("Serving model {} from cache (loaded at {})", model_id, entry.loaded_at);
                entry.model
            }
            None => self.load_into_cache(model_id, model_type, location).await?,
        };
        
        model
            .predict(input)
            .map_err(|e| Error::PredictionFailed(e.to_string()))
    }
    
    async fn load_into_cache(
        &self,
        model_id: &str,
        model_type: &str,
        location: Option<&str>,
    ) -> Result<SharedModel> {
        let variant: ModelVariant = model_type.parse()?;
        
        let _guard = self.locks.acquire(model_id).await;
        
        // Another request may have loaded it while we waited
        if let Some(model) = self.cache.get_model(model_id) {
            return Ok(model);
        }
        
        let location = match location.map(str::trim) {
            Some(location) if !location.is_empty() => location.to_string(),
            _ => self.store.location_for(model_id),
        };
        
        info!("Loading {} model {} from {}", variant, model_id, location);
        
        let artifact = self.store.load(&location).await.map_err(|e| {
            if e.is_artifact_not_found() || e.is_client_error() {
                e
            } else {
                Error::PredictionFailed(e.to_string())
            }
        })?;
        
        let mut model = create_model(variant);
        model
            .load(&artifact)
            .map_err(|e| Error::PredictionFailed(e.to_string()))?;
        
        let model: SharedModel = Arc::from(model);
        self.cache.insert(model_id, Arc::clone(&model));
        
        Ok(model)
    }
    
    /// Cached identifiers in population order
    pub fn list_models(&self) -> Vec<String> {
        self.cache.model_ids()
    }
    
    /// Returns true if the identifier is cached
    pub fn contains(&self, model_id: &str) -> bool {
        self.cache.contains(model_id)
    }
    
    /// Number of cached models
    pub fn cached_count(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Memory store that counts loads and can refuse writes
    #[derive(Default)]
    struct CountingStore {
        inner: MemoryAdapter,
        loads: AtomicUsize,
        fail_saves: bool,
    }

    #[async_trait]
    impl ArtifactStore for CountingStore {
        fn name(&self) -> &str {
            "counting"
        }

        fn location_for(&self, model_id: &str) -> String {
            self.inner.location_for(model_id)
        }

        async fn save(&self, location: &str, artifact: &Value) -> Result<()> {
            if self.fail_saves {
                return Err(Error::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk full")));
            }
            self.inner.save(location, artifact).await
        }

        async fn load(&self, location: &str) -> Result<Value> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.inner.load(location).await
        }
    }

    fn series() -> Value {
        json!({ "values": [1, 2, 3, 4, 5, 6] })
    }

    #[tokio::test]
    async fn test_round_trip_through_filesystem() {
        let dir = tempfile::tempdir().unwrap();
        let store: Arc<dyn ArtifactStore> = Arc::new(FilesystemAdapter::new(dir.path()));
        
        let trainer = ModelManager::new(Arc::clone(&store));
        let outcome = trainer
            .train("demo", "time-series", &series(), &json!({ "window_size": 3 }))
            .await
            .unwrap();
        
        assert_eq!(outcome.model_id, "demo");
        assert_eq!(outcome.metrics, TrainingMetrics::Forecast { mae: 2.0, rmse: 2.0, samples: 6 });
        assert!(dir.path().join("demo.json").exists());
        
        let input = json!({ "steps": 2 });
        let cached = trainer.predict("demo", "time-series", None, &input).await.unwrap();
        
        // A fresh manager must rebuild the same model from disk
        let restarted = ModelManager::new(store);
        assert!(!restarted.contains("demo"));
        
        let loaded = restarted
            .predict("demo", "time-series", Some(outcome.artifact_location.as_str()), &input)
            .await
            .unwrap();
        
        assert_eq!(loaded, cached);
        assert_eq!(loaded.output["predictions"], json!([5.0, 16.0 / 3.0]));
        assert!(restarted.contains("demo"));
    }

    #[tokio::test]
    async fn test_unsupported_type_leaves_cache_alone() {
        let manager = ModelManager::new(Arc::new(MemoryAdapter::new()));
        
        let err = manager.train("img", "image", &json!({}), &Value::Null).await.unwrap_err();
        assert!(err.is_unsupported_type());
        
        let err = manager.predict("img", "image", None, &json!({})).await.unwrap_err();
        assert!(err.is_unsupported_type());
        
        assert_eq!(manager.cached_count(), 0);
    }

    #[tokio::test]
    async fn test_invalid_identifier_is_rejected() {
        let manager = ModelManager::new(Arc::new(MemoryAdapter::new()));
        
        let err = manager.train("../escape", "nlp", &json!({}), &Value::Null).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(err.is_client_error());
    }

    #[tokio::test]
    async fn test_failed_retrain_keeps_previous_model() {
        let manager = ModelManager::new(Arc::new(MemoryAdapter::new()));
        manager
            .train("demo", "time-series", &series(), &json!({ "window_size": 3 }))
            .await
            .unwrap();
        
        let err = manager
            .train("demo", "time-series", &series(), &json!({ "window_size": 10 }))
            .await
            .unwrap_err();
        
        assert!(matches!(err, Error::TrainingFailed(ref msg) if msg.contains("window_size")));
        
        let prediction = manager.predict("demo", "time-series", None, &json!({})).await.unwrap();
        assert_eq!(prediction.output["predictions"], json!([5.0]));
    }

    #[tokio::test]
    async fn test_failed_save_is_not_cached() {
        let store = CountingStore {
            fail_saves: true,
            ..Default::default()
        };
        let manager = ModelManager::new(Arc::new(store));
        
        let err = manager
            .train("demo", "nlp", &json!({ "texts": [] }), &Value::Null)
            .await
            .unwrap_err();
        
        assert!(matches!(err, Error::TrainingFailed(ref msg) if msg.contains("disk full")));
        assert!(!manager.contains("demo"));
    }

    #[tokio::test]
    async fn test_cache_hit_ignores_declared_type() {
        let manager = ModelManager::new(Arc::new(MemoryAdapter::new()));
        manager.train("reviews", "nlp", &json!({}), &Value::Null).await.unwrap();
        
        let prediction = manager
            .predict("reviews", "time-series", Some("/nowhere"), &json!({ "text": "awful" }))
            .await
            .unwrap();
        
        assert_eq!(prediction.output, json!({ "sentiment": "negative", "score": 0.7 }));
    }

    #[tokio::test]
    async fn test_missing_artifact() {
        let manager = ModelManager::new(Arc::new(MemoryAdapter::new()));
        
        let err = manager.predict("ghost", "nlp", None, &json!({})).await.unwrap_err();
        assert!(err.is_artifact_not_found());
        assert_eq!(manager.cached_count(), 0);
    }

    #[tokio::test]
    async fn test_prediction_errors_are_wrapped() {
        let manager = ModelManager::new(Arc::new(MemoryAdapter::new()));
        manager
            .train("demo", "time-series", &series(), &json!({ "window_size": 3 }))
            .await
            .unwrap();
        
        let err = manager
            .predict("demo", "time-series", None, &json!({ "steps": -1 }))
            .await
            .unwrap_err();
        
        assert!(matches!(err, Error::PredictionFailed(ref msg) if msg.contains("steps")));
    }

    #[tokio::test]
    async fn test_concurrent_misses_load_once() {
        let store = Arc::new(CountingStore::default());
        
        let trainer = ModelManager::new(Arc::clone(&store) as Arc<dyn ArtifactStore>);
        trainer.train("demo", "nlp", &json!({}), &Value::Null).await.unwrap();
        
        let manager = Arc::new(ModelManager::new(Arc::clone(&store) as Arc<dyn ArtifactStore>));
        let mut handles = Vec::new();
        
        for _ in 0..8 {
            let manager = Arc::clone(&manager);
            handles.push(tokio::spawn(async move {
                manager.predict("demo", "nlp", None, &json!({ "text": "great" })).await
            }));
        }
        
        for handle in handles {
            let prediction = handle.await.unwrap().unwrap();
            assert_eq!(prediction.confidence, Some(0.7));
        }
        
        assert_eq!(store.loads.load(Ordering::SeqCst), 1);
        assert_eq!(manager.cached_count(), 1);
    }

    #[tokio::test]
    async fn test_list_models_in_population_order() {
        let manager = ModelManager::new(Arc::new(MemoryAdapter::new()));
        
        for id in ["zeta", "alpha", "mid"] {
            manager.train(id, "nlp", &json!({}), &Value::Null).await.unwrap();
        }
        manager.train("zeta", "nlp", &json!({}), &Value::Null).await.unwrap();
        
        assert_eq!(manager.list_models(), vec!["zeta", "alpha", "mid"]);
    }

    #[tokio::test]
    async fn test_from_config_uses_memory_backend() {
        let overrides = vec![("storage.backend".to_string(), "memory".to_string())];
        let config = ConfigManager::load(None, &overrides).unwrap();
        
        let manager = ModelManager::from_config(&config);
        assert_eq!(manager.store().name(), "memory");
    }

    #[tokio::test]
    async fn test_reloaded_forecaster_matches_trained_one() {
        let dir = tempfile::tempdir().unwrap();
        let store: Arc<dyn ArtifactStore> = Arc::new(FilesystemAdapter::new(dir.path()));
        let data = json!({
            "values": [1, 2, 3, 985.6906946328695, 212.91890726713459, 985.6906946328695]
        });
        
        let trainer = ModelManager::new(Arc::clone(&store));
        trainer
            .train("noisy", "time-series", &data, &json!({ "window_size": 3 }))
            .await
            .unwrap();
        
        let restarted = ModelManager::new(store);
        let input = json!({ "steps": 3 });
        let reloaded = restarted.predict("noisy", "time-series", None, &input).await.unwrap();
        let cached = trainer.predict("noisy", "time-series", None, &input).await.unwrap();
        
        assert_eq!(reloaded, cached);
        
        let trained = trainer.cache().get_model("noisy").unwrap().artifact().unwrap();
        let restored = restarted.cache().get_model("noisy").unwrap().artifact().unwrap();
        assert_eq!(restored, trained);
    }

    #[tokio::test]
    async fn test_model_path_outside_store_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let models = dir.path().join("models");
        let manager = ModelManager::new(Arc::new(FilesystemAdapter::new(&models)));
        
        // A valid classifier artifact that lives outside the models directory
        let stray = dir.path().join("stray");
        std::fs::write(
            stray.with_extension("json"),
            json!({ "task": "sentiment-analysis", "model_type": "simple_rule_based", "trained": true })
                .to_string(),
        )
        .unwrap();
        
        for location in [stray.display().to_string(), models.join("../stray").display().to_string()] {
            let err = manager
                .predict("stray", "nlp", Some(location.as_str()), &json!({ "text": "good" }))
                .await
                .unwrap_err();
            
            assert!(matches!(err, Error::InvalidInput(_)), "{}: {:?}", location, err);
            assert!(err.is_client_error());
        }
        
        assert!(!manager.contains("stray"));
    }
}
