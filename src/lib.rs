//! Model-serving microservice
//!
//! This module wires configuration, logging, artifact storage, the model
//! manager and the HTTP API into a single service.

use std::future::Future;
use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info};

use api_gateway::RestApi;
use logging::{Logger, LoggerGuard};
use model_manager::ModelManager;
use service_config::ConfigManager;

/// The assembled service
pub struct AiService {
    /// Configuration manager
    config_manager: Arc<ConfigManager>,
    
    /// Model manager
    model_manager: Arc<ModelManager>,
    
    /// REST API server
    rest_api: RestApi,
    
    /// Keeps the file log writer alive
    log_guard: Option<LoggerGuard>,
}

impl AiService {
    /// Creates the service and initializes logging
    pub fn new(config_manager: ConfigManager) -> Result<Self> {
        let log_guard = Logger::init(&config_manager.settings().logging)?;
        
        let mut service = Self::without_logging(config_manager)?;
        service.log_guard = Some(log_guard);
        
        Ok(service)
    }
    
    /// Creates the service, leaving the global subscriber untouched
    pub fn without_logging(config_manager: ConfigManager) -> Result<Self> {
        let config_manager = Arc::new(config_manager);
        
        match config_manager.source_file() {
            Some(path) => info!("Initializing AI service with configuration from {:?}", path),
            None => info!("Initializing AI service with default configuration"),
        }
        
        for (key, value) in config_manager.overrides() {
            debug!("Configuration override {} = {}", key, value);
        }
        
        let model_manager = Arc::new(ModelManager::from_config(&config_manager));
        let rest_api = RestApi::new(&config_manager, Arc::clone(&model_manager))?;
        
        Ok(Self {
            config_manager,
            model_manager,
            rest_api,
            log_guard: None,
        })
    }
    
    /// Gets the configuration manager
    pub fn config_manager(&self) -> Arc<ConfigManager> {
        Arc::clone(&self.config_manager)
    }
    
    /// Gets the model manager
    pub fn model_manager(&self) -> Arc<ModelManager> {
        Arc::clone(&self.model_manager)
    }
    
    /// Serves HTTP requests until `shutdown` resolves
    pub async fn run<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        info!("Starting AI service on {}", self.rest_api.addr());
        
        let Self { rest_api, log_guard, .. } = self;
        rest_api.serve(shutdown).await?;
        
        info!("AI service shut down");
        drop(log_guard);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config(models_dir: &std::path::Path) -> ConfigManager {
        let overrides = vec![
            ("server.host".to_string(), "127.0.0.1".to_string()),
            ("server.port".to_string(), "0".to_string()),
            ("storage.models_dir".to_string(), models_dir.display().to_string()),
        ];
        ConfigManager::load(None, &overrides).unwrap()
    }

    #[tokio::test]
    async fn test_service_wires_filesystem_store() {
        let dir = tempfile::tempdir().unwrap();
        let service = AiService::without_logging(config(dir.path())).unwrap();
        
        // Overrides are kept so they can be logged once the subscriber is up
        let overrides = service.config_manager().overrides().to_vec();
        assert_eq!(overrides.len(), 3);
        assert_eq!(overrides[2].0, "storage.models_dir");
        
        let manager = service.model_manager();
        assert_eq!(manager.store().name(), "filesystem");
        
        let outcome = manager
            .train("wired", "nlp", &json!({ "texts": [] }), &json!({}))
            .await
            .unwrap();
        
        assert!(dir.path().join("wired.json").exists());
        assert_eq!(outcome.artifact_location, dir.path().join("wired").display().to_string());
        
        service.run(async {}).await.unwrap();
    }
}
