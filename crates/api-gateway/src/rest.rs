//! HTTP server

use std::future::Future;
use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use axum::Router;
use tracing::info;

use model_manager::ModelManager;
use service_config::ConfigManager;

use crate::routes::{router, ApiState};

/// REST API server
pub struct RestApi {
    addr: SocketAddr,
    router: Router,
}

impl RestApi {
    /// Creates the server from configuration
    pub fn new(config: &ConfigManager, manager: Arc<ModelManager>) -> Result<Self> {
        let host = config.get_string("server.host")?;
        let port = config.get_u16("server.port")?;
        let cors_enabled = config.get_bool("server.cors_enabled")?;
        
        let addr = (host.as_str(), port)
            .to_socket_addrs()
            .with_context(|| format!("Failed to resolve {}:{}", host, port))?
            .next()
            .ok_or_else(|| anyhow!("No address found for {}:{}", host, port))?;
        
        let state = Arc::new(ApiState::new(manager));
        
        Ok(Self {
            addr,
            router: router(state, cors_enabled),
        })
    }
    
    /// Address the server binds to
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }
    
    /// Serves requests until `shutdown` resolves
    pub async fn serve<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let server = axum::Server::try_bind(&self.addr)
            .with_context(|| format!("Failed to bind {}", self.addr))?
            .serve(self.router.into_make_service());
        
        info!("HTTP API listening on {}", server.local_addr());
        
        server.with_graceful_shutdown(shutdown).await?;
        
        info!("HTTP API stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage_adapter::MemoryAdapter;

    #[test]
    fn test_address_from_config() {
        let overrides = vec![
            ("server.host".to_string(), "127.0.0.1".to_string()),
            ("server.port".to_string(), "9100".to_string()),
        ];
        let config = ConfigManager::load(None, &overrides).unwrap();
        let manager = Arc::new(ModelManager::new(Arc::new(MemoryAdapter::new())));
        
        let api = RestApi::new(&config, manager).unwrap();
        assert_eq!(api.addr(), "127.0.0.1:9100".parse::<SocketAddr>().unwrap());
    }

    #[tokio::test]
    async fn test_serve_stops_on_shutdown() {
        let overrides = vec![
            ("server.host".to_string(), "127.0.0.1".to_string()),
            ("server.port".to_string(), "0".to_string()),
        ];
        let config = ConfigManager::load(None, &overrides).unwrap();
        let manager = Arc::new(ModelManager::new(Arc::new(MemoryAdapter::new())));
        
        let api = RestApi::new(&config, manager).unwrap();
        api.serve(async {}).await.unwrap();
    }
}
