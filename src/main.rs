use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use ai_service::AiService;
use service_config::ConfigManager;

#[derive(Parser)]
#[command(name = "ai-service")]
#[command(about = "Model-serving microservice for time-series forecasting and text classification")]
#[command(version)]
struct Args {
    /// Configuration file (TOML, YAML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind address
    #[arg(long)]
    host: Option<String>,

    /// Listen port
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory for model artifacts
    #[arg(long)]
    models_dir: Option<PathBuf>,

    /// Log filter directive, e.g. `debug` or `model_manager=trace`
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    /// Command line values as configuration overrides
    fn overrides(&self) -> Vec<(String, String)> {
        let mut overrides = Vec::new();
        
        if let Some(host) = &self.host {
            overrides.push(("server.host".to_string(), host.clone()));
        }
        if let Some(port) = self.port {
            overrides.push(("server.port".to_string(), port.to_string()));
        }
        if let Some(dir) = &self.models_dir {
            overrides.push(("storage.models_dir".to_string(), dir.display().to_string()));
        }
        if let Some(level) = &self.log_level {
            overrides.push(("logging.level".to_string(), level.clone()));
        }
        
        overrides
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl-C, shutting down"),
        Err(e) => {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    
    let config = ConfigManager::load(args.config.as_deref(), &args.overrides())?;
    let service = AiService::new(config)?;
    
    service.run(shutdown_signal()).await
}
