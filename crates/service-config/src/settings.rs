//! Typed configuration snapshot

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Complete service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceSettings {
    /// HTTP server settings
    pub server: ServerSettings,
    
    /// Artifact storage settings
    pub storage: StorageSettings,
    
    /// Logging settings
    pub logging: LoggingSettings,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Bind address
    pub host: String,
    
    /// Listen port
    pub port: u16,
    
    /// Enables a permissive CORS layer
    pub cors_enabled: bool,
}

/// Where model artifacts are persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// One JSON file per model under `models_dir`
    Filesystem,
    
    /// Process-local map, lost at shutdown
    Memory,
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::Filesystem => write!(f, "filesystem"),
            StorageBackend::Memory => write!(f, "memory"),
        }
    }
}

/// Artifact storage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Storage backend
    pub backend: StorageBackend,
    
    /// Root directory for artifacts
    pub models_dir: PathBuf,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Default filter directive, overridden by `RUST_LOG`
    pub level: String,
    
    /// Output format (`pretty`, `compact` or `json`)
    pub format: String,
    
    /// Directory for daily rolling log files
    #[serde(default)]
    pub directory: Option<PathBuf>,
}
