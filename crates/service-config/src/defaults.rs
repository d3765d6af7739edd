//! Built-in configuration defaults

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError};

/// Default values applied before any file or environment source
pub struct DefaultConfig;

impl DefaultConfig {
    /// Default bind address
    pub const HOST: &'static str = "0.0.0.0";

    /// Default listen port
    pub const PORT: u16 = 8000;

    /// Whether permissive CORS is enabled by default
    pub const CORS_ENABLED: bool = true;

    /// Default storage backend
    pub const STORAGE_BACKEND: &'static str = "filesystem";

    /// Directory holding model artifacts
    pub const MODELS_DIR: &'static str = "./models";

    /// Default log level
    pub const LOG_LEVEL: &'static str = "info";

    /// Default log format
    pub const LOG_FORMAT: &'static str = "pretty";

    /// Applies every default to a configuration builder
    pub fn apply(
        builder: ConfigBuilder<DefaultState>,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        builder
            .set_default("server.host", Self::HOST)?
            .set_default("server.port", i64::from(Self::PORT))?
            .set_default("server.cors_enabled", Self::CORS_ENABLED)?
            .set_default("storage.backend", Self::STORAGE_BACKEND)?
            .set_default("storage.models_dir", Self::MODELS_DIR)?
            .set_default("logging.level", Self::LOG_LEVEL)?
            .set_default("logging.format", Self::LOG_FORMAT)
    }
}
