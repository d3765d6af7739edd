//! Configuration manager
//!
//! Wraps a layered `config::Config` and exposes both a typed snapshot and
//! key-based getters for components that only need a single value.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use thiserror::Error;

use crate::defaults::DefaultConfig;
use crate::settings::ServiceSettings;

/// Environment variable prefix, e.g. `AI_SERVICE__SERVER__PORT`
pub const ENV_PREFIX: &str = "AI_SERVICE";

/// Separator between prefix and nested keys
pub const ENV_SEPARATOR: &str = "__";

/// Configuration error
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error raised while reading or merging sources
    #[error(transparent)]
    Source(#[from] config::ConfigError),

    /// Configuration file does not exist
    #[error("Configuration file not found: {0}")]
    MissingFile(PathBuf),

    /// A value failed validation
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Configuration manager for the service
#[derive(Debug, Clone)]
pub struct ConfigManager {
    /// Merged configuration
    config: Config,
    
    /// Typed snapshot taken at load time
    settings: ServiceSettings,
    
    /// File the configuration was read from, if any
    source_file: Option<PathBuf>,
    
    /// Explicit overrides applied on top of every other source
    overrides: Vec<(String, String)>,
}

impl ConfigManager {
    /// Creates a configuration manager from defaults and the environment
    pub fn new() -> Result<Self, ConfigError> {
        Self::load(None, &[])
    }
    
    /// Creates a configuration manager from defaults, an optional file,
    /// the environment and explicit overrides (highest precedence)
    pub fn load(file: Option<&Path>, overrides: &[(String, String)]) -> Result<Self, ConfigError> {
        let mut builder = DefaultConfig::apply(Config::builder())?;
        
        if let Some(path) = file {
            if !path.exists() {
                return Err(ConfigError::MissingFile(path.to_path_buf()));
            }
            builder = builder.add_source(File::from(path));
        }
        
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator(ENV_SEPARATOR)
                .separator(ENV_SEPARATOR)
                .try_parsing(true),
        );
        
        for (key, value) in overrides {
            builder = builder.set_override(key.as_str(), value.as_str())?;
        }
        
        let config = builder.build()?;
        let settings: ServiceSettings = config.clone().try_deserialize()?;
        
        let manager = Self {
            config,
            settings,
            source_file: file.map(Path::to_path_buf),
            overrides: overrides.to_vec(),
        };
        
        manager.validate()?;
        
        Ok(manager)
    }
    
    /// Validates cross-field constraints the deserializer cannot express
    fn validate(&self) -> Result<(), ConfigError> {
        if self.settings.server.host.trim().is_empty() {
            return Err(ConfigError::Invalid("server.host must not be empty".to_string()));
        }
        
        if self.settings.storage.models_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("storage.models_dir must not be empty".to_string()));
        }
        
        if !matches!(self.settings.logging.format.as_str(), "pretty" | "compact" | "json") {
            return Err(ConfigError::Invalid(format!(
                "logging.format must be one of pretty, compact, json (got {})",
                self.settings.logging.format
            )));
        }
        
        Ok(())
    }
    
    /// Gets the typed settings snapshot
    pub fn settings(&self) -> &ServiceSettings {
        &self.settings
    }
    
    /// Gets the file the configuration was loaded from
    pub fn source_file(&self) -> Option<&Path> {
        self.source_file.as_deref()
    }
    
    /// Gets the explicit overrides, in the order they were applied
    pub fn overrides(&self) -> &[(String, String)] {
        &self.overrides
    }
    
    /// Gets a string value
    pub fn get_string(&self, key: &str) -> Result<String, ConfigError> {
        Ok(self.config.get_string(key)?)
    }
    
    /// Gets a boolean value
    pub fn get_bool(&self, key: &str) -> Result<bool, ConfigError> {
        Ok(self.config.get_bool(key)?)
    }
    
    /// Gets a port-sized integer value
    pub fn get_u16(&self, key: &str) -> Result<u16, ConfigError> {
        let value = self.config.get_int(key)?;
        u16::try_from(value)
            .map_err(|_| ConfigError::Invalid(format!("{} is out of range for u16: {}", key, value)))
    }
    
    /// Gets a filesystem path value
    pub fn get_path(&self, key: &str) -> Result<PathBuf, ConfigError> {
        Ok(PathBuf::from(self.config.get_string(key)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::StorageBackend;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let manager = ConfigManager::load(None, &[]).unwrap();
        let settings = manager.settings();
        
        assert_eq!(settings.server.port, DefaultConfig::PORT);
        assert_eq!(settings.storage.backend, StorageBackend::Filesystem);
        assert_eq!(settings.storage.models_dir, PathBuf::from("./models"));
        assert!(settings.logging.directory.is_none());
        assert!(manager.source_file().is_none());
    }

    #[test]
    fn test_file_and_overrides() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[server]\nport = 9100\n\n[storage]\nbackend = \"memory\"\nmodels_dir = \"/tmp/artifacts\"\n"
        )
        .unwrap();
        
        let overrides = vec![("logging.level".to_string(), "debug".to_string())];
        let manager = ConfigManager::load(Some(file.path()), &overrides).unwrap();
        
        assert_eq!(manager.get_u16("server.port").unwrap(), 9100);
        assert_eq!(manager.settings().storage.backend, StorageBackend::Memory);
        assert_eq!(manager.get_path("storage.models_dir").unwrap(), PathBuf::from("/tmp/artifacts"));
        assert_eq!(manager.get_string("logging.level").unwrap(), "debug");
        assert!(manager.get_bool("server.cors_enabled").unwrap());
        assert_eq!(manager.source_file(), Some(file.path()));
        assert_eq!(manager.overrides(), overrides.as_slice());
    }

    #[test]
    fn test_missing_file_is_reported() {
        let err = ConfigManager::load(Some(Path::new("/nonexistent/ai-service.toml")), &[]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingFile(_)));
    }

    #[test]
    fn test_invalid_log_format_rejected() {
        let overrides = vec![("logging.format".to_string(), "xml".to_string())];
        let err = ConfigManager::load(None, &overrides).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
