//! Configuration management for the AI model service
//!
//! This crate layers built-in defaults, an optional configuration file and
//! `AI_SERVICE__*` environment variables into a single typed snapshot.

pub mod defaults;
pub mod manager;
pub mod settings;

// Re-export commonly used types
pub use defaults::DefaultConfig;
pub use manager::{ConfigError, ConfigManager};
pub use settings::{LoggingSettings, ServerSettings, ServiceSettings, StorageBackend, StorageSettings};
