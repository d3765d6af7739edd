//! Global subscriber installation

use anyhow::{anyhow, Result};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

use service_config::LoggingSettings;

use crate::formatter::LogFormat;

/// File name prefix of the rolling log files
const LOG_FILE_PREFIX: &str = "ai-service.log";

/// Keeps background log writers alive; drop it only at shutdown
#[must_use = "dropping the guard stops file logging"]
pub struct LoggerGuard {
    /// Flush guard of the non-blocking file writer
    _file_guard: Option<WorkerGuard>,
}

/// Logger setup
pub struct Logger;

impl Logger {
    /// Installs the global subscriber described by the settings
    pub fn init(settings: &LoggingSettings) -> Result<LoggerGuard> {
        let format: LogFormat = settings.format.parse().map_err(|e: String| anyhow!(e))?;
        let filter = Self::filter_for(&settings.level)?;
        
        let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();
        
        layers.push(match format {
            LogFormat::Pretty => fmt::layer().pretty().with_target(true).boxed(),
            LogFormat::Compact => fmt::layer().compact().with_target(true).boxed(),
            LogFormat::Json => fmt::layer().json().with_current_span(true).boxed(),
        });
        
        let file_guard = match &settings.directory {
            Some(directory) => {
                let appender = tracing_appender::rolling::daily(directory, LOG_FILE_PREFIX);
                let (writer, guard) = tracing_appender::non_blocking(appender);
                layers.push(fmt::layer().json().with_ansi(false).with_writer(writer).boxed());
                Some(guard)
            }
            None => None,
        };
        
        tracing_subscriber::registry()
            .with(layers)
            .with(filter)
            .try_init()
            .map_err(|e| anyhow!("Failed to install tracing subscriber: {}", e))?;
        
        info!(format = %format, level = %settings.level, "Logging initialized");
        
        Ok(LoggerGuard {
            _file_guard: file_guard,
        })
    }
    
    /// Builds the event filter; `RUST_LOG` takes precedence over the configured level
    pub fn filter_for(level: &str) -> Result<EnvFilter> {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(level))
            .map_err(|e| anyhow!("Invalid log filter {:?}: {}", level, e))
    }
}
