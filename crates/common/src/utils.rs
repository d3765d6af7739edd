//! Utility functions for the AI model service
//!
//! This module provides utility functions used throughout the service.

use std::future::Future;
use std::time::{Duration, Instant};

use chrono::{SecondsFormat, Utc};

use crate::error::{Error, Result};

/// Maximum length of a model identifier
pub const MAX_MODEL_ID_LENGTH: usize = 128;

/// Formats a duration into a human-readable string
///
/// # Examples
///
/// ```
/// use common::utils::format_duration;
/// use std::time::Duration;
///
/// assert_eq!(format_duration(Duration::from_secs(65)), "1m 5s");
/// assert_eq!(format_duration(Duration::from_millis(250)), "250ms");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    
    if total_secs == 0 {
        let millis = duration.subsec_millis();
        if millis == 0 {
            let micros = duration.subsec_micros();
            return format!("{}µs", micros);
        }
        return format!("{}ms", millis);
    }
    
    let hours = total_secs / (60 * 60);
    let minutes = (total_secs % (60 * 60)) / 60;
    let seconds = total_secs % 60;
    
    let mut result = String::new();
    
    if hours > 0 {
        result.push_str(&format!("{}h ", hours));
    }
    
    if minutes > 0 || !result.is_empty() {
        result.push_str(&format!("{}m ", minutes));
    }
    
    result.push_str(&format!("{}s", seconds));
    
    result
}

/// Measures the execution time of an async operation
///
/// The duration is returned alongside the result, whether it succeeded or not.
pub async fn measure_execution_time_async<T, F>(future: F) -> (Result<T>, Duration)
where
    F: Future<Output = Result<T>>,
{
    let start = Instant::now();
    let result = future.await;
    (result, start.elapsed())
}

/// Current UTC time as an RFC 3339 string
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Checks that a model identifier can double as an artifact file name
///
/// # Examples
///
/// ```
/// use common::utils::validate_model_id;
///
/// assert!(validate_model_id("sales-forecast_v2").is_ok());
/// assert!(validate_model_id("../etc/passwd").is_err());
/// ```
pub fn validate_model_id(model_id: &str) -> Result<()> {
    if model_id.is_empty() {
        return Err(Error::InvalidInput("model identifier must not be empty".to_string()));
    }
    
    if model_id.len() > MAX_MODEL_ID_LENGTH {
        return Err(Error::InvalidInput(format!(
            "model identifier exceeds {} characters",
            MAX_MODEL_ID_LENGTH
        )));
    }
    
    if model_id == "." || model_id == ".." {
        return Err(Error::InvalidInput(format!("invalid model identifier: {}", model_id)));
    }
    
    if let Some(ch) = model_id
        .chars()
        .find(|ch| !(ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.')))
    {
        return Err(Error::InvalidInput(format!(
            "model identifier contains unsupported character {:?}: {}",
            ch, model_id
        )));
    }
    
    Ok(())
}
