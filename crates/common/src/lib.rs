//! Common utilities and types for the AI model service
//! 
//! This crate provides shared functionality used across the service,
//! including the error taxonomy, model variant tags, training metrics and
//! prediction payloads.

pub mod error;
pub mod models;
pub mod utils;

// Re-export commonly used types
pub use error::{Error, Result};
pub use models::*;
