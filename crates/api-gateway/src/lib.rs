//! HTTP API for the AI model service
//!
//! This crate exposes the model manager over a small REST surface:
//! train, predict, list models, health and a service banner.

pub mod error;
pub mod handlers;
pub mod rest;
pub mod routes;
pub mod validation;

// Re-export commonly used types
pub use error::ApiError;
pub use rest::RestApi;
pub use routes::{router, ApiState};
