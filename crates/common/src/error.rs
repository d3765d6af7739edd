//! Error types for the common crate
//!
//! This module defines the error taxonomy shared by the model store, the
//! model implementations and the lifecycle manager.

use thiserror::Error;

/// Result type for model service operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for model service operations
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Malformed or uncoercible input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Parameter outside of its domain
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Unknown model variant tag
    #[error("Unsupported model type: {0}")]
    UnsupportedType(String),

    /// Prediction requested before the model was trained or loaded
    #[error("Model not fitted: {0}")]
    ModelNotFitted(String),

    /// Load referenced an artifact that does not exist
    #[error("Artifact not found: {0}")]
    ArtifactNotFound(String),

    /// Wrapper around any failure raised while training
    #[error("Training failed: {0}")]
    TrainingFailed(String),

    /// Wrapper around any failure raised while predicting
    #[error("Prediction failed: {0}")]
    PredictionFailed(String),
}

impl Error {
    /// Returns true if the error was caused by the caller rather than the service
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::UnsupportedType(_) | Error::InvalidInput(_) | Error::InvalidParameter(_)
        )
    }

    /// Returns true if the error is an unsupported type error
    pub fn is_unsupported_type(&self) -> bool {
        matches!(self, Error::UnsupportedType(_))
    }

    /// Returns true if the error is an artifact not found error
    pub fn is_artifact_not_found(&self) -> bool {
        matches!(self, Error::ArtifactNotFound(_))
    }

    /// Returns true if the error is a model not fitted error
    pub fn is_not_fitted(&self) -> bool {
        matches!(self, Error::ModelNotFitted(_))
    }
}
