//! Model lifecycle management for the AI model service
//!
//! This crate provides the pluggable model implementations (a moving-average
//! forecaster and a lexicon-based classifier), the in-memory model cache and
//! the manager that drives training, persistence, loading and prediction.

pub mod cache;
pub mod classifier;
pub mod forecaster;
pub mod locks;
pub mod manager;
pub mod model;
mod params;

// Re-export commonly used types
pub use cache::{CacheEntry, ModelCache, SharedModel};
pub use classifier::{Classifier, ClassifierConfig, Sentiment, SentimentScore};
pub use forecaster::{ForecastOutput, Forecaster, ForecasterParams};
pub use locks::IdentifierLocks;
pub use manager::{ModelManager, TrainOutcome};
pub use model::{create_model, Model};
