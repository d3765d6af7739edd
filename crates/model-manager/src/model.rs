//! Model capability shared by every variant

use std::fmt;

use serde_json::Value;

use common::error::Result;
use common::models::{ModelVariant, Prediction, TrainingMetrics};

use crate::classifier::Classifier;
use crate::forecaster::Forecaster;

/// A trainable, persistable model
///
/// Implementations keep their fitted parameters in memory. Persisting them is
/// the caller's job: `artifact` serializes them and `load` restores them.
pub trait Model: Send + Sync + fmt::Debug {
    /// Variant tag of the implementation
    fn variant(&self) -> ModelVariant;
    
    /// Returns true once the model was trained or loaded
    fn is_fitted(&self) -> bool;
    
    /// Fits the model, replacing any previous parameters
    ///
    /// On failure the previous parameters are left in place.
    fn train(&mut self, data: &Value, parameters: &Value) -> Result<TrainingMetrics>;
    
    /// Runs a prediction; never mutates the fitted parameters
    fn predict(&self, input: &Value) -> Result<Prediction>;
    
    /// Restores fitted parameters from a stored artifact
    fn load(&mut self, artifact: &Value) -> Result<()>;
    
    /// Serializes the fitted parameters into an artifact
    fn artifact(&self) -> Result<Value>;
}

/// Creates an empty model of the given variant
pub fn create_model(variant: ModelVariant) -> Box<dyn Model> {
    match variant {
        ModelVariant::TimeSeries => Box::new(Forecaster::new()),
        ModelVariant::Nlp => Box::new(Classifier::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_model_matches_variant() {
        for variant in [ModelVariant::TimeSeries, ModelVariant::Nlp] {
            let model = create_model(variant);
            assert_eq!(model.variant(), variant);
            assert!(!model.is_fitted());
            assert!(model.artifact().unwrap_err().is_not_fitted());
        }
    }
}
