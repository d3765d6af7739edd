//! Common data models for the AI model service
//!
//! This module defines the model variant tag, training metrics and the
//! prediction payload exchanged between the lifecycle manager and its callers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Model variant tag, fixed at train time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelVariant {
    /// Moving-average time-series forecaster
    #[serde(rename = "time-series")]
    TimeSeries,
    /// Lexicon-based text classifier
    #[serde(rename = "nlp")]
    Nlp,
}

impl ModelVariant {
    /// Wire name of the variant
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelVariant::TimeSeries => "time-series",
            ModelVariant::Nlp => "nlp",
        }
    }
}

impl fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelVariant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "time-series" => Ok(ModelVariant::TimeSeries),
            "nlp" => Ok(ModelVariant::Nlp),
            other => Err(Error::UnsupportedType(other.to_string())),
        }
    }
}

/// Metrics reported by a training run
///
/// Serialized as a flat map so callers see `{"mae": .., "rmse": .., "samples": ..}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TrainingMetrics {
    /// In-sample fit of the moving-average forecaster
    Forecast {
        /// Mean absolute error
        mae: f64,
        /// Root mean squared error
        rmse: f64,
        /// Number of observations
        samples: usize,
    },
    /// Nominal classifier metrics (not measured)
    Classification {
        /// Accuracy
        accuracy: f64,
        /// F1 score
        f1_score: f64,
        /// Number of texts supplied
        samples: usize,
    },
}

impl TrainingMetrics {
    /// Number of samples the run saw
    pub fn samples(&self) -> usize {
        match self {
            TrainingMetrics::Forecast { samples, .. } => *samples,
            TrainingMetrics::Classification { samples, .. } => *samples,
        }
    }
}

/// Output of a single prediction call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Variant specific output object
    pub output: serde_json::Value,

    /// Confidence score, when the model provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl Prediction {
    /// Creates a prediction from a serializable output
    pub fn new<T: Serialize>(output: &T, confidence: Option<f64>) -> crate::Result<Self> {
        Ok(Self {
            output: serde_json::to_value(output)?,
            confidence,
        })
    }
}
