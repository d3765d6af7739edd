//! Moving-average time-series forecaster

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use common::error::{Error, Result};
use common::models::{ModelVariant, Prediction, TrainingMetrics};

use crate::model::Model;
use crate::params::{input_object, parameter_object, type_name, usize_field};

/// Window size used when the caller does not supply one
pub const DEFAULT_WINDOW_SIZE: usize = 5;

/// Number of steps forecast when the caller does not supply one
pub const DEFAULT_STEPS: usize = 1;

/// Upper bound on the forecast horizon
pub const MAX_FORECAST_STEPS: usize = 10_000;

/// Fixed confidence reported with every forecast
pub const FORECAST_CONFIDENCE: f64 = 0.85;

/// Artifact kind tag
pub const MOVING_AVERAGE_KIND: &str = "moving_average";

/// Fitted forecaster parameters, also the artifact layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecasterParams {
    /// Artifact kind, always `moving_average`
    #[serde(rename = "type")]
    pub kind: String,
    
    /// Number of trailing observations averaged per step
    pub window_size: usize,
    
    /// The final `window_size` observations seen during training
    pub last_values: Vec<f64>,
}

/// Forecast output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastOutput {
    /// Forecast values, one per step
    pub predictions: Vec<f64>,
    
    /// Number of steps forecast
    pub steps: usize,
}

/// Moving-average forecaster
#[derive(Debug, Default)]
pub struct Forecaster {
    params: Option<ForecasterParams>,
}

impl Forecaster {
    /// Creates an unfitted forecaster
    pub fn new() -> Self {
        Self::default()
    }
    
    /// Fitted parameters, if any
    pub fn params(&self) -> Option<&ForecasterParams> {
        self.params.as_ref()
    }
    
    fn fitted(&self) -> Result<&ForecasterParams> {
        self.params
            .as_ref()
            .ok_or_else(|| Error::ModelNotFitted("forecaster has not been trained or loaded".to_string()))
    }
}

/// Converts a training payload into a numeric series
///
/// Accepts `{"values": [...]}`, an object whose values are the observations
/// (in document order) or a bare array.
pub fn coerce_series(data: &Value) -> Result<Vec<f64>> {
    match data {
        Value::Object(map) => match map.get("values") {
            Some(Value::Array(items)) => items.iter().map(coerce_number).collect(),
            Some(other) => Err(Error::InvalidInput(format!(
                "values must be an array, got {}",
                type_name(other)
            ))),
            None => map.values().map(coerce_number).collect(),
        },
        Value::Array(items) => items.iter().map(coerce_number).collect(),
        other => Err(Error::InvalidInput(format!(
            "time-series data must be an object or an array, got {}",
            type_name(other)
        ))),
    }
}

fn coerce_number(value: &Value) -> Result<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    
    match number {
        Some(n) if n.is_finite() => Ok(n),
        _ => Err(Error::InvalidInput(format!("not a finite number: {}", value))),
    }
}

fn mean<'a>(values: impl ExactSizeIterator<Item = &'a f64>) -> f64 {
    let len = values.len() as f64;
    values.sum::<f64>() / len
}

impl Model for Forecaster {
    fn variant(&self) -> ModelVariant {
        ModelVariant::TimeSeries
    }
    
    fn is_fitted(&self) -> bool {
        self.params.is_some()
    }
    
    fn train(&mut self, data: &Value, parameters: &Value) -> Result<TrainingMetrics> {
        let series = coerce_series(data)?;
        let parameters = parameter_object(parameters)?;
        let window_size = usize_field(parameters, "window_size", DEFAULT_WINDOW_SIZE)?;
        let samples = series.len();
        
        if window_size == 0 || window_size >= samples {
            return Err(Error::InvalidParameter(format!(
                "window_size must be between 1 and {} for {} observations, got {}",
                samples.saturating_sub(1),
                samples,
                window_size
            )));
        }
        
        // Each window predicts the observation right after it
        let errors: Vec<f64> = series[..samples - 1]
            .windows(window_size)
            .zip(&series[window_size..])
            .map(|(window, actual)| mean(window.iter()) - actual)
            .collect();
        
        let count = errors.len() as f64;
        let mae = errors.iter().map(|e| e.abs()).sum::<f64>() / count;
        let rmse = (errors.iter().map(|e| e * e).sum::<f64>() / count).sqrt();
        
        debug!("Fitted moving average with window {} over {} observations", window_size, samples);
        
        self.params = Some(ForecasterParams {
            kind: MOVING_AVERAGE_KIND.to_string(),
            window_size,
            last_values: series[samples - window_size..].to_vec(),
        });
        
        Ok(TrainingMetrics::Forecast { mae, rmse, samples })
    }
    
    fn predict(&self, input: &Value) -> Result<Prediction> {
        let params = self.fitted()?;
        let input = input_object(input, "prediction input")?;
        let steps = usize_field(Some(input), "steps", DEFAULT_STEPS)?;
        
        if steps > MAX_FORECAST_STEPS {
            return Err(Error::InvalidParameter(format!(
                "steps must not exceed {}, got {}",
                MAX_FORECAST_STEPS, steps
            )));
        }
        
        let mut window: VecDeque<f64> = params.last_values.iter().copied().collect();
        let mut predictions = Vec::with_capacity(steps);
        
        for _ in 0..steps {
            let next = mean(window.iter());
            predictions.push(next);
            window.pop_front();
            window.push_back(next);
        }
        
        Prediction::new(&ForecastOutput { predictions, steps }, Some(FORECAST_CONFIDENCE))
    }
    
    fn load(&mut self, artifact: &Value) -> Result<()> {
        let params = ForecasterParams::deserialize(artifact)
            .map_err(|e| Error::InvalidInput(format!("malformed forecaster artifact: {}", e)))?;
        
        if params.kind != MOVING_AVERAGE_KIND {
            return Err(Error::InvalidInput(format!("unknown forecaster kind: {}", params.kind)));
        }
        
        if params.window_size == 0 || params.last_values.len() != params.window_size {
            return Err(Error::InvalidInput(format!(
                "forecaster artifact holds {} values for window size {}",
                params.last_values.len(),
                params.window_size
            )));
        }
        
        if params.last_values.iter().any(|v| !v.is_finite()) {
            return Err(Error::InvalidInput("forecaster artifact holds non-finite values".to_string()));
        }
        
        self.params = Some(params);
        Ok(())
    }
    
    fn artifact(&self) -> Result<Value> {
        Ok(serde_json::to_value(self.fitted()?)?)
    }
}
