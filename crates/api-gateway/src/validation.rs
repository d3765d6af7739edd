//! Request and response bodies

use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use common::models::TrainingMetrics;

/// Body of `POST /train`
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TrainRequest {
    #[validate(length(min = 1, max = 128))]
    pub model_id: String,
    
    #[serde(rename = "type")]
    pub model_type: String,
    
    pub data: Value,
    
    #[serde(default)]
    pub parameters: Value,
}

/// Body of `POST /predict`
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PredictRequest {
    #[validate(length(min = 1, max = 128))]
    pub model_id: String,
    
    #[serde(rename = "type")]
    pub model_type: String,
    
    #[serde(default)]
    pub model_path: Option<String>,
    
    pub input: Value,
}

/// Body returned by `POST /train`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainResponse {
    pub model_id: String,
    pub status: String,
    pub metrics: TrainingMetrics,
    pub model_path: String,
}

/// Body returned by `GET /models`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelList {
    pub models: Vec<String>,
    pub count: usize,
}
