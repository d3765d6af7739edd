//! Request handlers

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};
use tracing::debug;
use validator::Validate;

use common::models::Prediction;
use common::utils::timestamp;

use crate::error::ApiError;
use crate::routes::ApiState;
use crate::validation::{ModelList, PredictRequest, TrainRequest, TrainResponse};

/// Name reported by the banner endpoint
pub const SERVICE_NAME: &str = "Time Machines AI Service";

/// Version reported by the banner endpoint
pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// `GET /`
pub async fn root() -> Json<Value> {
    Json(json!({
        "service": SERVICE_NAME,
        "status": "running",
        "version": SERVICE_VERSION,
        "timestamp": timestamp(),
    }))
}

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": timestamp(),
    }))
}

/// `POST /train`
pub async fn train(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<TrainRequest>, JsonRejection>,
) -> Result<Json<TrainResponse>, ApiError> {
    let Json(request) = payload?;
    request.validate()?;
    
    debug!("Train request for model {} ({})", request.model_id, request.model_type);
    
    let outcome = state
        .manager
        .train(&request.model_id, &request.model_type, &request.data, &request.parameters)
        .await?;
    
    Ok(Json(TrainResponse {
        model_id: outcome.model_id,
        status: "completed".to_string(),
        metrics: outcome.metrics,
        model_path: outcome.artifact_location,
    }))
}

/// `POST /predict`
pub async fn predict(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<Prediction>, ApiError> {
    let Json(request) = payload?;
    request.validate()?;
    
    let prediction = state
        .manager
        .predict(
            &request.model_id,
            &request.model_type,
            request.model_path.as_deref(),
            &request.input,
        )
        .await?;
    
    Ok(Json(prediction))
}

/// `GET /models`
pub async fn list_models(State(state): State<Arc<ApiState>>) -> Json<ModelList> {
    let models = state.manager.list_models();
    let count = models.len();
    
    Json(ModelList { models, count })
}
