//! Route table

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use model_manager::ModelManager;

use crate::handlers;

/// Shared handler state
pub struct ApiState {
    pub manager: Arc<ModelManager>,
}

impl ApiState {
    /// Creates handler state around a model manager
    pub fn new(manager: Arc<ModelManager>) -> Self {
        Self { manager }
    }
}

/// Builds the HTTP router
pub fn router(state: Arc<ApiState>, cors_enabled: bool) -> Router {
    let router = Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/train", post(handlers::train))
        .route("/predict", post(handlers::predict))
        .route("/models", get(handlers::list_models))
        .with_state(state)
        .layer(TraceLayer::new_for_http());
    
    if cors_enabled {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}
