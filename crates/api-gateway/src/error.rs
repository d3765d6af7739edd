//! HTTP error responses

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use validator::ValidationErrors;

/// Error returned to HTTP clients as `{"detail": "..."}`
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    /// Creates a 400 response
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: detail.into(),
        }
    }
    
    /// Creates a 500 response
    pub fn internal(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: detail.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

impl From<common::Error> for ApiError {
    fn from(e: common::Error) -> Self {
        if e.is_client_error() {
            Self::bad_request(e.to_string())
        } else {
            Self::internal(e.to_string())
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(e: ValidationErrors) -> Self {
        Self::bad_request(format!("Invalid request: {}", e))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::Error;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (Error::UnsupportedType("image".into()), StatusCode::BAD_REQUEST),
            (Error::InvalidInput("empty".into()), StatusCode::BAD_REQUEST),
            (Error::InvalidParameter("steps".into()), StatusCode::BAD_REQUEST),
            (Error::TrainingFailed("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (Error::PredictionFailed("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (Error::ArtifactNotFound("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        
        for (error, status) in cases {
            let message = error.to_string();
            let api_error = ApiError::from(error);
            assert_eq!(api_error.status, status);
            assert_eq!(api_error.detail, message);
        }
    }
}
