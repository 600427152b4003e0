use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Rate limit exceeded on stage '{stage}' after {attempts} attempts. Please try again in a minute.")]
    RateLimited { stage: String, attempts: u32 },

    #[error("External capability error: {0}")]
    ExternalCapability(String),

    #[error("Report could not be written: {0}")]
    ReportWrite(String),

    #[error("Invalid pipeline: {0}")]
    InvalidPipeline(String),

    #[error("Pipeline cancelled before stage '{0}'")]
    Cancelled(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::ExternalCapability(msg) => {
                tracing::error!("External capability error: {msg}");
                StatusCode::BAD_GATEWAY
            }
            AppError::Cancelled(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Configuration(msg) | AppError::InvalidPipeline(msg) => {
                tracing::error!("Pipeline setup error: {msg}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::ReportWrite(msg) => {
                tracing::error!("Report write error: {msg}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let message = match &self {
            AppError::Internal(_) => "An internal server error occurred".to_string(),
            other => other.to_string(),
        };

        let body = Json(json!({
            "success": false,
            "error": message
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limited_maps_to_429() {
        let response = AppError::RateLimited {
            stage: "research".to_string(),
            attempts: 3,
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let response = AppError::NotFound("results_x.txt".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_rate_limited_message_names_stage() {
        let err = AppError::RateLimited {
            stage: "cover_letter".to_string(),
            attempts: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains("cover_letter"));
        assert!(msg.contains("3 attempts"));
    }
}
