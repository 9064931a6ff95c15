use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;
use crate::outreach::message::MessageError;
use crate::resume::loader::ResumeLoadError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// A capability the request needs produced nothing usable.
    #[error("{0} not available")]
    Unavailable(String),

    #[error("Resume load error: {0}")]
    ResumeLoad(#[from] ResumeLoadError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Message generation error: {0}")]
    Message(#[from] MessageError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Unavailable(_) => {
                tracing::warn!("{self}");
                (StatusCode::SERVICE_UNAVAILABLE, "UNAVAILABLE", self.to_string())
            }
            AppError::ResumeLoad(e) => match e {
                ResumeLoadError::Io { .. } => (StatusCode::NOT_FOUND, "RESUME_NOT_FOUND", e.to_string()),
                ResumeLoadError::Unsupported(_) | ResumeLoadError::Empty(_) | ResumeLoadError::Pdf { .. } => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "RESUME_UNREADABLE",
                    e.to_string(),
                ),
                ResumeLoadError::CachePoisoned => {
                    tracing::error!("Resume load error: {e}");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal server error occurred".to_string(),
                    )
                }
            },
            AppError::Llm(e) => {
                tracing::error!("LLM error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "LLM_ERROR",
                    "An AI processing error occurred".to_string(),
                )
            }
            AppError::Message(e) => {
                tracing::error!("Message generation error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "LLM_ERROR",
                    "An AI processing error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_message() {
        let err = AppError::Unavailable("Job ranking".to_string());
        assert_eq!(err.to_string(), "Job ranking not available");
        assert_eq!(err.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_validation_is_bad_request() {
        let err = AppError::Validation("jobs cannot be empty".to_string());
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_missing_resume_is_not_found() {
        let err = AppError::from(ResumeLoadError::Io {
            path: "/nope.pdf".into(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        });
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }
}
