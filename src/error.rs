//! Error handling

use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::logic::image::DecodeError;
use crate::logic::model::InferenceError;

pub type AppResult<T> = Result<T, AppError>;

/// Fault raised while processing an accepted request.
///
/// The kinds stay distinct for logging even though they share one
/// response shape.
#[derive(Debug, Error)]
pub enum Fault {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Inference(#[from] InferenceError),

    #[error("{0}")]
    Unknown(String),
}

impl Fault {
    /// Stable label for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Fault::Decode(_) => "decode",
            Fault::Inference(_) => "inference",
            Fault::Unknown(_) => "unknown",
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    // Request is missing required input
    #[error("{0}")]
    Validation(String),

    // Anything that went wrong after validation
    #[error(transparent)]
    Fault(#[from] Fault),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation(msg) => {
                tracing::debug!("Rejected request: {}", msg);
                StatusCode::BAD_REQUEST
            }
            AppError::Fault(fault) => {
                tracing::error!(kind = fault.kind(), "Request failed: {}", fault);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_validation_is_400() {
        let response = AppError::Validation("No image provided".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, json!({ "error": "No image provided" }));
    }

    #[tokio::test]
    async fn test_every_fault_kind_is_500_with_description() {
        let faults = [
            Fault::Decode(DecodeError::MissingSeparator),
            Fault::Inference(InferenceError::EmptyOutput),
            Fault::Unknown("task panicked".into()),
        ];

        for fault in faults {
            let description = fault.to_string();
            let response = AppError::from(fault).into_response();
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(body_json(response).await, json!({ "error": description }));
        }
    }

    #[test]
    fn test_fault_kinds() {
        assert_eq!(Fault::from(DecodeError::EmptyImage).kind(), "decode");
        assert_eq!(Fault::from(InferenceError::EmptyOutput).kind(), "inference");
        assert_eq!(Fault::Unknown(String::new()).kind(), "unknown");
    }
}
