use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::chunking::EngineError;
use crate::document::ExtractError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unknown chunking strategy: {0}")]
    UnknownStrategy(String),

    #[error("Text extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::UnknownStrategy(name) => ApiError::UnknownStrategy(name),
            EngineError::InvalidChunkSize => {
                ApiError::BadRequest("chunk_size must be greater than 0".to_string())
            }
        }
    }
}

impl From<ExtractError> for ApiError {
    fn from(err: ExtractError) -> Self {
        ApiError::ExtractionFailed(err.to_string())
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            ApiError::BadRequest(msg) => {
                tracing::warn!("Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, "BadRequest", msg)
            }
            ApiError::UnknownStrategy(msg) => {
                tracing::warn!("Unknown strategy: {}", msg);
                (StatusCode::BAD_REQUEST, "UnknownStrategy", msg)
            }
            ApiError::ExtractionFailed(msg) => {
                tracing::warn!("Extraction failed: {}", msg);
                (StatusCode::UNPROCESSABLE_ENTITY, "ExtractionFailed", msg)
            }
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "InternalError", msg)
            }
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_unknown_strategy_maps_to_400_with_json_body() {
        let err: ApiError = EngineError::UnknownStrategy("sliding".to_string()).into();
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "UnknownStrategy");
        assert_eq!(body["message"], "sliding");
    }

    #[tokio::test]
    async fn test_invalid_chunk_size_maps_to_400() {
        let err: ApiError = EngineError::InvalidChunkSize.into();
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "BadRequest");
    }

    #[tokio::test]
    async fn test_extraction_failure_maps_to_422() {
        let err = ApiError::ExtractionFailed("no text in document".to_string());
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = body_json(response).await;
        assert_eq!(body["error"], "ExtractionFailed");
        assert_eq!(body["message"], "no text in document");
    }

    #[tokio::test]
    async fn test_internal_error_maps_to_500() {
        let err = ApiError::InternalError("boom".to_string());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
