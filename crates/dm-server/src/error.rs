//! JSON error responses for the HTTP API.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dm_retrieval::RetrievalError;
use dm_vectordb::VectorDbError;
use serde_json::json;

/// API error with status code and message.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, msg: impl Into<String>) -> Self {
        Self { status, code, message: msg.into() }
    }
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "not_found", msg)
    }
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "bad_request", msg)
    }
    pub fn service_unavailable(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, "unavailable", msg)
    }
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": {
                "code": self.code,
                "message": self.message,
            }
        });
        (self.status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::new(StatusCode::BAD_REQUEST, "invalid_body", rejection.body_text())
    }
}

impl From<VectorDbError> for ApiError {
    fn from(err: VectorDbError) -> Self {
        let msg = err.to_string();
        match err {
            VectorDbError::InvalidK => ApiError::new(StatusCode::BAD_REQUEST, "invalid_k", msg),
            VectorDbError::DimensionMismatch { .. } => {
                ApiError::new(StatusCode::BAD_REQUEST, "dimension_mismatch", msg)
            }
            VectorDbError::DegenerateVector(_) => {
                ApiError::new(StatusCode::BAD_REQUEST, "degenerate_vector", msg)
            }
            VectorDbError::EmptyInput => ApiError::new(StatusCode::BAD_REQUEST, "empty_input", msg),
            VectorDbError::DuplicateId(_) | VectorDbError::InvalidRecord(_) => ApiError::bad_request(msg),
            VectorDbError::NoResults => ApiError::new(StatusCode::NOT_FOUND, "no_results", msg),
            VectorDbError::CorruptIndex(_) => {
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "corrupt_index", msg)
            }
            VectorDbError::Io(_) => ApiError::internal(msg),
        }
    }
}

impl From<RetrievalError> for ApiError {
    fn from(err: RetrievalError) -> Self {
        match err {
            RetrievalError::Index(e) => e.into(),
            RetrievalError::NoResults => {
                ApiError::new(StatusCode::NOT_FOUND, "no_results", err.to_string())
            }
            RetrievalError::EmbeddingTimeout { .. } => {
                ApiError::new(StatusCode::GATEWAY_TIMEOUT, "embedding_timeout", err.to_string())
            }
            RetrievalError::Provider(_) => {
                ApiError::new(StatusCode::BAD_GATEWAY, "provider_error", err.to_string())
            }
            RetrievalError::Ingest { .. } => ApiError::bad_request(err.to_string()),
            RetrievalError::Io(_) => ApiError::internal(err.to_string()),
        }
    }
}
