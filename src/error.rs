use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Per-request failures surfaced by the store, the query façade and the predict endpoints.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReviewError {
    #[error("Invalid ASIN: {0:?}")]
    InvalidIdentifier(String),

    #[error("Unknown ASIN: {0}")]
    NotFound(String),

    #[error("batch of {len} texts exceeds the limit of {max}")]
    BatchTooLarge { len: usize, max: usize },
}

impl ReviewError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidIdentifier(_) => "invalid_identifier",
            Self::NotFound(_) => "not_found",
            Self::BatchTooLarge { .. } => "batch_too_large",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidIdentifier(_) | Self::BatchTooLarge { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    detail: String,
}

impl IntoResponse for ReviewError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            error: self.code(),
            detail: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
