//! HTTP-boundary error type (§7)

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("invalid state: {0}")]
    InvalidState(String),
    #[error("validation failed: {0}")]
    ValidationFailed(String),
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("generation failed: {0}")]
    GenerationFailed(String),
    #[error("index unavailable: {0}")]
    IndexUnavailable(String),
    #[error("speech-to-text unavailable: {0}")]
    SttUnavailable(String),
    #[error("CV processing unavailable: {0}")]
    CvUnavailable(String),
    #[error("malformed frame: {0}")]
    BadFrame(String),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl AppError {
    fn kind(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "not_found",
            AppError::InvalidState(_) => "invalid_state",
            AppError::ValidationFailed(_) => "validation_failed",
            AppError::UnsupportedFormat(_) => "unsupported_format",
            AppError::GenerationFailed(_) => "generation_failed",
            AppError::IndexUnavailable(_) => "index_unavailable",
            AppError::SttUnavailable(_) => "stt_unavailable",
            AppError::CvUnavailable(_) => "cv_unavailable",
            AppError::BadFrame(_) => "bad_frame",
            AppError::Internal(_) => "internal_error",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidState(_) => StatusCode::CONFLICT,
            AppError::ValidationFailed(_) => StatusCode::BAD_REQUEST,
            AppError::UnsupportedFormat(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AppError::GenerationFailed(_) => StatusCode::BAD_GATEWAY,
            AppError::IndexUnavailable(_)
            | AppError::SttUnavailable(_)
            | AppError::CvUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::BadFrame(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if matches!(self, AppError::Internal(_)) {
            tracing::error!("internal error: {:?}", self);
        }

        let status = self.status();
        let body = ErrorBody {
            error: self.kind(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

impl From<crate::proctoring::ProctoringError> for AppError {
    fn from(err: crate::proctoring::ProctoringError) -> Self {
        match err {
            crate::proctoring::ProctoringError::UnknownSession(id) => {
                AppError::NotFound(format!("monitoring session {id}"))
            }
            crate::proctoring::ProctoringError::BadFrame(msg) => AppError::BadFrame(msg),
        }
    }
}
