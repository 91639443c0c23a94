//! Verse Store Error Types
//!
//! 애플리케이션 전역 에러 타입 정의

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Verse Store 에러
#[derive(Error, Debug)]
pub enum VerseError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Duplicate key: Book_id={book}, Chapter_id={chapter}, Verse_id={verse}")]
    DuplicateKey {
        book: String,
        chapter: String,
        verse: String,
    },

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("{service} service unavailable: {reason}")]
    UpstreamUnavailable { service: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to acquire store lock")]
    LockPoisoned,

    #[error("Store task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl VerseError {
    pub fn upstream(service: &str, reason: impl ToString) -> Self {
        VerseError::UpstreamUnavailable {
            service: service.to_string(),
            reason: reason.to_string(),
        }
    }

    /// 응답용 에러 코드
    pub fn code(&self) -> &'static str {
        match self {
            VerseError::Validation(_) => "VALIDATION_ERROR",
            VerseError::DuplicateKey { .. } => "DUPLICATE_KEY",
            VerseError::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            VerseError::Store(_) => "STORE_ERROR",
            VerseError::UpstreamUnavailable { .. } => "UPSTREAM_UNAVAILABLE",
            VerseError::Io(_) => "IO_ERROR",
            VerseError::Serialization(_) => "SERIALIZATION_ERROR",
            VerseError::Config(_) => "CONFIG_ERROR",
            VerseError::LockPoisoned => "LOCK_ERROR",
            VerseError::Task(_) => "TASK_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            VerseError::Validation(_) | VerseError::DuplicateKey { .. } => StatusCode::BAD_REQUEST,
            VerseError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            VerseError::UpstreamUnavailable { .. } => StatusCode::BAD_GATEWAY,
            VerseError::Store(_)
            | VerseError::Io(_)
            | VerseError::Serialization(_)
            | VerseError::Config(_)
            | VerseError::LockPoisoned
            | VerseError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// HTTP 응답용 직렬화 가능한 에러
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub code: String,
    pub message: String,
    pub details: Option<String>,
}

impl From<VerseError> for ApiError {
    fn from(error: VerseError) -> Self {
        let details = match &error {
            VerseError::Store(e) => Some(format!("{e:?}")),
            _ => None,
        };

        ApiError {
            status: error.status(),
            code: error.code().to_string(),
            message: error.to_string(),
            details,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

/// 핸들러 결과 타입
pub type ApiResult<T> = Result<T, ApiError>;
