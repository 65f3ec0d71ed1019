//! Response shapes for `/api/v1`
//!
//! Handlers return [`ApiResult`]: success bodies are `{data, meta}`, errors
//! are `{error: {code, message}, meta}`. The HTTP status of an error is a
//! function of its [`ErrorCode`], and [`DashboardError`] converts into one
//! so handlers can use `?`.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::logbook::ExportError;
use crate::pipeline::{CsvExport, DashboardError};

pub const API_VERSION: &str = "1";

pub type ApiResult<T> = Result<Envelope<T>, ApiError>;

#[derive(Debug, Serialize)]
pub struct Meta {
    pub timestamp: DateTime<Utc>,
    pub version: &'static str,
}

impl Meta {
    fn now() -> Self {
        Self {
            timestamp: Utc::now(),
            version: API_VERSION,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub data: T,
    pub meta: Meta,
}

impl<T: Serialize> Envelope<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            meta: Meta::now(),
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NotFound,
    BadRequest,
    ServiceUnavailable,
    InternalError,
}

impl ErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::BadRequest => StatusCode::BAD_REQUEST,
            ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: Meta,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            error: ErrorBody {
                code,
                message: message.into(),
            },
            meta: Meta::now(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadRequest, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.error.code.status(), Json(self)).into_response()
    }
}

impl From<DashboardError> for ApiError {
    fn from(err: DashboardError) -> Self {
        let code = match &err {
            DashboardError::Export(ExportError::NoEntries) => ErrorCode::NotFound,
            DashboardError::Settings(_) => ErrorCode::BadRequest,
            DashboardError::Streams(_) => ErrorCode::ServiceUnavailable,
            DashboardError::Storage(_) | DashboardError::Export(_) => {
                tracing::error!(error = %err, "Dashboard operation failed");
                ErrorCode::InternalError
            }
        };
        Self::new(code, err.to_string())
    }
}

// ============================================================================
// CSV download
// ============================================================================

/// A CSV export served as an attachment.
#[derive(Debug)]
pub struct CsvDownload(pub CsvExport);

impl IntoResponse for CsvDownload {
    fn into_response(self) -> Response {
        let CsvExport { filename, content } = self.0;
        (
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{filename}\""),
                ),
            ],
            content,
        )
            .into_response()
    }
}
