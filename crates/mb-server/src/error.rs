//! Error-to-HTTP response conversion.
//!
//! [`AppError`] wraps [`mb_core::Error`] together with the request id and
//! implements `IntoResponse`, so route handlers can return
//! `Result<T, AppError>` directly.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::middleware::request_id::RequestId;

/// A domain error on its way out as a JSON response.
pub struct AppError {
    inner: mb_core::Error,
    request_id: Option<String>,
}

impl AppError {
    pub fn new(inner: mb_core::Error) -> Self {
        Self {
            inner,
            request_id: None,
        }
    }

    pub fn with_request_id(mut self, id: &RequestId) -> Self {
        self.request_id = Some(id.0.clone());
        self
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.inner.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(
                status = %status,
                error = %self.inner,
                "Server error in API handler"
            );
        } else {
            tracing::debug!(status = %status, error = %self.inner, "Request rejected");
        }

        let code = match &self.inner {
            mb_core::Error::NotFound { .. } => "not_found",
            mb_core::Error::Forbidden(_) => "forbidden",
            mb_core::Error::Validation(_) => "validation_error",
            mb_core::Error::RangeNotSatisfiable { .. } => "range_not_satisfiable",
            mb_core::Error::Io { .. } => "io_error",
            mb_core::Error::Internal(_) => "internal_error",
        };

        let body = json!({
            "error": self.inner.to_string(),
            "code": code,
            "request_id": self.request_id,
        });

        let mut response = (status, axum::Json(body)).into_response();

        if let mb_core::Error::RangeNotSatisfiable { size, .. } = &self.inner {
            if let Ok(value) = HeaderValue::from_str(&format!("bytes */{size}")) {
                response.headers_mut().insert(header::CONTENT_RANGE, value);
            }
        }

        response
    }
}
