//! Error envelope shared by every HTTP endpoint.

use axum::extract::rejection::JsonRejection;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::domain::trip::TripError;

/// Seconds a client should wait before retrying a transient storage failure.
const STORAGE_RETRY_AFTER_SECS: &str = "1";

/// Standard error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(
        error_code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            details: Some(details),
        }
    }
}

/// API error wrapper that converts `TripError` into an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub TripError);

impl From<TripError> for ApiError {
    fn from(err: TripError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(TripError::validation("body", rejection.body_text()))
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            TripError::Validation { .. } => StatusCode::BAD_REQUEST,
            TripError::NotFound(_) => StatusCode::NOT_FOUND,
            TripError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            TripError::Forbidden(_) => StatusCode::FORBIDDEN,
            TripError::InvalidState(_) => StatusCode::CONFLICT,
            TripError::Storage(_) | TripError::ServiceUnavailable(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self.0 {
            TripError::Validation { field, .. } => ErrorResponse::with_details(
                self.0.code(),
                self.0.message(),
                serde_json::json!({ "field": field }),
            ),
            TripError::Storage(_) => {
                tracing::error!(error = %self.0, "Storage failure");
                ErrorResponse::new(self.0.code(), "Temporary storage failure, please retry")
            }
            _ => ErrorResponse::new(self.0.code(), self.0.message()),
        };

        let mut response = (status, Json(body)).into_response();
        if self.0.is_retryable() {
            response.headers_mut().insert(
                header::RETRY_AFTER,
                HeaderValue::from_static(STORAGE_RETRY_AFTER_SECS),
            );
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: TripError) -> StatusCode {
        ApiError(err).into_response().status()
    }

    #[test]
    fn maps_each_error_kind_to_status() {
        assert_eq!(status_of(TripError::validation("amount", "bad")), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(TripError::not_found("trip")), StatusCode::NOT_FOUND);
        assert_eq!(status_of(TripError::unauthenticated("who")), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(TripError::forbidden("no")), StatusCode::FORBIDDEN);
        assert_eq!(status_of(TripError::invalid_state("trip is locked")), StatusCode::CONFLICT);
        assert_eq!(status_of(TripError::storage("timeout")), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            status_of(TripError::service_unavailable("codes")),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn storage_errors_carry_retry_after() {
        let response = ApiError(TripError::storage("timeout")).into_response();
        assert_eq!(response.headers().get(header::RETRY_AFTER).unwrap(), "1");
    }

    #[test]
    fn exhausted_retries_do_not_carry_retry_after() {
        let response = ApiError(TripError::service_unavailable("codes")).into_response();
        assert!(response.headers().get(header::RETRY_AFTER).is_none());
    }

    #[test]
    fn error_response_skips_missing_details() {
        let json = serde_json::to_value(ErrorResponse::new("NOT_FOUND", "Trip not found")).unwrap();
        assert_eq!(json["error_code"], "NOT_FOUND");
        assert!(json.get("details").is_none());
    }
}
