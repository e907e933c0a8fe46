use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use kpure_pricing::PricingError;
use serde_json::json;

/// Unified error type that renders as a JSON `{"error": "..."}` response
/// with an appropriate HTTP status code.
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
    pub fields: Option<serde_json::Value>,
}

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, msg)
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, msg)
    }

    fn new(status: StatusCode, msg: impl Into<String>) -> Self {
        Self {
            status,
            message: msg.into(),
            fields: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = match self.fields {
            Some(fields) => json!({ "error": self.message, "fields": fields }),
            None => json!({ "error": self.message }),
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<PricingError> for AppError {
    fn from(e: PricingError) -> Self {
        match e {
            PricingError::NotFound(msg) => AppError::not_found(msg),
            PricingError::InvalidInput(_) | PricingError::InvalidSettings(_) => {
                AppError::bad_request(e.to_string())
            }
            PricingError::Validation(fields) => AppError {
                status: StatusCode::BAD_REQUEST,
                message: "validation failed".to_string(),
                fields: serde_json::to_value(&fields).ok(),
            },
            other => {
                tracing::error!(error = %other, "request failed");
                AppError::internal(other.to_string())
            }
        }
    }
}
