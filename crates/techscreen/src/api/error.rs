//! Unified API error handling with structured responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

/// API error type with structured responses.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Gateway error: {0}")]
    BadGateway(String),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn bad_gateway(msg: impl Into<String>) -> Self {
        Self::BadGateway(msg.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BadGateway(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Conflict(_) => "CONFLICT",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::BadGateway(_) => "BAD_GATEWAY",
        }
    }

    /// Categorize an anyhow error into the appropriate ApiError variant.
    /// This uses pattern matching on the outermost context message.
    ///
    /// Patterns recognized:
    /// - "invalid" / "required" / "must" -> BadRequest (validation)
    /// - "no interview" / "already" -> Conflict (wrong driver state)
    /// - "chat completion" -> BadGateway (language-model fault)
    /// - Default -> Internal
    pub fn from_anyhow(err: anyhow::Error) -> Self {
        let msg = err.to_string();
        let msg_lower = msg.to_lowercase();

        if msg_lower.contains("invalid")
            || msg_lower.contains("required")
            || msg_lower.contains("must")
        {
            ApiError::BadRequest(msg)
        } else if msg_lower.contains("no interview") || msg_lower.contains("already") {
            ApiError::Conflict(msg)
        } else if msg_lower.contains("chat completion") {
            ApiError::BadGateway(format!("{err:#}"))
        } else {
            ApiError::Internal(format!("{err:#}"))
        }
    }
}

/// Structured error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();
        let message = self.to_string();

        match &self {
            ApiError::Internal(msg) => {
                error!(error_code = code, message = %msg, "API error");
            }
            ApiError::BadGateway(msg) => {
                warn!(error_code = code, message = %msg, "upstream error");
            }
            _ => {
                tracing::debug!(error_code = code, message = %message, "client error");
            }
        }

        let body = ErrorResponse {
            error: message,
            code,
        };

        (status, Json(body)).into_response()
    }
}

/// Convert anyhow errors to API errors using the centralized categorization.
impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::from_anyhow(err)
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_map_to_bad_request() {
        let err = anyhow::anyhow!("invalid submission: phone must be a digits-only number");
        assert!(matches!(
            ApiError::from_anyhow(err),
            ApiError::BadRequest(_)
        ));
    }

    #[test]
    fn missing_field_maps_to_bad_request() {
        let err = anyhow::anyhow!("invalid submission: full name is required");
        assert!(matches!(
            ApiError::from_anyhow(err),
            ApiError::BadRequest(_)
        ));
    }

    #[test]
    fn idle_state_maps_to_conflict() {
        let err = anyhow::anyhow!("no interview in progress");
        assert!(matches!(ApiError::from_anyhow(err), ApiError::Conflict(_)));
    }

    #[test]
    fn model_faults_map_to_bad_gateway() {
        let err = anyhow::anyhow!("connection reset by peer").context("requesting chat completion");
        assert!(matches!(
            ApiError::from_anyhow(err),
            ApiError::BadGateway(_)
        ));
    }

    #[test]
    fn unknown_errors_default_to_internal() {
        let err = anyhow::anyhow!("something went wrong");
        assert!(matches!(ApiError::from_anyhow(err), ApiError::Internal(_)));
    }

    #[test]
    fn status_codes_track_variants() {
        assert_eq!(
            ApiError::bad_request("").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::conflict("").status_code(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::internal("").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::bad_gateway("").status_code(),
            StatusCode::BAD_GATEWAY
        );
    }
}
