// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API error types and handling.
//!
//! Guard decisions are not errors; they become redirects in the guard layer.
//! `ApiError` covers malformed requests, authentication failures on the JSON
//! endpoints and server faults.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use vms_core::SessionError;

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

// =============================================================================
// ApiError
// =============================================================================

/// API error type with HTTP status code mapping.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Bad request (400).
    #[error("Bad request: {message}")]
    BadRequest {
        /// Error message.
        message: String,
    },

    /// Unauthorized (401).
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Error message.
        message: String,
    },

    /// Service unavailable (503).
    #[error("Service unavailable: {message}")]
    ServiceUnavailable {
        /// Error message.
        message: String,
    },

    /// Internal server error (500).
    #[error("Internal error: {message}")]
    Internal {
        /// Error message (for logging, not user-facing).
        message: String,
    },

    /// Session error.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

impl ApiError {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Creates a bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Creates an unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Creates a service unavailable error.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable {
            message: message.into(),
        }
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    // =========================================================================
    // Properties
    // =========================================================================

    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            ApiError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Session(e) => match e {
                SessionError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                SessionError::AccountDisabled { .. } => StatusCode::FORBIDDEN,
                SessionError::PasswordHash { .. } => StatusCode::INTERNAL_SERVER_ERROR,
                SessionError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            },
        }
    }

    /// Returns the error code for categorization.
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest { .. } => "BAD_REQUEST",
            ApiError::Unauthorized { .. } => "UNAUTHORIZED",
            ApiError::ServiceUnavailable { .. } => "SERVICE_UNAVAILABLE",
            ApiError::Internal { .. } => "INTERNAL_ERROR",
            ApiError::Session(e) => match e {
                SessionError::InvalidCredentials => "INVALID_CREDENTIALS",
                SessionError::AccountDisabled { .. } => "ACCOUNT_DISABLED",
                SessionError::PasswordHash { .. } => "INTERNAL_ERROR",
                SessionError::Unavailable { .. } => "SERVICE_UNAVAILABLE",
            },
        }
    }

    /// Returns a message safe to show to end users.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::BadRequest { message } => message.clone(),
            ApiError::Unauthorized { .. } => "Authentication required".to_string(),
            ApiError::ServiceUnavailable { .. } => {
                "Service temporarily unavailable".to_string()
            }
            ApiError::Internal { .. } => "Internal server error".to_string(),
            ApiError::Session(e) => match e {
                SessionError::InvalidCredentials => "Invalid email or password".to_string(),
                SessionError::AccountDisabled { .. } => "This account is disabled".to_string(),
                SessionError::PasswordHash { .. } => "Internal server error".to_string(),
                SessionError::Unavailable { .. } => {
                    "Sign-in is temporarily unavailable".to_string()
                }
            },
        }
    }

    /// Returns `true` if this error should be logged at error level.
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }
}

// =============================================================================
// IntoResponse Implementation
// =============================================================================

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorResponseBody {
    /// Error details.
    pub error: ErrorDetails,
}

/// Error details.
#[derive(Debug, Serialize)]
pub struct ErrorDetails {
    /// Machine-readable code.
    pub code: String,
    /// User-facing message.
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();

        if self.is_server_error() {
            tracing::error!(
                error = %self,
                error_code = error_code,
                status = %status,
                "Server error occurred"
            );
        } else {
            tracing::debug!(
                error = %self,
                error_code = error_code,
                status = %status,
                "Client error occurred"
            );
        }

        let body = ErrorResponseBody {
            error: ErrorDetails {
                code: error_code.to_string(),
                message: self.user_message(),
            },
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::bad_request("bad path").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(SessionError::InvalidCredentials).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::from(SessionError::account_disabled("a@b.c")).status_code(),
            StatusCode::FORBIDDEN
        );
        assert!(ApiError::from(SessionError::unavailable("down")).is_server_error());
    }

    #[test]
    fn test_user_message_hides_internals() {
        let error = ApiError::internal("database password leaked in message");
        assert_eq!(error.user_message(), "Internal server error");
        assert_eq!(error.error_code(), "INTERNAL_ERROR");
    }

    #[tokio::test]
    async fn test_into_response_body() {
        let response = ApiError::unauthorized("missing session").into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["error"]["code"], "UNAUTHORIZED");
    }
}
