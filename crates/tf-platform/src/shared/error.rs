//! Platform Error Types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Error, Debug)]
pub enum TravelFlowError {
    #[error("Booking not found: {id}")]
    NotFound { id: String },

    #[error("User not found: {id}")]
    UserNotFound { id: String },

    #[error("Email is already in use: {email}")]
    EmailInUse { email: String },

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Invalid booking status: {status}")]
    InvalidStatus { status: String },

    #[error("Invalid token: {message}")]
    InvalidToken { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bson::ser::Error),

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl TravelFlowError {
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    pub fn user_not_found(id: impl Into<String>) -> Self {
        Self::UserNotFound { id: id.into() }
    }

    pub fn email_in_use(email: impl Into<String>) -> Self {
        Self::EmailInUse { email: email.into() }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized { message: message.into() }
    }

    pub fn invalid_status(status: impl Into<String>) -> Self {
        Self::InvalidStatus { status: status.into() }
    }

    pub fn invalid_token(message: impl Into<String>) -> Self {
        Self::InvalidToken { message: message.into() }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation { message: message.into() }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal { message: message.into() }
    }
}

pub type Result<T> = std::result::Result<T, TravelFlowError>;

/// Error response body
#[derive(Debug, serde::Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for TravelFlowError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            TravelFlowError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            TravelFlowError::UserNotFound { .. } => (StatusCode::NOT_FOUND, "USER_NOT_FOUND"),
            TravelFlowError::EmailInUse { .. } => (StatusCode::CONFLICT, "EMAIL_IN_USE"),
            TravelFlowError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS")
            }
            TravelFlowError::Unauthorized { .. } => (StatusCode::FORBIDDEN, "UNAUTHORIZED"),
            TravelFlowError::InvalidStatus { .. } => (StatusCode::BAD_REQUEST, "INVALID_STATUS"),
            TravelFlowError::InvalidToken { .. } => (StatusCode::UNAUTHORIZED, "INVALID_TOKEN"),
            TravelFlowError::Validation { .. } => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_are_specific() {
        let err = TravelFlowError::not_found("b-1");
        assert_eq!(err.to_string(), "Booking not found: b-1");

        let err = TravelFlowError::email_in_use("a@b.com");
        assert_eq!(err.to_string(), "Email is already in use: a@b.com");

        let err = TravelFlowError::invalid_status("bogus");
        assert_eq!(err.to_string(), "Invalid booking status: bogus");
    }

    #[test]
    fn ownership_and_existence_failures_stay_distinguishable() {
        // The engine surfaces NotFound and Unauthorized as separate kinds;
        // the transport must not collapse them.
        let not_found = TravelFlowError::not_found("b-1").into_response();
        let unauthorized =
            TravelFlowError::unauthorized("Unauthorized access to booking").into_response();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
        assert_eq!(unauthorized.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn token_failures_map_to_401() {
        assert_eq!(
            TravelFlowError::invalid_token("garbage").into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            TravelFlowError::InvalidCredentials.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
    }
}
