// Authentication error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;
use tracing::{error, warn};

/// Errors raised while registering users or handling tokens.
///
/// Validation failures are not part of this enum: they are reported to the
/// client inside a successful response (see `AuthService::register`).
#[derive(Debug)]
pub enum AuthError {
    UsernameAlreadyExists,
    DatabaseError(String),
    PasswordHashError(String),
    TokenGenerationError(String),
    InvalidToken,
    ExpiredToken,
    /// Stored role value that no `Role` variant matches
    InvalidRole(String),
    ConfigError(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::UsernameAlreadyExists => write!(f, "Username already exists"),
            AuthError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            AuthError::PasswordHashError(msg) => write!(f, "Password hashing error: {}", msg),
            AuthError::TokenGenerationError(msg) => write!(f, "Token generation error: {}", msg),
            AuthError::InvalidToken => write!(f, "Invalid token"),
            AuthError::ExpiredToken => write!(f, "Token has expired"),
            AuthError::InvalidRole(role) => write!(f, "Invalid role: {}", role),
            AuthError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for AuthError {}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        AuthError::DatabaseError(err.to_string())
    }
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::UsernameAlreadyExists => StatusCode::CONFLICT,
            AuthError::InvalidToken | AuthError::ExpiredToken => StatusCode::UNAUTHORIZED,
            AuthError::DatabaseError(_)
            | AuthError::PasswordHashError(_)
            | AuthError::TokenGenerationError(_)
            | AuthError::InvalidRole(_)
            | AuthError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to send to clients (no internal details)
    pub fn error_message(&self) -> String {
        match self {
            AuthError::UsernameAlreadyExists => "Username already exists".to_string(),
            AuthError::InvalidToken => "Invalid token".to_string(),
            AuthError::ExpiredToken => "Token has expired".to_string(),
            AuthError::DatabaseError(_)
            | AuthError::PasswordHashError(_)
            | AuthError::TokenGenerationError(_)
            | AuthError::InvalidRole(_)
            | AuthError::ConfigError(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match &self {
            AuthError::UsernameAlreadyExists => warn!("Registration rejected: username already exists"),
            AuthError::InvalidToken | AuthError::ExpiredToken => warn!("Token rejected: {}", self),
            _ => error!("Auth failure: {}", self),
        }

        let body = Json(json!({
            "error": self.error_message(),
        }));

        (self.status_code(), body).into_response()
    }
}
