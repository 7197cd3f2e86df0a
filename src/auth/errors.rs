//! # Auth Errors

use thiserror::Error;

/// Result type for auth operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth errors
///
/// User-facing messages are deliberately generic: `InvalidCredentials`
/// renders the same text whether the identifier was unknown or the
/// password was wrong.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("Please provide both identifier and password")]
    MissingCredentials,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Duplicate identifier: {0}")]
    DuplicateIdentifier(String),

    #[error("Session encoding failed: {0}")]
    SessionEncoding(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingCredentials => "VALIDATION_ERROR",
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::DuplicateIdentifier(_) => "DUPLICATE_IDENTIFIER",
            AuthError::SessionEncoding(_) => "SESSION_ENCODING_FAILED",
            AuthError::InvalidConfig(_) => "INVALID_CONFIG",
            AuthError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::MissingCredentials => 400,
            AuthError::InvalidCredentials => 401,
            AuthError::DuplicateIdentifier(_) => 409,
            AuthError::SessionEncoding(_) => 500,
            AuthError::InvalidConfig(_) => 500,
            AuthError::Internal(_) => 500,
        }
    }
}
