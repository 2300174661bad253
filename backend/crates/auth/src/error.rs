//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Bot token absent from configuration
    #[error("Bot token is not configured")]
    BotTokenMissing,

    /// Token signing key absent from configuration
    #[error("Signing key is not configured")]
    SigningKeyMissing,

    /// Empty initData payload
    #[error("initData is required")]
    InitDataRequired,

    /// initData carries no hash field
    #[error("Missing hash")]
    MissingHash,

    /// Signature does not match the bot token
    #[error("Invalid Telegram signature")]
    InvalidSignature,

    /// auth_date field absent
    #[error("auth_date is missing")]
    AuthDateMissing,

    /// auth_date not a unix timestamp
    #[error("auth_date is not a valid unix timestamp")]
    AuthDateInvalid,

    /// Assertion older than the accepted window
    #[error("Auth data is too old")]
    AuthDateStale,

    /// user field absent
    #[error("Missing Telegram user payload")]
    UserPayloadMissing,

    /// user field is not valid JSON
    #[error("Failed to parse Telegram user payload")]
    UserPayloadInvalid,

    /// Telegram user id zero or absent
    #[error("Telegram user id is missing")]
    UserIdMissing,

    /// No usable bearer token on the request
    #[error("Authentication required")]
    Unauthorized,

    /// Bearer token rejected (signature, expiry, issuer or audience)
    #[error("Invalid or expired token")]
    TokenInvalid,

    /// CSRF header absent or not matching the token's csrf claim
    #[error("CSRF token mismatch")]
    CsrfRejected,

    /// Authenticated but lacking the required role
    #[error("Insufficient role")]
    Forbidden,

    /// User not found
    #[error("User not found")]
    UserNotFound,

    /// Empty search query
    #[error("Query is required")]
    QueryRequired,

    /// Token could not be signed
    #[error("Token signing failed: {0}")]
    TokenSigning(#[from] jsonwebtoken::errors::Error),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InitDataRequired
            | AuthError::MissingHash
            | AuthError::InvalidSignature
            | AuthError::AuthDateMissing
            | AuthError::AuthDateInvalid
            | AuthError::AuthDateStale
            | AuthError::UserPayloadMissing
            | AuthError::UserPayloadInvalid
            | AuthError::UserIdMissing
            | AuthError::QueryRequired => StatusCode::BAD_REQUEST,
            AuthError::Unauthorized | AuthError::TokenInvalid => StatusCode::UNAUTHORIZED,
            AuthError::CsrfRejected | AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::UserNotFound => StatusCode::NOT_FOUND,
            AuthError::BotTokenMissing
            | AuthError::SigningKeyMissing
            | AuthError::TokenSigning(_)
            | AuthError::Database(_)
            | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::InitDataRequired
            | AuthError::MissingHash
            | AuthError::InvalidSignature
            | AuthError::AuthDateMissing
            | AuthError::AuthDateInvalid
            | AuthError::AuthDateStale
            | AuthError::UserPayloadMissing
            | AuthError::UserPayloadInvalid
            | AuthError::UserIdMissing
            | AuthError::QueryRequired => ErrorKind::BadRequest,
            AuthError::Unauthorized | AuthError::TokenInvalid => ErrorKind::Unauthorized,
            AuthError::CsrfRejected | AuthError::Forbidden => ErrorKind::Forbidden,
            AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::BotTokenMissing
            | AuthError::SigningKeyMissing
            | AuthError::TokenSigning(_)
            | AuthError::Database(_)
            | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::TokenSigning(e) => {
                tracing::error!(error = %e, "Token signing error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::BotTokenMissing | AuthError::SigningKeyMissing => {
                tracing::error!(error = %self, "Auth misconfiguration");
            }
            AuthError::InvalidSignature => {
                tracing::warn!("Rejected initData with bad signature");
            }
            AuthError::CsrfRejected => {
                tracing::warn!("Rejected request with CSRF mismatch");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        AuthError::Internal(err.to_string())
    }
}
