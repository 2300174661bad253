//! Codes Error Types
//!
//! This module provides code-ledger error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Codes-specific result type alias
pub type CodeResult<T> = Result<T, CodeError>;

/// Codes-specific error variants
#[derive(Debug, Error)]
pub enum CodeError {
    /// No code with the submitted value
    #[error("Code not found")]
    CodeNotFound,

    /// Code already redeemed before this attempt started
    #[error("Code already used")]
    AlreadyUsed,

    /// Code past its expiry at redemption time
    #[error("Code expired")]
    Expired,

    /// Redeeming identity unknown
    #[error("User not found")]
    UserNotFound,

    /// Lost the redemption race: another attempt consumed the code
    /// between our read and our conditional write
    #[error("Code already used or modified")]
    RedeemConflict {
        /// Authoritative total at the time of the loss
        balance: i64,
    },

    /// Generated value collided with an existing one
    #[error("Code value already exists")]
    ValueCollision,

    /// Every generation attempt collided
    #[error("Could not generate a unique code")]
    GenerationExhausted,

    /// Non-positive point value
    #[error("Points must be > 0")]
    InvalidPoints,

    /// Promotion end date has passed
    #[error("Promotion has ended")]
    PromoEnded,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Snapshot serialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CodeError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            CodeError::InvalidPoints => StatusCode::BAD_REQUEST,
            CodeError::CodeNotFound | CodeError::UserNotFound => StatusCode::NOT_FOUND,
            CodeError::AlreadyUsed
            | CodeError::RedeemConflict { .. }
            | CodeError::ValueCollision
            | CodeError::GenerationExhausted => StatusCode::CONFLICT,
            CodeError::Expired | CodeError::PromoEnded => StatusCode::GONE,
            CodeError::Database(e) if is_transient(e) => StatusCode::SERVICE_UNAVAILABLE,
            CodeError::Database(_) | CodeError::Serialization(_) | CodeError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            CodeError::InvalidPoints => ErrorKind::BadRequest,
            CodeError::CodeNotFound | CodeError::UserNotFound => ErrorKind::NotFound,
            CodeError::AlreadyUsed
            | CodeError::RedeemConflict { .. }
            | CodeError::ValueCollision
            | CodeError::GenerationExhausted => ErrorKind::Conflict,
            CodeError::Expired | CodeError::PromoEnded => ErrorKind::Gone,
            CodeError::Database(e) if is_transient(e) => ErrorKind::ServiceUnavailable,
            CodeError::Database(_) | CodeError::Serialization(_) | CodeError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            CodeError::Database(e) => {
                tracing::error!(error = %e, "Codes database error");
            }
            CodeError::Serialization(e) => {
                tracing::error!(error = %e, "Snapshot serialization error");
            }
            CodeError::Internal(msg) => {
                tracing::error!(message = %msg, "Codes internal error");
            }
            CodeError::GenerationExhausted => {
                tracing::warn!("Code generation exhausted its attempts");
            }
            CodeError::RedeemConflict { balance } => {
                tracing::debug!(balance, "Redemption lost the race");
            }
            _ => {
                tracing::debug!(error = %self, "Codes error");
            }
        }
    }
}

/// Store failures worth a client retry, as opposed to real bugs
fn is_transient(error: &sqlx::Error) -> bool {
    matches!(
        error,
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_)
    )
}

impl IntoResponse for CodeError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for CodeError {
    fn from(err: AppError) -> Self {
        CodeError::Internal(err.to_string())
    }
}
