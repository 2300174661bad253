//! Application Error - Unified error type for the application
//!
//! Defines [`AppError`] and the [`AppResult<T>`] alias. Domain crates keep
//! their own rich error enums and reduce them to an [`AppError`] at the
//! HTTP boundary; this type is the wire-facing projection, a
//! classification plus a user-readable message, rendered as an RFC 7807
//! problem-details body.

use std::borrow::Cow;
use std::error::Error;
use std::fmt;

use super::kind::ErrorKind;

/// Wire-facing application error
///
/// ## Examples
/// ```rust
/// use kernel::error::{app_error::AppError, kind::ErrorKind};
///
/// let err = AppError::new(ErrorKind::NotFound, "Code not found");
/// assert_eq!(err.status_code(), 404);
/// assert_eq!(err.message(), "Code not found");
/// ```
#[derive(Debug)]
pub struct AppError {
    /// Classification, decides the HTTP status
    kind: ErrorKind,
    /// User-facing message
    message: Cow<'static, str>,
}

/// Result alias for operations that answer with [`AppError`]
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Create an error from a kind and a user-facing message
    #[inline]
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Error classification
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// HTTP status code
    #[inline]
    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }

    /// User-facing message; rendered as the problem-details detail
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

impl Error for AppError {}

/// RFC 7807 Problem Details rendering
#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::StatusCode;

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let body = serde_json::json!({
            "type": format!("https://httpstatuses.io/{}", self.status_code()),
            "title": self.kind().as_str(),
            "status": self.status_code(),
            "detail": self.message(),
        });

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_error() {
        let err = AppError::new(ErrorKind::NotFound, "Code not found");
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.message(), "Code not found");
    }

    #[test]
    fn test_owned_and_static_messages() {
        let from_static = AppError::new(ErrorKind::Conflict, "Code already used");
        let from_owned = AppError::new(ErrorKind::Conflict, "Code already used".to_string());
        assert_eq!(from_static.message(), from_owned.message());
    }

    #[test]
    fn test_display() {
        let err = AppError::new(ErrorKind::Gone, "Promotion has ended");
        assert_eq!(err.to_string(), "[Gone] Promotion has ended");
    }

    #[cfg(feature = "axum")]
    #[test]
    fn test_problem_details_status() {
        use axum::response::IntoResponse;

        let response = AppError::new(ErrorKind::Conflict, "Code already used").into_response();
        assert_eq!(response.status(), axum::http::StatusCode::CONFLICT);
    }
}
