//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Business logic, entities, repository traits
//! - `application/` - Use cases and application services
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - Telegram WebApp sign-in (initData assertion validation)
//! - Stateless bearer tokens with a per-user issuance cache
//! - Role-based access (Client, Admin, Root) backed by grant flags
//! - Root-only user search and admin grant management
//!
//! ## Security Model
//! - initData signatures verified against the bot token, constant-time
//! - Assertions expire one hour after Telegram signed them
//! - Admin/root gates re-check grants in the database on every request
//! - Unsafe methods require the X-CSRF-Token header to match the token

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use application::issue_token::TokenIssuer;
pub use error::{AuthError, AuthResult};
pub use infra::postgres::PgUserRepository;
pub use presentation::router::{auth_router, root_router};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::telegram_user::*;
    pub use crate::domain::entity::user::*;
    pub use crate::domain::value_object::user_role::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod store {
    pub use crate::infra::postgres::PgUserRepository as UserStore;
}

pub mod router {
    pub use crate::presentation::router::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
