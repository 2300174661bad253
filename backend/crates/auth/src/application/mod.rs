//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod issue_token;
pub mod manage_users;
pub mod me;
pub mod sign_in;

// Re-exports
pub use config::AuthConfig;
pub use issue_token::{Claims, IssuedToken, TokenIssuer};
pub use manage_users::{SearchUsersUseCase, SetAdminUseCase};
pub use me::{MeOutput, MeUseCase};
pub use sign_in::{SignInInput, SignInOutput, SignInUseCase};
