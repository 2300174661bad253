//! Codes (Reward Ledger) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Business logic, entities, repository traits
//! - `application/` - Use cases and application services
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, routers, WebSocket
//!
//! ## Features
//! - Single-use reward codes with unique 5-symbol values
//! - Atomic redemption (exactly one winner per code under races)
//! - Derived points ledger: balances are always aggregates, never stored
//! - Live leaderboard fan-out over WebSocket subscribers
//! - Admin minting with bounded collision retries
//!
//! ## Concurrency Model
//! - Redemption races are settled by a conditional update on the `used` flag
//! - The subscriber registry is a concurrent map; each subscriber drains
//!   its own channel, so one slow socket cannot stall the rest

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::CodesConfig;
pub use application::notifier::LeaderboardNotifier;
pub use error::{CodeError, CodeResult};
pub use infra::postgres::PgCodeRepository;
pub use presentation::router::{admin_router, leaderboard_router, redeem_router, ws_router};

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
    pub use crate::domain::entity::code::*;
    pub use crate::domain::entity::leaderboard::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod store {
    pub use crate::infra::postgres::PgCodeRepository as CodeStore;
}

pub mod router {
    pub use crate::presentation::router::*;
}
