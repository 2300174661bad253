//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, and middleware.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use handlers::AuthAppState;
pub use middleware::{
    AuthMiddlewareState, CurrentUser, require_admin, require_auth, require_csrf, require_root,
};
pub use router::{auth_router, auth_router_generic, root_router, root_router_generic};
