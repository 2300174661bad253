//! Auth Routers

use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::issue_token::TokenIssuer;
use crate::domain::repository::UserRepository;
use crate::infra::postgres::PgUserRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{
    AuthMiddlewareState, require_auth, require_csrf, require_root,
};

/// Create the Auth router with PostgreSQL repository
pub fn auth_router(repo: PgUserRepository, issuer: Arc<TokenIssuer>, config: Arc<AuthConfig>) -> Router {
    auth_router_generic(repo, issuer, config)
}

/// Create a generic Auth router for any repository implementation
pub fn auth_router_generic<R>(repo: R, issuer: Arc<TokenIssuer>, config: Arc<AuthConfig>) -> Router
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let state = AuthAppState {
        repo: Arc::new(repo),
        issuer,
        config,
    };
    let gate = AuthMiddlewareState {
        repo: state.repo.clone(),
        issuer: state.issuer.clone(),
        config: state.config.clone(),
    };

    let protected = Router::new()
        .route("/me", get(handlers::me::<R>))
        .route_layer(middleware::from_fn_with_state(gate, require_auth::<R>));

    Router::new()
        .route("/telegram", post(handlers::telegram_auth::<R>))
        .route("/config", get(handlers::auth_config::<R>))
        .merge(protected)
        .with_state(state)
}

/// Create the root-only user management router
pub fn root_router(repo: PgUserRepository, issuer: Arc<TokenIssuer>, config: Arc<AuthConfig>) -> Router {
    root_router_generic(repo, issuer, config)
}

/// Create a generic root router for any repository implementation
pub fn root_router_generic<R>(repo: R, issuer: Arc<TokenIssuer>, config: Arc<AuthConfig>) -> Router
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let state = AuthAppState {
        repo: Arc::new(repo),
        issuer,
        config,
    };
    let gate = AuthMiddlewareState {
        repo: state.repo.clone(),
        issuer: state.issuer.clone(),
        config: state.config.clone(),
    };

    // Role gate added last so it runs first and seeds CurrentUser for
    // the CSRF check
    Router::new()
        .route("/users", get(handlers::search_users::<R>))
        .route("/users/{telegram_id}/admin", post(handlers::set_admin::<R>))
        .route_layer(middleware::from_fn(require_csrf))
        .route_layer(middleware::from_fn_with_state(gate, require_root::<R>))
        .with_state(state)
}
