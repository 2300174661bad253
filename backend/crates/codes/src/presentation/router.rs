//! Codes Routers
//!
//! Route groups for the codes surface. Bearer, role, and CSRF gates are
//! attached where the groups are mounted, since those live with the
//! auth middleware; the groups are split so each can get its own gate.

use axum::{
    Router,
    routing::{get, post},
};

use crate::domain::repository::CodeRepository;
use crate::infra::postgres::PgCodeRepository;
use crate::presentation::handlers::{self, CodesAppState};
use crate::presentation::ws;

/// Redeem route group (mount behind a bearer + CSRF gate)
pub fn redeem_router(state: CodesAppState<PgCodeRepository>) -> Router {
    redeem_router_generic(state)
}

pub fn redeem_router_generic<R>(state: CodesAppState<R>) -> Router
where
    R: CodeRepository + Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/redeem", post(handlers::redeem_code::<R>))
        .with_state(state)
}

/// Public leaderboard route group
pub fn leaderboard_router(state: CodesAppState<PgCodeRepository>) -> Router {
    leaderboard_router_generic(state)
}

pub fn leaderboard_router_generic<R>(state: CodesAppState<R>) -> Router
where
    R: CodeRepository + Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/leaderboard", get(handlers::leaderboard::<R>))
        .with_state(state)
}

/// Admin route group (mount behind an admin + CSRF gate)
pub fn admin_router(state: CodesAppState<PgCodeRepository>) -> Router {
    admin_router_generic(state)
}

pub fn admin_router_generic<R>(state: CodesAppState<R>) -> Router
where
    R: CodeRepository + Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/generate", post(handlers::generate_code::<R>))
        .route("/history", get(handlers::code_history::<R>))
        .with_state(state)
}

/// WebSocket route group
pub fn ws_router(state: CodesAppState<PgCodeRepository>) -> Router {
    ws_router_generic(state)
}

pub fn ws_router_generic<R>(state: CodesAppState<R>) -> Router
where
    R: CodeRepository + Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/leaderboard", get(ws::leaderboard_ws::<R>))
        .with_state(state)
}
