//! Auth Middleware
//!
//! Bearer-token gates for protected routes. Role gates re-check the
//! grant flags in the database so a revoked admin loses access before
//! the token expires. The CSRF gate compares the X-CSRF-Token header
//! against the csrf claim carried by the verified token.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::application::config::AuthConfig;
use crate::application::issue_token::TokenIssuer;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::user_role::UserRole;
use crate::error::{AuthError, AuthResult};

/// Verified caller identity, inserted as a request extension
pub use kernel::context::CurrentUser;

/// Middleware state
#[derive(Clone)]
pub struct AuthMiddlewareState<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub issuer: Arc<TokenIssuer>,
    pub config: Arc<AuthConfig>,
}

/// Middleware that requires a valid bearer token
pub async fn require_auth<R>(
    axum::extract::State(state): axum::extract::State<AuthMiddlewareState<R>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let current = authorize(&state, req.headers()).map_err(IntoResponse::into_response)?;

    req.extensions_mut().insert(current);
    Ok(next.run(req).await)
}

/// Middleware that requires a live admin (or root) grant
pub async fn require_admin<R>(
    axum::extract::State(state): axum::extract::State<AuthMiddlewareState<R>>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, Response>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    require_role(state, req, next, UserRole::Admin).await
}

/// Middleware that requires a live root grant
pub async fn require_root<R>(
    axum::extract::State(state): axum::extract::State<AuthMiddlewareState<R>>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, Response>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    require_role(state, req, next, UserRole::Root).await
}

async fn require_role<R>(
    state: AuthMiddlewareState<R>,
    mut req: Request<Body>,
    next: Next,
    required: UserRole,
) -> Result<Response, Response>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let current = authorize(&state, req.headers()).map_err(IntoResponse::into_response)?;

    // Tokens outlive grant changes; the database is authoritative here
    let user = state
        .repo
        .find_by_telegram_id(current.telegram_id)
        .await
        .map_err(IntoResponse::into_response)?
        .ok_or_else(|| AuthError::Unauthorized.into_response())?;

    let live_role = user.role();
    let allowed = match required {
        UserRole::Root => live_role.is_root(),
        UserRole::Admin => live_role.is_admin_or_higher(),
        UserRole::Client => true,
    };
    if !allowed {
        return Err(AuthError::Forbidden.into_response());
    }

    req.extensions_mut().insert(current);
    Ok(next.run(req).await)
}

/// Middleware that enforces the CSRF double-check on unsafe methods
///
/// Must run inside an auth gate: it reads the `CurrentUser` extension.
pub async fn require_csrf(req: Request<Body>, next: Next) -> Result<Response, Response> {
    if is_safe_method(req.method()) {
        return Ok(next.run(req).await);
    }

    let Some(current) = req.extensions().get::<CurrentUser>() else {
        return Err(AuthError::Unauthorized.into_response());
    };

    let header_token = req
        .headers()
        .get("x-csrf-token")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    if header_token.is_empty()
        || !platform::crypto::constant_time_eq(
            header_token.as_bytes(),
            current.csrf_token.as_bytes(),
        )
    {
        return Err(AuthError::CsrfRejected.into_response());
    }

    Ok(next.run(req).await)
}

fn is_safe_method(method: &Method) -> bool {
    matches!(
        *method,
        Method::GET | Method::HEAD | Method::OPTIONS | Method::TRACE
    )
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn authorize<R>(state: &AuthMiddlewareState<R>, headers: &HeaderMap) -> AuthResult<CurrentUser>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let token = bearer_token(headers).ok_or(AuthError::Unauthorized)?;
    let claims = state.issuer.decode(&state.config, token)?;

    Ok(CurrentUser {
        telegram_id: claims.telegram_id()?,
        username: (!claims.username.is_empty()).then(|| claims.username.clone()),
        csrf_token: claims.csrf,
    })
}
