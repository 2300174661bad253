//! HTTP Handlers

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Extension, Json};
use axum::extract::{ConnectInfo, Path, Query, State};
use axum::http::{HeaderMap, header};
use axum::response::{IntoResponse, Response};
use chrono::Utc;

use crate::application::config::AuthConfig;
use crate::application::issue_token::TokenIssuer;
use crate::application::manage_users::{SearchUsersUseCase, SetAdminUseCase};
use crate::application::me::MeUseCase;
use crate::application::sign_in::{SignInInput, SignInUseCase};
use crate::domain::repository::UserRepository;
use crate::error::AuthError;
use crate::presentation::dto::{
    AuthConfigResponse, AuthMeResponse, AuthUserDto, MessageResponse, SetAdminRequest,
    TelegramAuthRequest, TelegramAuthResponse, UserSearchItem, UserSearchParams,
};
use crate::presentation::middleware::CurrentUser;

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub issuer: Arc<TokenIssuer>,
    pub config: Arc<AuthConfig>,
}

/// POST /auth/telegram
///
/// Validates the initData assertion, upserts the user and returns a
/// bearer token. The CSRF secret travels both in the body and in a
/// script-readable cookie that expires with the token.
pub async fn telegram_auth<R>(
    State(state): State<AuthAppState<R>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(payload): Json<TelegramAuthRequest>,
) -> Result<Response, AuthError>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let client_ip = platform::client::extract_client_ip(&headers, Some(addr.ip()));

    let use_case = SignInUseCase::new(
        state.repo.clone(),
        state.issuer.clone(),
        state.config.clone(),
    );

    let output = use_case
        .execute(SignInInput {
            init_data: payload.init_data,
        })
        .await?;

    tracing::debug!(
        telegram_id = output.user.id,
        client_ip = ?client_ip,
        "Auth assertion accepted"
    );

    let mut cookie = state.config.csrf_cookie.clone();
    cookie.max_age_secs = Some((output.expires_at - Utc::now()).num_seconds().max(0));
    let set_cookie = platform::cookie::set_cookie_header(&cookie, &output.csrf_token);

    let body = TelegramAuthResponse {
        token: output.token,
        expires_at: output.expires_at,
        user: output.user.into(),
        csrf_token: output.csrf_token,
    };

    Ok(([(header::SET_COOKIE, set_cookie)], Json(body)).into_response())
}

/// GET /auth/me
pub async fn me<R>(
    State(state): State<AuthAppState<R>>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<AuthMeResponse>, AuthError>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case = MeUseCase::new(state.repo.clone());
    let output = use_case.execute(current.telegram_id).await?;

    Ok(Json(AuthMeResponse {
        user: AuthUserDto::from_user(output.user, output.balance),
    }))
}

/// GET /auth/config
pub async fn auth_config<R>(State(state): State<AuthAppState<R>>) -> Json<AuthConfigResponse>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    Json(AuthConfigResponse {
        issuer: state.config.issuer.clone(),
        audience: state.config.audience.clone(),
        token_ttl_seconds: state.config.token_lifetime().num_seconds(),
    })
}

/// GET /root/users
pub async fn search_users<R>(
    State(state): State<AuthAppState<R>>,
    Query(params): Query<UserSearchParams>,
) -> Result<Json<Vec<UserSearchItem>>, AuthError>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case = SearchUsersUseCase::new(state.repo.clone());
    let users = use_case
        .execute(params.query.as_deref().unwrap_or(""), params.limit)
        .await?;

    Ok(Json(users.into_iter().map(UserSearchItem::from).collect()))
}

/// POST /root/users/{telegram_id}/admin
pub async fn set_admin<R>(
    State(state): State<AuthAppState<R>>,
    Path(telegram_id): Path<i64>,
    Json(payload): Json<SetAdminRequest>,
) -> Result<Json<MessageResponse>, AuthError>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case = SetAdminUseCase::new(state.repo.clone());
    use_case.execute(telegram_id, payload.is_admin).await?;

    Ok(Json(MessageResponse {
        message: "Updated".to_string(),
    }))
}
