//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

mod diag;

use auth::middleware::{AuthMiddlewareState, require_admin, require_auth, require_csrf};
use auth::{AuthConfig, PgUserRepository, TokenIssuer, auth_router, root_router};
use axum::{
    Router, http,
    http::{Method, header},
    middleware,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use codes::handlers::CodesAppState;
use codes::{CodesConfig, LeaderboardNotifier, PgCodeRepository};
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,codes=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    let auth_config = Arc::new(auth_config_from_env());
    let codes_config = Arc::new(codes_config_from_env());

    let issuer = Arc::new(TokenIssuer::new());
    let user_repo = PgUserRepository::new(pool.clone());

    let codes_state = CodesAppState {
        repo: Arc::new(PgCodeRepository::new(pool.clone())),
        config: codes_config,
        notifier: Arc::new(LeaderboardNotifier::new()),
    };
    let auth_gate = AuthMiddlewareState {
        repo: Arc::new(user_repo.clone()),
        issuer: issuer.clone(),
        config: auth_config.clone(),
    };

    // Gates run inside-out: the bearer layer is added last so it seeds
    // CurrentUser before the CSRF check reads it
    let redeem = codes::redeem_router(codes_state.clone())
        .route_layer(middleware::from_fn(require_csrf))
        .route_layer(middleware::from_fn_with_state(
            auth_gate.clone(),
            require_auth::<PgUserRepository>,
        ));
    let codes_admin = codes::admin_router(codes_state.clone())
        .route_layer(middleware::from_fn(require_csrf))
        .route_layer(middleware::from_fn_with_state(
            auth_gate,
            require_admin::<PgUserRepository>,
        ));
    let codes_routes = Router::new()
        .merge(redeem)
        .merge(codes::leaderboard_router(codes_state.clone()))
        .nest("/admin", codes_admin);

    let api_routes = Router::new()
        .nest(
            "/auth",
            auth_router(user_repo.clone(), issuer.clone(), auth_config.clone()),
        )
        .nest("/root", root_router(user_repo, issuer, auth_config))
        .nest("/codes", codes_routes)
        .nest("/ws", codes::ws_router(codes_state))
        .route("/diag/client", post(diag::client_event))
        .route("/health", get(health));

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:5173,http://127.0.0.1:5173".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            header::HeaderName::from_static("x-csrf-token"),
        ]))
        .allow_credentials(true);

    // Routes answer both bare and under /api (reverse-proxy variants)
    let app = Router::new()
        .merge(api_routes.clone())
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors);

    // Start server
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(5001);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

async fn health() -> &'static str {
    "ok"
}

/// Assemble auth config from the environment. Debug builds fall back to
/// the development profile; production requires the signing key.
fn auth_config_from_env() -> AuthConfig {
    let mut config = if cfg!(debug_assertions) {
        AuthConfig::development()
    } else {
        AuthConfig {
            signing_key: env::var("JWT_SIGNING_KEY")
                .expect("JWT_SIGNING_KEY must be set in production"),
            ..AuthConfig::default()
        }
    };

    // Honor an explicit key in debug builds too, so tokens survive restarts
    if let Ok(key) = env::var("JWT_SIGNING_KEY") {
        if !key.trim().is_empty() {
            config.signing_key = key;
        }
    }
    if let Ok(token) = env::var("BOT_TOKEN") {
        if !token.trim().is_empty() {
            config.bot_token = Some(token);
        }
    }
    if let Ok(value) = env::var("JWT_ISSUER") {
        config.issuer = value;
    }
    if let Ok(value) = env::var("JWT_AUDIENCE") {
        config.audience = value;
    }
    if let Some(minutes) = parse_env("JWT_LIFETIME_MINUTES") {
        config.token_lifetime_minutes = minutes;
    }

    config
}

/// Assemble codes config from the environment
fn codes_config_from_env() -> CodesConfig {
    let mut config = CodesConfig::default();

    if let Some(minutes) = parse_env("CODE_TTL_MINUTES") {
        config.code_ttl_minutes = minutes;
    }
    if let Ok(value) = env::var("PROMO_ENDS_AT") {
        match DateTime::parse_from_rfc3339(value.trim()) {
            Ok(ends_at) => config.promo_ends_at = Some(ends_at.with_timezone(&Utc)),
            Err(e) => tracing::warn!(error = %e, "Ignoring unparseable PROMO_ENDS_AT"),
        }
    }

    config
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|value| value.parse().ok())
}
