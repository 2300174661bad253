//! Application Configuration
//!
//! Configuration for the Auth application layer.

use chrono::Duration;

/// Re-export cookie types from platform
pub use platform::cookie::{CookieConfig, SameSite};

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Telegram bot token used to verify initData signatures
    pub bot_token: Option<String>,
    /// HMAC key for signing access tokens
    pub signing_key: String,
    /// Token issuer claim
    pub issuer: String,
    /// Token audience claim
    pub audience: String,
    /// Access token lifetime in minutes (values <= 0 fall back to 60)
    pub token_lifetime_minutes: i64,
    /// Maximum accepted age of a Telegram assertion, in seconds
    pub auth_max_age_secs: i64,
    /// Allowed clock skew when verifying tokens, in seconds
    pub clock_skew_secs: u64,
    /// CSRF cookie settings (readable by the frontend, so not HttpOnly)
    pub csrf_cookie: CookieConfig,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            signing_key: String::new(),
            issuer: "ucode".to_string(),
            audience: "ucode-web".to_string(),
            token_lifetime_minutes: 60,
            auth_max_age_secs: 3600, // 1 hour
            clock_skew_secs: 30,
            csrf_cookie: CookieConfig {
                name: "csrf".to_string(),
                secure: true,
                http_only: false,
                same_site: SameSite::None,
                path: "/".to_string(),
                max_age_secs: None,
            },
        }
    }
}

impl AuthConfig {
    /// Create config with a random signing key (for development)
    pub fn with_random_signing_key() -> Self {
        Self {
            signing_key: hex::encode(platform::crypto::random_bytes(32)),
            ..Default::default()
        }
    }

    /// Create config for development (insecure cookie, placeholder bot token)
    pub fn development() -> Self {
        Self {
            bot_token: Some("123456:TEST-TOKEN".to_string()),
            csrf_cookie: CookieConfig {
                name: "csrf".to_string(),
                secure: false,
                http_only: false,
                same_site: SameSite::Lax,
                path: "/".to_string(),
                max_age_secs: None,
            },
            ..Self::with_random_signing_key()
        }
    }

    /// Effective token lifetime
    pub fn token_lifetime(&self) -> Duration {
        if self.token_lifetime_minutes <= 0 {
            Duration::minutes(60)
        } else {
            Duration::minutes(self.token_lifetime_minutes)
        }
    }

    /// Maximum accepted assertion age
    pub fn auth_max_age(&self) -> Duration {
        Duration::seconds(self.auth_max_age_secs)
    }
}
