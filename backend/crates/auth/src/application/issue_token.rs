//! Access Token Issuance
//!
//! Mints signed bearer tokens for validated Telegram users and caches
//! them per user so repeated sign-ins inside the lifetime reuse the same
//! token (and the same CSRF secret). A cached entry is only served while
//! it is unexpired and was minted under the current signing key.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::config::AuthConfig;
use crate::domain::entity::user::User;
use crate::domain::value_object::user_role::UserRole;
use crate::error::{AuthError, AuthResult};

/// Claims carried in an access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub aud: String,
    /// Telegram ID as a string
    pub sub: String,
    /// Username, falling back to the Telegram ID
    pub unique_name: String,
    #[serde(rename = "tg:first_name", default)]
    pub first_name: String,
    #[serde(rename = "tg:last_name", default)]
    pub last_name: String,
    #[serde(rename = "tg:username", default)]
    pub username: String,
    #[serde(
        rename = "tg:photo_url",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub photo_url: Option<String>,
    /// Per-token CSRF secret, echoed back in the X-CSRF-Token header
    pub csrf: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
}

impl Claims {
    pub fn telegram_id(&self) -> AuthResult<i64> {
        self.sub.parse().map_err(|_| AuthError::TokenInvalid)
    }

    pub fn user_role(&self) -> UserRole {
        UserRole::from_claim(self.role.as_deref())
    }
}

/// Freshly issued (or cache-served) token
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub csrf_token: String,
}

struct CachedToken {
    token: String,
    expires_at: DateTime<Utc>,
    csrf_token: String,
    /// SHA-256 of the signing key at mint time; invalidates on rotation
    signing_key_hash: String,
}

/// Token mint and verifier with a per-user cache
pub struct TokenIssuer {
    cache: DashMap<i64, CachedToken>,
}

impl TokenIssuer {
    pub fn new() -> Self {
        Self {
            cache: DashMap::new(),
        }
    }

    /// Issue a token for a user, reusing an unexpired cached one
    pub fn issue(&self, config: &AuthConfig, user: &User) -> AuthResult<IssuedToken> {
        if user.telegram_id == 0 {
            return Err(AuthError::UserIdMissing);
        }
        if config.signing_key.is_empty() {
            return Err(AuthError::SigningKeyMissing);
        }

        let now = Utc::now();
        let key_hash = signing_key_hash(&config.signing_key);

        if let Some(entry) = self.cache.get(&user.telegram_id) {
            if entry.expires_at > now && entry.signing_key_hash == key_hash {
                return Ok(IssuedToken {
                    token: entry.token.clone(),
                    expires_at: entry.expires_at,
                    csrf_token: entry.csrf_token.clone(),
                });
            }
        }

        let expires_at = now + config.token_lifetime();
        let csrf_token = Uuid::new_v4().simple().to_string();
        let role = user.role();

        let claims = Claims {
            iss: config.issuer.clone(),
            aud: config.audience.clone(),
            sub: user.telegram_id.to_string(),
            unique_name: user.display_name(),
            first_name: user.first_name.clone().unwrap_or_default(),
            last_name: user.last_name.clone().unwrap_or_default(),
            username: user.username.clone().unwrap_or_default(),
            photo_url: user.photo_url.clone().filter(|url| !url.is_empty()),
            csrf: csrf_token.clone(),
            role: role.claim_value().map(str::to_string),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(config.signing_key.as_bytes()),
        )?;

        self.cache.insert(
            user.telegram_id,
            CachedToken {
                token: token.clone(),
                expires_at,
                csrf_token: csrf_token.clone(),
                signing_key_hash: key_hash,
            },
        );

        tracing::debug!(telegram_id = user.telegram_id, role = %role, "Issued access token");

        Ok(IssuedToken {
            token,
            expires_at,
            csrf_token,
        })
    }

    /// Verify a bearer token and return its claims
    pub fn decode(&self, config: &AuthConfig, token: &str) -> AuthResult<Claims> {
        if config.signing_key.is_empty() {
            return Err(AuthError::SigningKeyMissing);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.set_audience(&[&config.audience]);
        validation.leeway = config.clock_skew_secs;

        let data = jsonwebtoken::decode::<Claims>(
            token,
            &DecodingKey::from_secret(config.signing_key.as_bytes()),
            &validation,
        )
        .map_err(|_| AuthError::TokenInvalid)?;

        Ok(data.claims)
    }
}

impl Default for TokenIssuer {
    fn default() -> Self {
        Self::new()
    }
}

fn signing_key_hash(signing_key: &str) -> String {
    hex::encode(platform::crypto::sha256(signing_key.as_bytes()))
}
