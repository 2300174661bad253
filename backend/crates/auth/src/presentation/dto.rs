//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entity::{telegram_user::TelegramUser, user::User};

// ============================================================================
// Telegram Sign In
// ============================================================================

/// Telegram auth request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelegramAuthRequest {
    #[serde(default)]
    pub init_data: String,
}

/// Telegram auth response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TelegramAuthResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: TelegramUserDto,
    /// Also delivered via the `csrf` cookie for the frontend
    pub csrf_token: String,
}

/// Telegram identity as exposed on the wire (camelCase)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TelegramUserDto {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub photo_url: Option<String>,
    pub is_premium: Option<bool>,
    pub is_bot: Option<bool>,
}

impl From<TelegramUser> for TelegramUserDto {
    fn from(user: TelegramUser) -> Self {
        Self {
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            photo_url: user.photo_url,
            is_premium: user.is_premium,
            is_bot: user.is_bot,
        }
    }
}

// ============================================================================
// Current User
// ============================================================================

/// Current user response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthMeResponse {
    pub user: AuthUserDto,
}

/// Account info for the authenticated user
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUserDto {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub photo_url: Option<String>,
    pub role: String,
    pub balance: i64,
}

impl AuthUserDto {
    pub fn from_user(user: User, balance: i64) -> Self {
        let role = user.role().code().to_string();
        Self {
            id: user.telegram_id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            photo_url: user.photo_url,
            role,
            balance,
        }
    }
}

// ============================================================================
// Auth Config
// ============================================================================

/// Public token parameters
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthConfigResponse {
    pub issuer: String,
    pub audience: String,
    pub token_ttl_seconds: i64,
}

// ============================================================================
// Root User Management
// ============================================================================

/// Search query parameters
#[derive(Debug, Clone, Deserialize)]
pub struct UserSearchParams {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub limit: Option<i64>,
}

/// One row in a user search result
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSearchItem {
    pub telegram_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_admin: bool,
    pub is_root: bool,
}

impl From<User> for UserSearchItem {
    fn from(user: User) -> Self {
        Self {
            telegram_id: user.telegram_id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            is_admin: user.is_admin,
            is_root: user.is_root,
        }
    }
}

/// Admin grant request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetAdminRequest {
    pub is_admin: bool,
}

/// Plain acknowledgement
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
