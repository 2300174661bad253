//! Telegram User Payload
//!
//! The identity Telegram embeds in a WebApp `initData` blob. Field names
//! follow Telegram's own JSON (snake_case), so no serde renames here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User object as sent by Telegram inside `initData`
///
/// All fields except `id` are optional in practice; a missing `id`
/// deserializes to 0 and is rejected by validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TelegramUser {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub language_code: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub is_bot: Option<bool>,
    #[serde(default)]
    pub is_premium: Option<bool>,
}

/// Successfully validated `initData` assertion
#[derive(Debug, Clone)]
pub struct TelegramAuthData {
    pub user: TelegramUser,
    /// Moment Telegram signed the assertion
    pub auth_date: DateTime<Utc>,
}
