//! User Entity
//!
//! A user account keyed by Telegram ID. Profile fields mirror whatever
//! Telegram asserted at the most recent sign-in; grant flags are managed
//! separately by root.

use chrono::{DateTime, Utc};

use crate::domain::entity::telegram_user::TelegramUser;
use crate::domain::value_object::user_role::UserRole;

/// User entity
#[derive(Debug, Clone)]
pub struct User {
    /// Telegram user ID (primary key, never generated locally)
    pub telegram_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub language_code: Option<String>,
    pub photo_url: Option<String>,
    pub is_bot: Option<bool>,
    pub is_premium: Option<bool>,
    /// Admin grant (managed by root)
    pub is_admin: bool,
    /// Root grant (seeded out of band, never via the API)
    pub is_root: bool,
    /// Last successful Telegram sign-in
    pub last_auth_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a fresh user from a validated Telegram payload
    pub fn from_telegram(profile: &TelegramUser) -> Self {
        let now = Utc::now();

        Self {
            telegram_id: profile.id,
            username: profile.username.clone(),
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            language_code: profile.language_code.clone(),
            photo_url: profile.photo_url.clone(),
            is_bot: profile.is_bot,
            is_premium: profile.is_premium,
            is_admin: false,
            is_root: false,
            last_auth_at: now,
            created_at: now,
            updated_at: now,
        }
    }

    /// Refresh profile fields from a newer Telegram payload
    pub fn apply_telegram(&mut self, profile: &TelegramUser) {
        let now = Utc::now();
        self.username = profile.username.clone();
        self.first_name = profile.first_name.clone();
        self.last_name = profile.last_name.clone();
        self.language_code = profile.language_code.clone();
        self.photo_url = profile.photo_url.clone();
        self.is_bot = profile.is_bot;
        self.is_premium = profile.is_premium;
        self.last_auth_at = now;
        self.updated_at = now;
    }

    /// Effective role derived from grant flags
    pub fn role(&self) -> UserRole {
        UserRole::from_flags(self.is_admin, self.is_root)
    }

    /// Name carried in the token's `unique_name` claim
    pub fn display_name(&self) -> String {
        match &self.username {
            Some(name) if !name.is_empty() => name.clone(),
            _ => self.telegram_id.to_string(),
        }
    }
}
