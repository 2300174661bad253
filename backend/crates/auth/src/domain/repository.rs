//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use crate::domain::entity::{telegram_user::TelegramUser, user::User};
use crate::error::AuthResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Insert or refresh a user from a validated Telegram payload.
    /// Grant flags are preserved on update; `last_auth_at` is bumped.
    async fn upsert_from_telegram(&self, profile: &TelegramUser) -> AuthResult<User>;

    /// Find user by Telegram ID
    async fn find_by_telegram_id(&self, telegram_id: i64) -> AuthResult<Option<User>>;

    /// Search users by name fragment or exact Telegram ID
    async fn search(&self, query: &str, limit: i64) -> AuthResult<Vec<User>>;

    /// Flip the admin grant. Returns false when the user does not exist.
    async fn set_admin(&self, telegram_id: i64, is_admin: bool) -> AuthResult<bool>;

    /// Sum of points from codes this user has redeemed
    async fn balance_of(&self, telegram_id: i64) -> AuthResult<i64>;
}
