//! Root User Management Use Cases
//!
//! Search over accounts and admin grant changes. Only reachable through
//! root-gated routes; the root flag itself is seeded out of band.

use std::sync::Arc;

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};

const DEFAULT_SEARCH_LIMIT: i64 = 20;
const MAX_SEARCH_LIMIT: i64 = 100;

/// Search users use case
pub struct SearchUsersUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
}

impl<R> SearchUsersUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Search by name fragment or exact Telegram ID
    pub async fn execute(&self, query: &str, limit: Option<i64>) -> AuthResult<Vec<User>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AuthError::QueryRequired);
        }

        let limit = limit
            .unwrap_or(DEFAULT_SEARCH_LIMIT)
            .clamp(1, MAX_SEARCH_LIMIT);

        self.repo.search(query, limit).await
    }
}

/// Admin grant use case
pub struct SetAdminUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
}

impl<R> SetAdminUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, telegram_id: i64, is_admin: bool) -> AuthResult<()> {
        let updated = self.repo.set_admin(telegram_id, is_admin).await?;
        if !updated {
            return Err(AuthError::UserNotFound);
        }

        tracing::info!(telegram_id, is_admin, "Changed admin grant");
        Ok(())
    }
}
