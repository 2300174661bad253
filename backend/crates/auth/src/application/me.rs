//! Current User Use Case

use std::sync::Arc;

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};

/// Current user output
#[derive(Debug)]
pub struct MeOutput {
    pub user: User,
    /// Sum of points from redeemed codes
    pub balance: i64,
}

/// Current user use case
pub struct MeUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
}

impl<R> MeUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, telegram_id: i64) -> AuthResult<MeOutput> {
        let user = self
            .repo
            .find_by_telegram_id(telegram_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let balance = self.repo.balance_of(telegram_id).await?;

        Ok(MeOutput { user, balance })
    }
}
