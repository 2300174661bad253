//! Sign In Use Case
//!
//! Validates a Telegram initData assertion, upserts the user and issues
//! an access token.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::application::config::AuthConfig;
use crate::application::issue_token::TokenIssuer;
use crate::domain::entity::telegram_user::TelegramUser;
use crate::domain::repository::UserRepository;
use crate::domain::services;
use crate::error::AuthResult;

/// Sign in input
pub struct SignInInput {
    /// Raw initData blob from the Telegram WebApp
    pub init_data: String,
}

/// Sign in output
#[derive(Debug)]
pub struct SignInOutput {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub csrf_token: String,
    /// Identity Telegram asserted for this sign-in
    pub user: TelegramUser,
}

/// Sign in use case
pub struct SignInUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    issuer: Arc<TokenIssuer>,
    config: Arc<AuthConfig>,
}

impl<R> SignInUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, issuer: Arc<TokenIssuer>, config: Arc<AuthConfig>) -> Self {
        Self {
            repo,
            issuer,
            config,
        }
    }

    pub async fn execute(&self, input: SignInInput) -> AuthResult<SignInOutput> {
        let auth_data = services::validate_init_data(
            self.config.bot_token.as_deref(),
            &input.init_data,
            Utc::now(),
            self.config.auth_max_age(),
        )?;

        let user = self.repo.upsert_from_telegram(&auth_data.user).await?;
        let issued = self.issuer.issue(&self.config, &user)?;

        tracing::info!(
            telegram_id = user.telegram_id,
            username = user.username.as_deref().unwrap_or(""),
            "Telegram user signed in"
        );

        Ok(SignInOutput {
            token: issued.token,
            expires_at: issued.expires_at,
            csrf_token: issued.csrf_token,
            user: auth_data.user,
        })
    }
}
