//! Redeem Code Use Case
//!
//! The single-winner redemption path. Checks run in a fixed order so the
//! caller gets the most specific failure, and the final consume step is a
//! compare-and-swap on the `used` flag: of N concurrent attempts on one
//! code, exactly one sees the flag flip.

use std::sync::Arc;

use chrono::Utc;

use crate::application::config::CodesConfig;
use crate::domain::repository::CodeRepository;
use crate::error::{CodeError, CodeResult};

/// Redeem input
pub struct RedeemInput {
    /// Submitted code value
    pub code_value: String,
    /// Redeeming identity
    pub telegram_id: i64,
}

/// Redeem output
#[derive(Debug)]
pub struct RedeemOutput {
    /// Value of the consumed code
    pub code_value: String,
    /// Points this redemption credited
    pub points: i32,
    /// Authoritative total after crediting
    pub balance: i64,
}

/// Redeem code use case
pub struct RedeemCodeUseCase<R>
where
    R: CodeRepository,
{
    repo: Arc<R>,
    config: Arc<CodesConfig>,
}

impl<R> RedeemCodeUseCase<R>
where
    R: CodeRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<CodesConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, input: RedeemInput) -> CodeResult<RedeemOutput> {
        let now = Utc::now();
        if self.config.promo_ended(now) {
            return Err(CodeError::PromoEnded);
        }

        let code = self
            .repo
            .find_by_value(&input.code_value)
            .await?
            .ok_or(CodeError::CodeNotFound)?;

        if code.used {
            return Err(CodeError::AlreadyUsed);
        }
        if code.is_expired(now) {
            return Err(CodeError::Expired);
        }
        if !self.repo.user_exists(input.telegram_id).await? {
            return Err(CodeError::UserNotFound);
        }

        let won = self.repo.consume(code.id, input.telegram_id, now).await?;
        if !won {
            let balance = self.repo.balance_of(input.telegram_id).await?;
            return Err(CodeError::RedeemConflict { balance });
        }

        let balance = self.repo.balance_of(input.telegram_id).await?;

        tracing::info!(
            code = %code.value,
            points = code.points,
            telegram_id = input.telegram_id,
            balance,
            "Code redeemed"
        );

        Ok(RedeemOutput {
            code_value: code.value,
            points: code.points,
            balance,
        })
    }
}
