//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use chrono::{DateTime, Utc};
use kernel::id::CodeId;

use crate::domain::entity::code::Code;
use crate::domain::entity::leaderboard::{HistoryEntry, LeaderboardEntry};
use crate::error::CodeResult;

/// Code repository trait
#[trait_variant::make(CodeRepository: Send)]
pub trait LocalCodeRepository {
    /// Insert a freshly minted code. A duplicate value surfaces as
    /// `CodeError::ValueCollision`.
    async fn insert(&self, code: &Code) -> CodeResult<()>;

    /// Find code by its value
    async fn find_by_value(&self, value: &str) -> CodeResult<Option<Code>>;

    /// Consume a code: conditional update on `used = FALSE`.
    /// Returns false when another redemption already won.
    async fn consume(&self, id: CodeId, redeemer: i64, at: DateTime<Utc>) -> CodeResult<bool>;

    /// Whether an identity exists
    async fn user_exists(&self, telegram_id: i64) -> CodeResult<bool>;

    /// Sum of points from codes this identity redeemed
    async fn balance_of(&self, telegram_id: i64) -> CodeResult<i64>;

    /// Ranked totals, highest first, ties by identity id ascending
    async fn leaderboard(&self, limit: i64) -> CodeResult<Vec<LeaderboardEntry>>;

    /// Codes redeemed or still live, newest first
    async fn history(&self, limit: i64, now: DateTime<Utc>) -> CodeResult<Vec<HistoryEntry>>;
}
