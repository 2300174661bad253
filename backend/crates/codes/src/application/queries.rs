//! Leaderboard and History Queries

use std::sync::Arc;

use chrono::Utc;

use crate::application::config::CodesConfig;
use crate::domain::entity::leaderboard::{HistoryEntry, LeaderboardEntry};
use crate::domain::repository::CodeRepository;
use crate::error::CodeResult;

/// Leaderboard query
pub struct LeaderboardQuery<R>
where
    R: CodeRepository,
{
    repo: Arc<R>,
    config: Arc<CodesConfig>,
}

impl<R> LeaderboardQuery<R>
where
    R: CodeRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<CodesConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self) -> CodeResult<Vec<LeaderboardEntry>> {
        self.repo.leaderboard(self.config.leaderboard_size).await
    }
}

/// Admin history query
pub struct CodeHistoryQuery<R>
where
    R: CodeRepository,
{
    repo: Arc<R>,
    config: Arc<CodesConfig>,
}

impl<R> CodeHistoryQuery<R>
where
    R: CodeRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<CodesConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self) -> CodeResult<Vec<HistoryEntry>> {
        self.repo.history(self.config.history_size, Utc::now()).await
    }
}
