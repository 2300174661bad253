//! Application Configuration
//!
//! Configuration for the Codes application layer.

use chrono::{DateTime, Duration, Utc};

use crate::domain::services::CODE_LENGTH;

/// Codes application configuration
#[derive(Debug, Clone)]
pub struct CodesConfig {
    /// Generated value length
    pub code_length: usize,
    /// Collision retries before generation fails permanently
    pub generation_attempts: u32,
    /// Code lifetime in minutes (values <= 0 fall back to 40)
    pub code_ttl_minutes: i64,
    /// Rows returned by the leaderboard view
    pub leaderboard_size: i64,
    /// Rows returned by the admin history view
    pub history_size: i64,
    /// When set, redeem and generate are refused from this moment on
    pub promo_ends_at: Option<DateTime<Utc>>,
}

impl Default for CodesConfig {
    fn default() -> Self {
        Self {
            code_length: CODE_LENGTH,
            generation_attempts: 5,
            code_ttl_minutes: 40,
            leaderboard_size: 100,
            history_size: 100,
            promo_ends_at: None,
        }
    }
}

impl CodesConfig {
    /// Effective code lifetime
    pub fn code_ttl(&self) -> Duration {
        if self.code_ttl_minutes <= 0 {
            Duration::minutes(40)
        } else {
            Duration::minutes(self.code_ttl_minutes)
        }
    }

    /// Whether the promotion has ended at the given moment
    pub fn promo_ended(&self, now: DateTime<Utc>) -> bool {
        self.promo_ends_at.is_some_and(|ends_at| now >= ends_at)
    }
}
