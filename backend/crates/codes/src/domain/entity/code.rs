//! Code Entity
//!
//! A single-use reward code. The `used` flag is the optimistic-concurrency
//! guard for redemption: it flips from false to true exactly once, via a
//! conditional update, and `used_by`/`used_at` are recorded alongside.

use chrono::{DateTime, Duration, Utc};
use kernel::id::CodeId;

/// Reward code entity
#[derive(Debug, Clone)]
pub struct Code {
    pub id: CodeId,
    /// Short alphanumeric value, globally unique
    pub value: String,
    /// Points credited on redemption, always positive
    pub points: i32,
    /// Telegram ID of the minting admin
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub used: bool,
    pub used_by: Option<i64>,
    pub used_at: Option<DateTime<Utc>>,
}

impl Code {
    /// Create a fresh unredeemed code
    pub fn mint(
        value: String,
        points: i32,
        created_by: i64,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            id: CodeId::new(),
            value,
            points,
            created_by,
            created_at: now,
            expires_at: now + ttl,
            used: false,
            used_by: None,
            used_at: None,
        }
    }

    /// Expiry is a read-time condition, never a stored state change
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }

    pub fn is_redeemable(&self, now: DateTime<Utc>) -> bool {
        !self.used && !self.is_expired(now)
    }
}
