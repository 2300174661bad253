//! Leaderboard and History Read Models
//!
//! Derived views over redeemed codes. Totals are always aggregated from
//! the codes table at read time; nothing here is stored.

use chrono::{DateTime, Utc};
use kernel::id::CodeId;

/// One ranked leaderboard row
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardEntry {
    pub telegram_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub photo_url: Option<String>,
    /// Sum of points over codes this identity redeemed
    pub balance: i64,
}

/// One admin history row: a code that is redeemed or still live
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub id: CodeId,
    pub value: String,
    pub points: i32,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub used: bool,
    pub used_at: Option<DateTime<Utc>>,
    /// Redeemer handle rendered as `@username`, when known
    pub used_by_tag: Option<String>,
}

impl HistoryEntry {
    /// Display tag for the redeemer; only redeemed codes with a usable
    /// handle get one
    pub fn tag_for(used: bool, username: Option<&str>) -> Option<String> {
        if !used {
            return None;
        }
        let name = username?.trim();
        if name.is_empty() {
            return None;
        }
        if name.starts_with('@') {
            Some(name.to_string())
        } else {
            Some(format!("@{name}"))
        }
    }
}
