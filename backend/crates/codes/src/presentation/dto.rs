//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entity::code::Code;
use crate::domain::entity::leaderboard::{HistoryEntry, LeaderboardEntry};

// ============================================================================
// Redeem
// ============================================================================

/// Redeem request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeemCodeRequest {
    #[serde(default)]
    pub code: String,
}

/// Redeem response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeemCodeResponse {
    pub balance: i64,
    pub message: String,
}

// ============================================================================
// Admin: Generate / History
// ============================================================================

/// Generate request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateCodeRequest {
    #[serde(default)]
    pub points: i32,
}

/// Generate response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateCodeResponse {
    pub code: String,
    pub points: i32,
    pub expires_at: DateTime<Utc>,
}

impl From<Code> for GenerateCodeResponse {
    fn from(code: Code) -> Self {
        Self {
            code: code.value,
            points: code.points,
            expires_at: code.expires_at,
        }
    }
}

/// One admin history row on the wire
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeHistoryItemDto {
    pub id: Uuid,
    pub value: String,
    pub points: i32,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub used: bool,
    pub used_at: Option<DateTime<Utc>>,
    pub used_by_tag: Option<String>,
}

impl From<HistoryEntry> for CodeHistoryItemDto {
    fn from(entry: HistoryEntry) -> Self {
        Self {
            id: entry.id.into_uuid(),
            value: entry.value,
            points: entry.points,
            created_at: entry.created_at,
            expires_at: entry.expires_at,
            used: entry.used,
            used_at: entry.used_at,
            used_by_tag: entry.used_by_tag,
        }
    }
}

// ============================================================================
// Leaderboard
// ============================================================================

/// One leaderboard row on the wire; also the WebSocket snapshot element
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntryDto {
    pub telegram_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub photo_url: Option<String>,
    pub balance: i64,
}

impl From<LeaderboardEntry> for LeaderboardEntryDto {
    fn from(entry: LeaderboardEntry) -> Self {
        Self {
            telegram_id: entry.telegram_id,
            username: entry.username,
            first_name: entry.first_name,
            last_name: entry.last_name,
            photo_url: entry.photo_url,
            balance: entry.balance,
        }
    }
}
