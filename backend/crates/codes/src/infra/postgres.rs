//! PostgreSQL Repository Implementation
//!
//! Implements the code repository trait against the shared schema.
//! Redemption atomicity rests on the conditional update in `consume`;
//! everything else is plain reads and aggregates.

use chrono::{DateTime, Utc};
use kernel::id::CodeId;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::code::Code;
use crate::domain::entity::leaderboard::{HistoryEntry, LeaderboardEntry};
use crate::domain::repository::CodeRepository;
use crate::error::{CodeError, CodeResult};

/// PostgreSQL code repository
#[derive(Clone)]
pub struct PgCodeRepository {
    pool: PgPool,
}

impl PgCodeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row for codes table
#[derive(sqlx::FromRow)]
struct CodeRow {
    id: Uuid,
    value: String,
    points: i32,
    created_by: i64,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    used: bool,
    used_by: Option<i64>,
    used_at: Option<DateTime<Utc>>,
}

impl CodeRow {
    fn into_code(self) -> Code {
        Code {
            id: CodeId::from_uuid(self.id),
            value: self.value,
            points: self.points,
            created_by: self.created_by,
            created_at: self.created_at,
            expires_at: self.expires_at,
            used: self.used,
            used_by: self.used_by,
            used_at: self.used_at,
        }
    }
}

/// Database row for the leaderboard aggregate
#[derive(sqlx::FromRow)]
struct LeaderboardRow {
    telegram_id: i64,
    username: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    photo_url: Option<String>,
    balance: i64,
}

/// Database row for the history view
#[derive(sqlx::FromRow)]
struct HistoryRow {
    id: Uuid,
    value: String,
    points: i32,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    used: bool,
    used_at: Option<DateTime<Utc>>,
    used_by_username: Option<String>,
}

impl HistoryRow {
    fn into_entry(self) -> HistoryEntry {
        let used_by_tag = HistoryEntry::tag_for(self.used, self.used_by_username.as_deref());
        HistoryEntry {
            id: CodeId::from_uuid(self.id),
            value: self.value,
            points: self.points,
            created_at: self.created_at,
            expires_at: self.expires_at,
            used: self.used,
            used_at: self.used_at,
            used_by_tag,
        }
    }
}

impl CodeRepository for PgCodeRepository {
    async fn insert(&self, code: &Code) -> CodeResult<()> {
        sqlx::query(
            r#"
            INSERT INTO codes (
                id, value, points, created_by, created_at, expires_at, used
            )
            VALUES ($1, $2, $3, $4, $5, $6, FALSE)
            "#,
        )
        .bind(code.id.into_uuid())
        .bind(&code.value)
        .bind(code.points)
        .bind(code.created_by)
        .bind(code.created_at)
        .bind(code.expires_at)
        .execute(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(())
    }

    async fn find_by_value(&self, value: &str) -> CodeResult<Option<Code>> {
        let row = sqlx::query_as::<_, CodeRow>(
            r#"
            SELECT id, value, points, created_by, created_at, expires_at,
                   used, used_by, used_at
            FROM codes
            WHERE value = $1
            "#,
        )
        .bind(value)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(CodeRow::into_code))
    }

    async fn consume(&self, id: CodeId, redeemer: i64, at: DateTime<Utc>) -> CodeResult<bool> {
        // The `used = FALSE` guard is the whole concurrency story:
        // a losing racer updates zero rows
        let result = sqlx::query(
            r#"
            UPDATE codes
            SET used = TRUE, used_by = $2, used_at = $3
            WHERE id = $1 AND used = FALSE
            "#,
        )
        .bind(id.into_uuid())
        .bind(redeemer)
        .bind(at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn user_exists(&self, telegram_id: i64) -> CodeResult<bool> {
        let exists: bool =
            sqlx::query_scalar(r#"SELECT EXISTS(SELECT 1 FROM users WHERE telegram_id = $1)"#)
                .bind(telegram_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn balance_of(&self, telegram_id: i64) -> CodeResult<i64> {
        let balance: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(points), 0)::BIGINT
            FROM codes
            WHERE used = TRUE AND used_by = $1
            "#,
        )
        .bind(telegram_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(balance)
    }

    async fn leaderboard(&self, limit: i64) -> CodeResult<Vec<LeaderboardEntry>> {
        let rows = sqlx::query_as::<_, LeaderboardRow>(
            r#"
            SELECT u.telegram_id, u.username, u.first_name, u.last_name,
                   u.photo_url, SUM(c.points)::BIGINT AS balance
            FROM codes c
            JOIN users u ON u.telegram_id = c.used_by
            WHERE c.used = TRUE AND c.used_by IS NOT NULL
            GROUP BY u.telegram_id, u.username, u.first_name, u.last_name,
                     u.photo_url
            ORDER BY balance DESC, u.telegram_id ASC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| LeaderboardEntry {
                telegram_id: row.telegram_id,
                username: row.username,
                first_name: row.first_name,
                last_name: row.last_name,
                photo_url: row.photo_url,
                balance: row.balance,
            })
            .collect())
    }

    async fn history(&self, limit: i64, now: DateTime<Utc>) -> CodeResult<Vec<HistoryEntry>> {
        let rows = sqlx::query_as::<_, HistoryRow>(
            r#"
            SELECT c.id, c.value, c.points, c.created_at, c.expires_at,
                   c.used, c.used_at, u.username AS used_by_username
            FROM codes c
            LEFT JOIN users u ON u.telegram_id = c.used_by
            WHERE c.used = TRUE OR c.expires_at > $2
            ORDER BY c.created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(HistoryRow::into_entry).collect())
    }
}

/// Translate the codes_value unique-index violation into the typed
/// collision the generation retry loop watches for
fn map_unique_violation(error: sqlx::Error) -> CodeError {
    if let sqlx::Error::Database(ref db) = error {
        if db.code().as_deref() == Some("23505") {
            return CodeError::ValueCollision;
        }
    }
    CodeError::Database(error)
}
