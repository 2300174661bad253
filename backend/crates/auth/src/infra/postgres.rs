//! PostgreSQL Repository Implementation
//!
//! Implements the user repository trait against the shared schema.
//! Balance is never stored; it is always the aggregate of redeemed codes.

use sqlx::PgPool;

use crate::domain::entity::{telegram_user::TelegramUser, user::User};
use crate::domain::repository::UserRepository;
use crate::error::AuthResult;

/// PostgreSQL user repository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row for users table
#[derive(sqlx::FromRow)]
struct UserRow {
    telegram_id: i64,
    username: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    language_code: Option<String>,
    photo_url: Option<String>,
    is_bot: Option<bool>,
    is_premium: Option<bool>,
    is_admin: bool,
    is_root: bool,
    last_auth_at: chrono::DateTime<chrono::Utc>,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl UserRow {
    fn into_user(self) -> User {
        User {
            telegram_id: self.telegram_id,
            username: self.username,
            first_name: self.first_name,
            last_name: self.last_name,
            language_code: self.language_code,
            photo_url: self.photo_url,
            is_bot: self.is_bot,
            is_premium: self.is_premium,
            is_admin: self.is_admin,
            is_root: self.is_root,
            last_auth_at: self.last_auth_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

const USER_COLUMNS: &str = r#"
    telegram_id, username, first_name, last_name, language_code,
    photo_url, is_bot, is_premium, is_admin, is_root,
    last_auth_at, created_at, updated_at
"#;

impl UserRepository for PgUserRepository {
    async fn upsert_from_telegram(&self, profile: &TelegramUser) -> AuthResult<User> {
        // Grant flags are deliberately absent from the update list
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (
                telegram_id, username, first_name, last_name, language_code,
                photo_url, is_bot, is_premium, last_auth_at, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, now(), now(), now())
            ON CONFLICT (telegram_id) DO UPDATE SET
                username = EXCLUDED.username,
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                language_code = EXCLUDED.language_code,
                photo_url = EXCLUDED.photo_url,
                is_bot = EXCLUDED.is_bot,
                is_premium = EXCLUDED.is_premium,
                last_auth_at = now(),
                updated_at = now()
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(profile.id)
        .bind(&profile.username)
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(&profile.language_code)
        .bind(&profile.photo_url)
        .bind(profile.is_bot)
        .bind(profile.is_premium)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_user())
    }

    async fn find_by_telegram_id(&self, telegram_id: i64) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE telegram_id = $1
            "#
        ))
        .bind(telegram_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserRow::into_user))
    }

    async fn search(&self, query: &str, limit: i64) -> AuthResult<Vec<User>> {
        let pattern = format!("%{query}%");
        let exact_id: Option<i64> = query.parse().ok();

        let rows = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE username ILIKE $1
               OR first_name ILIKE $1
               OR last_name ILIKE $1
               OR ($2::BIGINT IS NOT NULL AND telegram_id = $2)
            ORDER BY username ASC NULLS LAST, telegram_id ASC
            LIMIT $3
            "#
        ))
        .bind(&pattern)
        .bind(exact_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(UserRow::into_user).collect())
    }

    async fn set_admin(&self, telegram_id: i64, is_admin: bool) -> AuthResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET is_admin = $2, updated_at = now()
            WHERE telegram_id = $1
            "#,
        )
        .bind(telegram_id)
        .bind(is_admin)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn balance_of(&self, telegram_id: i64) -> AuthResult<i64> {
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
}
