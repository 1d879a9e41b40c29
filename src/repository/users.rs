use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use super::StoreError;
use crate::models::{Role, User};

/// Storage boundary for login identities.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Returns the user together with its password hash; the hash never
    /// travels further than the login handler.
    async fn find_by_username(&self, username: &str)
        -> Result<Option<(User, String)>, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<(User, String)>, StoreError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError>;

    async fn create(
        &self,
        username: &str,
        email: &str,
        role: Role,
        password_hash: &str,
    ) -> Result<User, StoreError>;

    async fn touch_last_login(&self, id: i64) -> Result<(), StoreError>;
}

pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const USER_COLUMNS: &str =
    "id, username, email, role, is_deleted, last_login_at, created_at, updated_at";

fn map_user(row: &PgRow) -> Result<User, StoreError> {
    let role: String = row.try_get("role")?;
    let role = Role::parse(&role)
        .ok_or_else(|| StoreError::Decode(format!("unknown role '{}'", role)))?;
    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        email: row.try_get("email")?,
        role,
        is_deleted: row.try_get("is_deleted")?,
        last_login_at: row.try_get("last_login_at")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn map_user_with_hash(row: &PgRow) -> Result<(User, String), StoreError> {
    let user = map_user(row)?;
    let hash: String = row.try_get("password_hash")?;
    Ok((user, hash))
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<(User, String)>, StoreError> {
        let sql = format!(
            "SELECT {}, password_hash FROM users WHERE username = $1 AND is_deleted = FALSE",
            USER_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(map_user_with_hash).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<(User, String)>, StoreError> {
        let sql = format!(
            "SELECT {}, password_hash FROM users WHERE email = $1 AND is_deleted = FALSE",
            USER_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(map_user_with_hash).transpose()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        let sql = format!(
            "SELECT {} FROM users WHERE id = $1 AND is_deleted = FALSE",
            USER_COLUMNS
        );
        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;
        row.as_ref().map(map_user).transpose()
    }

    async fn create(
        &self,
        username: &str,
        email: &str,
        role: Role,
        password_hash: &str,
    ) -> Result<User, StoreError> {
        let now = Utc::now();
        let sql = format!(
            "INSERT INTO users (username, email, role, password_hash, is_deleted, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, FALSE, $5, $5) RETURNING {}",
            USER_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(username)
            .bind(email)
            .bind(role.as_str())
            .bind(password_hash)
            .bind(now)
            .fetch_one(&self.pool)
            .await?;
        map_user(&row)
    }

    async fn touch_last_login(&self, id: i64) -> Result<(), StoreError> {
        sqlx::query("UPDATE users SET last_login_at = $1, updated_at = $1 WHERE id = $2")
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
