use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use super::StoreError;
use crate::models::{Alumni, CreateAlumniRequest, ListParams, UpdateAlumniRequest};

/// Permitted ORDER BY columns for alumni lists. Anything else silently
/// falls back to `id` during query sanitization.
pub const ALUMNI_SORT_KEYS: &[&str] = &[
    "id",
    "student_number",
    "full_name",
    "major",
    "cohort_year",
    "graduation_year",
    "email",
    "created_at",
];

/// Storage boundary for alumni profiles.
#[async_trait]
pub trait AlumniStore: Send + Sync {
    async fn list(&self, params: &ListParams) -> Result<Vec<Alumni>, StoreError>;

    /// Row count over the same search predicate as [`list`](Self::list).
    async fn count(&self, search: &str) -> Result<i64, StoreError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Alumni>, StoreError>;

    async fn create(&self, req: &CreateAlumniRequest) -> Result<Alumni, StoreError>;

    /// Full-row update; `None` when the id does not resolve.
    async fn update(
        &self,
        id: i64,
        req: &UpdateAlumniRequest,
    ) -> Result<Option<Alumni>, StoreError>;

    /// Marks the profile deleted. `false` when it was already gone.
    async fn soft_delete(&self, id: i64) -> Result<bool, StoreError>;

    /// Alumni with zero employment records (anti-join). Lifecycle flags are
    /// ignored on both sides: trashed employment records still count as
    /// history, and soft-deleted alumni still appear in the report.
    async fn without_employment(&self) -> Result<Vec<Alumni>, StoreError>;
}

pub struct PgAlumniStore {
    pool: PgPool,
}

impl PgAlumniStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const ALUMNI_COLUMNS: &str = "id, student_number, full_name, major, cohort_year, \
     graduation_year, email, phone, address, user_id, is_deleted, created_at, updated_at";

const SEARCH_PREDICATE: &str = "(full_name ILIKE $1 OR email ILIKE $1 \
     OR student_number ILIKE $1 OR major ILIKE $1)";

pub(crate) fn map_alumni(row: &PgRow) -> Result<Alumni, StoreError> {
    Ok(Alumni {
        id: row.try_get("id")?,
        student_number: row.try_get("student_number")?,
        full_name: row.try_get("full_name")?,
        major: row.try_get("major")?,
        cohort_year: row.try_get("cohort_year")?,
        graduation_year: row.try_get("graduation_year")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        address: row.try_get("address")?,
        user_id: row.try_get("user_id")?,
        is_deleted: row.try_get("is_deleted")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl AlumniStore for PgAlumniStore {
    async fn list(&self, params: &ListParams) -> Result<Vec<Alumni>, StoreError> {
        // sort_key comes pre-sanitized against ALUMNI_SORT_KEYS, so the
        // dynamic ORDER BY below cannot carry injected content.
        let sql = format!(
            "SELECT {} FROM alumni WHERE is_deleted = FALSE AND {} ORDER BY {} {} LIMIT $2 OFFSET $3",
            ALUMNI_COLUMNS,
            SEARCH_PREDICATE,
            params.sort_key,
            params.order.as_sql(),
        );
        let rows = sqlx::query(&sql)
            .bind(format!("%{}%", params.search))
            .bind(params.limit)
            .bind(params.offset)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(map_alumni).collect()
    }

    async fn count(&self, search: &str) -> Result<i64, StoreError> {
        let sql = format!(
            "SELECT COUNT(*) AS count FROM alumni WHERE is_deleted = FALSE AND {}",
            SEARCH_PREDICATE
        );
        let row = sqlx::query(&sql)
            .bind(format!("%{}%", search))
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get("count")?)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Alumni>, StoreError> {
        let sql = format!(
            "SELECT {} FROM alumni WHERE id = $1 AND is_deleted = FALSE",
            ALUMNI_COLUMNS
        );
        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;
        row.as_ref().map(map_alumni).transpose()
    }

    async fn create(&self, req: &CreateAlumniRequest) -> Result<Alumni, StoreError> {
        let now = Utc::now();
        let sql = format!(
            "INSERT INTO alumni (student_number, full_name, major, cohort_year, graduation_year, \
             email, phone, address, user_id, is_deleted, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, FALSE, $10, $10) RETURNING {}",
            ALUMNI_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(&req.student_number)
            .bind(&req.full_name)
            .bind(&req.major)
            .bind(req.cohort_year)
            .bind(req.graduation_year)
            .bind(&req.email)
            .bind(&req.phone)
            .bind(&req.address)
            .bind(req.user_id)
            .bind(now)
            .fetch_one(&self.pool)
            .await?;
        map_alumni(&row)
    }

    async fn update(
        &self,
        id: i64,
        req: &UpdateAlumniRequest,
    ) -> Result<Option<Alumni>, StoreError> {
        let sql = format!(
            "UPDATE alumni SET student_number = $1, full_name = $2, major = $3, cohort_year = $4, \
             graduation_year = $5, email = $6, phone = $7, address = $8, user_id = $9, \
             updated_at = $10 WHERE id = $11 AND is_deleted = FALSE RETURNING {}",
            ALUMNI_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(&req.student_number)
            .bind(&req.full_name)
            .bind(&req.major)
            .bind(req.cohort_year)
            .bind(req.graduation_year)
            .bind(&req.email)
            .bind(&req.phone)
            .bind(&req.address)
            .bind(req.user_id)
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(map_alumni).transpose()
    }

    async fn soft_delete(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE alumni SET is_deleted = TRUE, updated_at = $1 \
             WHERE id = $2 AND is_deleted = FALSE",
        )
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn without_employment(&self) -> Result<Vec<Alumni>, StoreError> {
        let sql = format!(
            "SELECT {} FROM alumni a \
             LEFT JOIN employment_records e ON a.id = e.alumni_id \
             WHERE e.alumni_id IS NULL ORDER BY a.created_at DESC",
            // qualify the shared column list with the alumni alias
            ALUMNI_COLUMNS
                .split(", ")
                .map(|c| format!("a.{}", c))
                .collect::<Vec<_>>()
                .join(", ")
        );
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(map_alumni).collect()
    }
}
