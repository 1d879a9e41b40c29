use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use super::StoreError;
use crate::models::{
    CreateEmploymentRequest, EmploymentRecord, EmploymentStatus, ListParams,
    UpdateEmploymentRequest,
};

/// Permitted ORDER BY columns for the active employment list.
pub const EMPLOYMENT_SORT_KEYS: &[&str] = &[
    "id",
    "alumni_id",
    "company",
    "position",
    "industry",
    "location",
    "start_date",
    "status",
    "created_at",
];

/// The trash listing additionally allows sorting by updated_at, which is
/// when the record entered the trash.
pub const EMPLOYMENT_TRASH_SORT_KEYS: &[&str] = &[
    "id",
    "alumni_id",
    "company",
    "position",
    "industry",
    "location",
    "start_date",
    "status",
    "created_at",
    "updated_at",
];

/// Storage boundary for employment records and their lifecycle. Guarded
/// transitions condition the write on the expected prior state; callers
/// read `false`/`None` as "not in the expected state" and surface 404.
#[async_trait]
pub trait EmploymentStore: Send + Sync {
    /// Active records joined with their (non-deleted) alumni.
    async fn list_active(&self, params: &ListParams) -> Result<Vec<EmploymentRecord>, StoreError>;

    async fn count_active(&self, search: &str) -> Result<i64, StoreError>;

    /// Trashed records joined with their alumni.
    async fn list_trashed(&self, params: &ListParams)
        -> Result<Vec<EmploymentRecord>, StoreError>;

    async fn count_trashed(&self, search: &str) -> Result<i64, StoreError>;

    /// Single active record with its alumni; trashed records and records
    /// under a soft-deleted alumni are invisible here.
    async fn find_active_by_id(&self, id: i64) -> Result<Option<EmploymentRecord>, StoreError>;

    /// Full history for one alumni, newest start date first, regardless of
    /// lifecycle state.
    async fn list_by_alumni(&self, alumni_id: i64) -> Result<Vec<EmploymentRecord>, StoreError>;

    async fn create(&self, req: &CreateEmploymentRequest)
        -> Result<EmploymentRecord, StoreError>;

    /// Updates in any lifecycle state; `None` when the row does not exist.
    async fn update(
        &self,
        id: i64,
        req: &UpdateEmploymentRequest,
    ) -> Result<Option<EmploymentRecord>, StoreError>;

    /// active -> trashed. `false` when the record is missing or already
    /// trashed; the write itself carries the precondition.
    async fn soft_delete(&self, id: i64) -> Result<bool, StoreError>;

    /// trashed -> active. Returns the restored record re-joined with its
    /// alumni; `None` when the record is not currently trashed.
    async fn restore(&self, id: i64) -> Result<Option<EmploymentRecord>, StoreError>;

    /// trashed -> purged. `false` when the record is not currently trashed.
    async fn hard_delete_trashed(&self, id: i64) -> Result<bool, StoreError>;

    /// Unconditional delete-by-id; the administrative bypass of the trash
    /// stage. `false` when the row does not exist.
    async fn delete(&self, id: i64) -> Result<bool, StoreError>;
}

pub struct PgEmploymentStore {
    pool: PgPool,
}

impl PgEmploymentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const EMPLOYMENT_COLUMNS: &str = "id, alumni_id, company, position, industry, location, \
     salary_range, start_date, end_date, status, description, is_deleted, created_at, updated_at";

const SEARCH_PREDICATE: &str =
    "(e.company ILIKE $1 OR e.position ILIKE $1 OR a.full_name ILIKE $1)";

fn qualified(alias: &str) -> String {
    EMPLOYMENT_COLUMNS
        .split(", ")
        .map(|c| format!("{}.{}", alias, c))
        .collect::<Vec<_>>()
        .join(", ")
}

fn joined_select() -> String {
    let alumni = "a.id AS alumni_row_id, a.student_number, a.full_name, a.major, \
         a.cohort_year, a.graduation_year, a.email, a.phone, a.address, a.user_id, \
         a.is_deleted AS alumni_is_deleted, a.created_at AS alumni_created_at, \
         a.updated_at AS alumni_updated_at";
    format!(
        "SELECT {}, {} FROM employment_records e JOIN alumni a ON e.alumni_id = a.id",
        qualified("e"),
        alumni
    )
}

fn map_employment(row: &PgRow) -> Result<EmploymentRecord, StoreError> {
    let status: String = row.try_get("status")?;
    let status = EmploymentStatus::parse(&status)
        .ok_or_else(|| StoreError::Decode(format!("unknown employment status '{}'", status)))?;
    Ok(EmploymentRecord {
        id: row.try_get("id")?,
        alumni_id: row.try_get("alumni_id")?,
        company: row.try_get("company")?,
        position: row.try_get("position")?,
        industry: row.try_get("industry")?,
        location: row.try_get("location")?,
        salary_range: row.try_get("salary_range")?,
        start_date: row.try_get("start_date")?,
        end_date: row.try_get("end_date")?,
        status,
        description: row.try_get("description")?,
        is_deleted: row.try_get("is_deleted")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
        alumni: None,
    })
}

fn map_employment_joined(row: &PgRow) -> Result<EmploymentRecord, StoreError> {
    let mut record = map_employment(row)?;
    record.alumni = Some(crate::models::Alumni {
        id: row.try_get("alumni_row_id")?,
        student_number: row.try_get("student_number")?,
        full_name: row.try_get("full_name")?,
        major: row.try_get("major")?,
        cohort_year: row.try_get("cohort_year")?,
        graduation_year: row.try_get("graduation_year")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        address: row.try_get("address")?,
        user_id: row.try_get("user_id")?,
        is_deleted: row.try_get("alumni_is_deleted")?,
        created_at: row.try_get("alumni_created_at")?,
        updated_at: row.try_get("alumni_updated_at")?,
    });
    Ok(record)
}

#[async_trait]
impl EmploymentStore for PgEmploymentStore {
    async fn list_active(&self, params: &ListParams) -> Result<Vec<EmploymentRecord>, StoreError> {
        // A record under a soft-deleted alumni is invisible on the active
        // path even when the record itself is active.
        let sql = format!(
            "{} WHERE e.is_deleted = FALSE AND a.is_deleted = FALSE AND {} \
             ORDER BY e.{} {} LIMIT $2 OFFSET $3",
            joined_select(),
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
        rows.iter().map(map_employment_joined).collect()
    }

    async fn count_active(&self, search: &str) -> Result<i64, StoreError> {
        let sql = format!(
            "SELECT COUNT(*) AS count FROM employment_records e \
             JOIN alumni a ON e.alumni_id = a.id \
             WHERE e.is_deleted = FALSE AND a.is_deleted = FALSE AND {}",
            SEARCH_PREDICATE
        );
        let row = sqlx::query(&sql)
            .bind(format!("%{}%", search))
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get("count")?)
    }

    async fn list_trashed(
        &self,
        params: &ListParams,
    ) -> Result<Vec<EmploymentRecord>, StoreError> {
        let sql = format!(
            "{} WHERE e.is_deleted = TRUE AND {} ORDER BY e.{} {} LIMIT $2 OFFSET $3",
            joined_select(),
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
        rows.iter().map(map_employment_joined).collect()
    }

    async fn count_trashed(&self, search: &str) -> Result<i64, StoreError> {
        let sql = format!(
            "SELECT COUNT(*) AS count FROM employment_records e \
             JOIN alumni a ON e.alumni_id = a.id \
             WHERE e.is_deleted = TRUE AND {}",
            SEARCH_PREDICATE
        );
        let row = sqlx::query(&sql)
            .bind(format!("%{}%", search))
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get("count")?)
    }

    async fn find_active_by_id(&self, id: i64) -> Result<Option<EmploymentRecord>, StoreError> {
        let sql = format!(
            "{} WHERE e.id = $1 AND e.is_deleted = FALSE AND a.is_deleted = FALSE",
            joined_select()
        );
        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;
        row.as_ref().map(map_employment_joined).transpose()
    }

    async fn list_by_alumni(&self, alumni_id: i64) -> Result<Vec<EmploymentRecord>, StoreError> {
        let sql = format!(
            "SELECT {} FROM employment_records WHERE alumni_id = $1 ORDER BY start_date DESC",
            EMPLOYMENT_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(alumni_id)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(map_employment).collect()
    }

    async fn create(
        &self,
        req: &CreateEmploymentRequest,
    ) -> Result<EmploymentRecord, StoreError> {
        let now = Utc::now();
        let sql = format!(
            "INSERT INTO employment_records (alumni_id, company, position, industry, location, \
             salary_range, start_date, end_date, status, description, is_deleted, created_at, \
             updated_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, FALSE, $11, $11) \
             RETURNING {}",
            EMPLOYMENT_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(req.alumni_id)
            .bind(&req.company)
            .bind(&req.position)
            .bind(&req.industry)
            .bind(&req.location)
            .bind(&req.salary_range)
            .bind(req.start_date)
            .bind(req.end_date)
            .bind(req.status.as_str())
            .bind(&req.description)
            .bind(now)
            .fetch_one(&self.pool)
            .await?;
        map_employment(&row)
    }

    async fn update(
        &self,
        id: i64,
        req: &UpdateEmploymentRequest,
    ) -> Result<Option<EmploymentRecord>, StoreError> {
        // alumni_id is immutable after creation and absent from the SET list
        let sql = format!(
            "UPDATE employment_records SET company = $1, position = $2, industry = $3, \
             location = $4, salary_range = $5, start_date = $6, end_date = $7, status = $8, \
             description = $9, updated_at = $10 WHERE id = $11 RETURNING {}",
            EMPLOYMENT_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(&req.company)
            .bind(&req.position)
            .bind(&req.industry)
            .bind(&req.location)
            .bind(&req.salary_range)
            .bind(req.start_date)
            .bind(req.end_date)
            .bind(req.status.as_str())
            .bind(&req.description)
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(map_employment).transpose()
    }

    async fn soft_delete(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE employment_records SET is_deleted = TRUE, updated_at = $1 \
             WHERE id = $2 AND is_deleted = FALSE",
        )
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn restore(&self, id: i64) -> Result<Option<EmploymentRecord>, StoreError> {
        let result = sqlx::query(
            "UPDATE employment_records SET is_deleted = FALSE, updated_at = $1 \
             WHERE id = $2 AND is_deleted = TRUE",
        )
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }

        let sql = format!("{} WHERE e.id = $1", joined_select());
        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;
        row.as_ref().map(map_employment_joined).transpose()
    }

    async fn hard_delete_trashed(&self, id: i64) -> Result<bool, StoreError> {
        let result =
            sqlx::query("DELETE FROM employment_records WHERE id = $1 AND is_deleted = TRUE")
                .bind(id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM employment_records WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
