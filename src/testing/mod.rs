//! In-memory store backend. Backs the integration tests, which exercise the
//! full router without a database.

use std::cmp::Ordering;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use crate::models::{
    Alumni, CreateAlumniRequest, CreateEmploymentRequest, EmploymentRecord, ListParams, Role,
    SortOrder, UpdateAlumniRequest, UpdateEmploymentRequest, User,
};
use crate::repository::{AlumniStore, EmploymentStore, Pinger, StoreError, UserStore};

#[derive(Default)]
struct Tables {
    users: Vec<(User, String)>,
    alumni: Vec<Alumni>,
    employment: Vec<EmploymentRecord>,
    next_user_id: i64,
    next_alumni_id: i64,
    next_employment_id: i64,
}

/// One struct implements all three store traits over a shared table set, so
/// cross-entity queries (ownership, the without-jobs report) see one world.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        // a poisoned lock means a panicking test; propagating the panic is fine
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Seed an alumni row directly, bypassing the API surface.
    pub fn insert_alumni(&self, req: &CreateAlumniRequest) -> Alumni {
        let mut tables = self.lock();
        tables.next_alumni_id += 1;
        let now = Utc::now();
        let alumni = Alumni {
            id: tables.next_alumni_id,
            student_number: req.student_number.clone(),
            full_name: req.full_name.clone(),
            major: req.major.clone(),
            cohort_year: req.cohort_year,
            graduation_year: req.graduation_year,
            email: req.email.clone(),
            phone: req.phone.clone(),
            address: req.address.clone(),
            user_id: req.user_id,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        };
        tables.alumni.push(alumni.clone());
        alumni
    }
}

fn matches(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn apply_order(ordering: Ordering, order: SortOrder) -> Ordering {
    match order {
        SortOrder::Asc => ordering,
        SortOrder::Desc => ordering.reverse(),
    }
}

fn paginate<T>(mut rows: Vec<T>, params: &ListParams) -> Vec<T> {
    let start = (params.offset as usize).min(rows.len());
    let end = (start + params.limit as usize).min(rows.len());
    rows.drain(..start);
    rows.truncate(end - start);
    rows
}

fn compare_alumni(a: &Alumni, b: &Alumni, key: &str) -> Ordering {
    match key {
        "student_number" => a.student_number.cmp(&b.student_number),
        "full_name" => a.full_name.cmp(&b.full_name),
        "major" => a.major.cmp(&b.major),
        "cohort_year" => a.cohort_year.cmp(&b.cohort_year),
        "graduation_year" => a.graduation_year.cmp(&b.graduation_year),
        "email" => a.email.cmp(&b.email),
        "created_at" => a.created_at.cmp(&b.created_at),
        _ => a.id.cmp(&b.id),
    }
}

fn compare_employment(a: &EmploymentRecord, b: &EmploymentRecord, key: &str) -> Ordering {
    match key {
        "alumni_id" => a.alumni_id.cmp(&b.alumni_id),
        "company" => a.company.cmp(&b.company),
        "position" => a.position.cmp(&b.position),
        "industry" => a.industry.cmp(&b.industry),
        "location" => a.location.cmp(&b.location),
        "start_date" => a.start_date.cmp(&b.start_date),
        "status" => a.status.as_str().cmp(b.status.as_str()),
        "created_at" => a.created_at.cmp(&b.created_at),
        "updated_at" => a.updated_at.cmp(&b.updated_at),
        _ => a.id.cmp(&b.id),
    }
}

fn employment_matches(record: &EmploymentRecord, alumni: &Alumni, search: &str) -> bool {
    matches(&record.company, search)
        || matches(&record.position, search)
        || matches(&alumni.full_name, search)
}

#[async_trait]
impl Pinger for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<(User, String)>, StoreError> {
        let tables = self.lock();
        Ok(tables
            .users
            .iter()
            .find(|(u, _)| !u.is_deleted && u.username == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<(User, String)>, StoreError> {
        let tables = self.lock();
        Ok(tables
            .users
            .iter()
            .find(|(u, _)| !u.is_deleted && u.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        let tables = self.lock();
        Ok(tables
            .users
            .iter()
            .find(|(u, _)| !u.is_deleted && u.id == id)
            .map(|(u, _)| u.clone()))
    }

    async fn create(
        &self,
        username: &str,
        email: &str,
        role: Role,
        password_hash: &str,
    ) -> Result<User, StoreError> {
        let mut tables = self.lock();
        tables.next_user_id += 1;
        let now = Utc::now();
        let user = User {
            id: tables.next_user_id,
            username: username.to_string(),
            email: email.to_string(),
            role,
            is_deleted: false,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        };
        tables.users.push((user.clone(), password_hash.to_string()));
        Ok(user)
    }

    async fn touch_last_login(&self, id: i64) -> Result<(), StoreError> {
        let mut tables = self.lock();
        if let Some((user, _)) = tables.users.iter_mut().find(|(u, _)| u.id == id) {
            let now = Utc::now();
            user.last_login_at = Some(now);
            user.updated_at = now;
        }
        Ok(())
    }
}

#[async_trait]
impl AlumniStore for MemoryStore {
    async fn list(&self, params: &ListParams) -> Result<Vec<Alumni>, StoreError> {
        let tables = self.lock();
        let mut rows: Vec<Alumni> = tables
            .alumni
            .iter()
            .filter(|a| !a.is_deleted && alumni_matches(a, &params.search))
            .cloned()
            .collect();
        rows.sort_by(|a, b| apply_order(compare_alumni(a, b, params.sort_key), params.order));
        Ok(paginate(rows, params))
    }

    async fn count(&self, search: &str) -> Result<i64, StoreError> {
        let tables = self.lock();
        Ok(tables
            .alumni
            .iter()
            .filter(|a| !a.is_deleted && alumni_matches(a, search))
            .count() as i64)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Alumni>, StoreError> {
        let tables = self.lock();
        Ok(tables
            .alumni
            .iter()
            .find(|a| !a.is_deleted && a.id == id)
            .cloned())
    }

    async fn create(&self, req: &CreateAlumniRequest) -> Result<Alumni, StoreError> {
        Ok(self.insert_alumni(req))
    }

    async fn update(
        &self,
        id: i64,
        req: &UpdateAlumniRequest,
    ) -> Result<Option<Alumni>, StoreError> {
        let mut tables = self.lock();
        let Some(alumni) = tables.alumni.iter_mut().find(|a| !a.is_deleted && a.id == id)
        else {
            return Ok(None);
        };
        alumni.student_number = req.student_number.clone();
        alumni.full_name = req.full_name.clone();
        alumni.major = req.major.clone();
        alumni.cohort_year = req.cohort_year;
        alumni.graduation_year = req.graduation_year;
        alumni.email = req.email.clone();
        alumni.phone = req.phone.clone();
        alumni.address = req.address.clone();
        alumni.user_id = req.user_id;
        alumni.updated_at = Utc::now();
        Ok(Some(alumni.clone()))
    }

    async fn soft_delete(&self, id: i64) -> Result<bool, StoreError> {
        let mut tables = self.lock();
        let Some(alumni) = tables.alumni.iter_mut().find(|a| !a.is_deleted && a.id == id)
        else {
            return Ok(false);
        };
        alumni.is_deleted = true;
        alumni.updated_at = Utc::now();
        Ok(true)
    }

    async fn without_employment(&self) -> Result<Vec<Alumni>, StoreError> {
        let tables = self.lock();
        let mut rows: Vec<Alumni> = tables
            .alumni
            .iter()
            .filter(|a| !tables.employment.iter().any(|e| e.alumni_id == a.id))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }
}

fn alumni_matches(alumni: &Alumni, search: &str) -> bool {
    matches(&alumni.full_name, search)
        || matches(&alumni.email, search)
        || matches(&alumni.student_number, search)
        || matches(&alumni.major, search)
}

impl MemoryStore {
    fn joined<'a>(
        tables: &'a Tables,
        record: &EmploymentRecord,
    ) -> Option<(&'a Alumni, EmploymentRecord)> {
        let alumni = tables.alumni.iter().find(|a| a.id == record.alumni_id)?;
        let mut joined = record.clone();
        joined.alumni = Some(alumni.clone());
        Some((alumni, joined))
    }
}

#[async_trait]
impl EmploymentStore for MemoryStore {
    async fn list_active(&self, params: &ListParams) -> Result<Vec<EmploymentRecord>, StoreError> {
        let tables = self.lock();
        let mut rows: Vec<EmploymentRecord> = tables
            .employment
            .iter()
            .filter(|e| !e.is_deleted)
            .filter_map(|e| Self::joined(&tables, e))
            .filter(|(alumni, record)| {
                !alumni.is_deleted && employment_matches(record, alumni, &params.search)
            })
            .map(|(_, record)| record)
            .collect();
        rows.sort_by(|a, b| apply_order(compare_employment(a, b, params.sort_key), params.order));
        Ok(paginate(rows, params))
    }

    async fn count_active(&self, search: &str) -> Result<i64, StoreError> {
        let tables = self.lock();
        Ok(tables
            .employment
            .iter()
            .filter(|e| !e.is_deleted)
            .filter_map(|e| Self::joined(&tables, e))
            .filter(|(alumni, record)| {
                !alumni.is_deleted && employment_matches(record, alumni, search)
            })
            .count() as i64)
    }

    async fn list_trashed(
        &self,
        params: &ListParams,
    ) -> Result<Vec<EmploymentRecord>, StoreError> {
        let tables = self.lock();
        let mut rows: Vec<EmploymentRecord> = tables
            .employment
            .iter()
            .filter(|e| e.is_deleted)
            .filter_map(|e| Self::joined(&tables, e))
            .filter(|(alumni, record)| employment_matches(record, alumni, &params.search))
            .map(|(_, record)| record)
            .collect();
        rows.sort_by(|a, b| apply_order(compare_employment(a, b, params.sort_key), params.order));
        Ok(paginate(rows, params))
    }

    async fn count_trashed(&self, search: &str) -> Result<i64, StoreError> {
        let tables = self.lock();
        Ok(tables
            .employment
            .iter()
            .filter(|e| e.is_deleted)
            .filter_map(|e| Self::joined(&tables, e))
            .filter(|(alumni, record)| employment_matches(record, alumni, search))
            .count() as i64)
    }

    async fn find_active_by_id(&self, id: i64) -> Result<Option<EmploymentRecord>, StoreError> {
        let tables = self.lock();
        Ok(tables
            .employment
            .iter()
            .find(|e| !e.is_deleted && e.id == id)
            .and_then(|e| Self::joined(&tables, e))
            .filter(|(alumni, _)| !alumni.is_deleted)
            .map(|(_, record)| record))
    }

    async fn list_by_alumni(&self, alumni_id: i64) -> Result<Vec<EmploymentRecord>, StoreError> {
        let tables = self.lock();
        let mut rows: Vec<EmploymentRecord> = tables
            .employment
            .iter()
            .filter(|e| e.alumni_id == alumni_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        Ok(rows)
    }

    async fn create(
        &self,
        req: &CreateEmploymentRequest,
    ) -> Result<EmploymentRecord, StoreError> {
        let mut tables = self.lock();
        tables.next_employment_id += 1;
        let now = Utc::now();
        let record = EmploymentRecord {
            id: tables.next_employment_id,
            alumni_id: req.alumni_id,
            company: req.company.clone(),
            position: req.position.clone(),
            industry: req.industry.clone(),
            location: req.location.clone(),
            salary_range: req.salary_range.clone(),
            start_date: req.start_date,
            end_date: req.end_date,
            status: req.status,
            description: req.description.clone(),
            is_deleted: false,
            created_at: now,
            updated_at: now,
            alumni: None,
        };
        tables.employment.push(record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        id: i64,
        req: &UpdateEmploymentRequest,
    ) -> Result<Option<EmploymentRecord>, StoreError> {
        let mut tables = self.lock();
        let Some(record) = tables.employment.iter_mut().find(|e| e.id == id) else {
            return Ok(None);
        };
        record.company = req.company.clone();
        record.position = req.position.clone();
        record.industry = req.industry.clone();
        record.location = req.location.clone();
        record.salary_range = req.salary_range.clone();
        record.start_date = req.start_date;
        record.end_date = req.end_date;
        record.status = req.status;
        record.description = req.description.clone();
        record.updated_at = Utc::now();
        Ok(Some(record.clone()))
    }

    async fn soft_delete(&self, id: i64) -> Result<bool, StoreError> {
        let mut tables = self.lock();
        let Some(record) = tables
            .employment
            .iter_mut()
            .find(|e| !e.is_deleted && e.id == id)
        else {
            return Ok(false);
        };
        record.is_deleted = true;
        record.updated_at = Utc::now();
        Ok(true)
    }

    async fn restore(&self, id: i64) -> Result<Option<EmploymentRecord>, StoreError> {
        let mut tables = self.lock();
        let Some(record) = tables
            .employment
            .iter_mut()
            .find(|e| e.is_deleted && e.id == id)
        else {
            return Ok(None);
        };
        record.is_deleted = false;
        record.updated_at = Utc::now();
        let restored = record.clone();
        Ok(Self::joined(&tables, &restored).map(|(_, joined)| joined))
    }

    async fn hard_delete_trashed(&self, id: i64) -> Result<bool, StoreError> {
        let mut tables = self.lock();
        let before = tables.employment.len();
        tables.employment.retain(|e| !(e.is_deleted && e.id == id));
        Ok(tables.employment.len() < before)
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let mut tables = self.lock();
        let before = tables.employment.len();
        tables.employment.retain(|e| e.id != id);
        Ok(tables.employment.len() < before)
    }
}
