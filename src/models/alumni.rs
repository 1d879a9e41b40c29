use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Alumni profile. `user_id` optionally links the profile to a registered
/// login; employment-record ownership is derived through this link.
#[derive(Debug, Clone, Serialize)]
pub struct Alumni {
    pub id: i64,
    pub student_number: String,
    pub full_name: String,
    pub major: String,
    pub cohort_year: i32,
    pub graduation_year: i32,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub user_id: Option<i64>,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAlumniRequest {
    pub student_number: String,
    pub full_name: String,
    pub major: String,
    pub cohort_year: i32,
    pub graduation_year: i32,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub user_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAlumniRequest {
    pub student_number: String,
    pub full_name: String,
    pub major: String,
    pub cohort_year: i32,
    pub graduation_year: i32,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub user_id: Option<i64>,
}

fn validate_fields(
    student_number: &str,
    full_name: &str,
    major: &str,
    email: &str,
    cohort_year: i32,
    graduation_year: i32,
) -> Result<(), ApiError> {
    if student_number.trim().is_empty()
        || full_name.trim().is_empty()
        || major.trim().is_empty()
        || email.trim().is_empty()
    {
        return Err(ApiError::validation(
            "Student number, full name, major and email are required",
        ));
    }
    if cohort_year <= 0 || graduation_year <= 0 {
        return Err(ApiError::validation(
            "Cohort year and graduation year must be valid",
        ));
    }
    if graduation_year < cohort_year {
        return Err(ApiError::validation(
            "Graduation year must not precede cohort year",
        ));
    }
    Ok(())
}

impl CreateAlumniRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        validate_fields(
            &self.student_number,
            &self.full_name,
            &self.major,
            &self.email,
            self.cohort_year,
            self.graduation_year,
        )
    }
}

impl UpdateAlumniRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        validate_fields(
            &self.student_number,
            &self.full_name,
            &self.major,
            &self.email,
            self.cohort_year,
            self.graduation_year,
        )
    }
}
