use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::models::alumni::Alumni;

/// Employment status, kept with the original Indonesian domain values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmploymentStatus {
    Aktif,
    Selesai,
    Resigned,
}

impl EmploymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmploymentStatus::Aktif => "aktif",
            EmploymentStatus::Selesai => "selesai",
            EmploymentStatus::Resigned => "resigned",
        }
    }

    pub fn parse(s: &str) -> Option<EmploymentStatus> {
        match s {
            "aktif" => Some(EmploymentStatus::Aktif),
            "selesai" => Some(EmploymentStatus::Selesai),
            "resigned" => Some(EmploymentStatus::Resigned),
            _ => None,
        }
    }
}

/// One employment entry in an alumni's history. `is_deleted` is the
/// lifecycle flag: false = active, true = trashed. Purged rows are gone.
#[derive(Debug, Clone, Serialize)]
pub struct EmploymentRecord {
    pub id: i64,
    pub alumni_id: i64,
    pub company: String,
    pub position: String,
    pub industry: String,
    pub location: String,
    pub salary_range: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub status: EmploymentStatus,
    pub description: Option<String>,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Joined alumni row, present on list/detail reads.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alumni: Option<Alumni>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateEmploymentRequest {
    pub alumni_id: i64,
    pub company: String,
    pub position: String,
    pub industry: String,
    pub location: String,
    pub salary_range: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub status: EmploymentStatus,
    pub description: Option<String>,
}

/// Update carries the full field set; `alumni_id` is immutable after
/// creation and deliberately absent here.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateEmploymentRequest {
    pub company: String,
    pub position: String,
    pub industry: String,
    pub location: String,
    pub salary_range: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub status: EmploymentStatus,
    pub description: Option<String>,
}

fn validate_fields(
    company: &str,
    position: &str,
    industry: &str,
    location: &str,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
) -> Result<(), ApiError> {
    if company.trim().is_empty()
        || position.trim().is_empty()
        || industry.trim().is_empty()
        || location.trim().is_empty()
    {
        return Err(ApiError::validation(
            "Company, position, industry and location are required",
        ));
    }
    if let Some(end) = end_date {
        if end < start_date {
            return Err(ApiError::validation(
                "End date must not precede start date",
            ));
        }
    }
    Ok(())
}

impl CreateEmploymentRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.alumni_id <= 0 {
            return Err(ApiError::validation("A valid alumni id is required"));
        }
        validate_fields(
            &self.company,
            &self.position,
            &self.industry,
            &self.location,
            self.start_date,
            self.end_date,
        )
    }
}

impl UpdateEmploymentRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        validate_fields(
            &self.company,
            &self.position,
            &self.industry,
            &self.location,
            self.start_date,
            self.end_date,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateEmploymentRequest {
        CreateEmploymentRequest {
            alumni_id: 1,
            company: "PT Nusantara Data".into(),
            position: "Backend Engineer".into(),
            industry: "Software".into(),
            location: "Jakarta".into(),
            salary_range: Some("8-12jt".into()),
            start_date: NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
            end_date: None,
            status: EmploymentStatus::Aktif,
            description: None,
        }
    }

    #[test]
    fn valid_request_passes() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn end_date_before_start_date_rejected() {
        let mut req = request();
        req.end_date = NaiveDate::from_ymd_opt(2020, 12, 31);
        assert!(matches!(req.validate(), Err(ApiError::Validation(_))));
    }

    #[test]
    fn end_date_equal_to_start_date_allowed() {
        let mut req = request();
        req.end_date = Some(req.start_date);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn empty_company_rejected() {
        let mut req = request();
        req.company = String::new();
        assert!(matches!(req.validate(), Err(ApiError::Validation(_))));
    }

    #[test]
    fn status_strings_round_trip() {
        assert_eq!(EmploymentStatus::parse("aktif"), Some(EmploymentStatus::Aktif));
        assert_eq!(EmploymentStatus::parse("selesai"), Some(EmploymentStatus::Selesai));
        assert_eq!(EmploymentStatus::parse("fired"), None);
        assert_eq!(EmploymentStatus::Resigned.as_str(), "resigned");
    }
}
