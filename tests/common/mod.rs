//! Shared harness: the full router wired to the in-memory store backend,
//! plus request and seeding helpers.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::NaiveDate;
use serde_json::Value;
use tower::ServiceExt;

use alumni_api::auth::issue_token;
use alumni_api::config::{AppConfig, AuthConfig, DatabaseConfig, QueryConfig, ServerConfig};
use alumni_api::models::{
    Alumni, CreateAlumniRequest, CreateEmploymentRequest, EmploymentRecord, EmploymentStatus,
    Role, User,
};
use alumni_api::repository::{AlumniStore, EmploymentStore, UserStore};
use alumni_api::state::AppState;
use alumni_api::testing::MemoryStore;

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub config: Arc<AppConfig>,
}

pub fn test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig { port: 0 },
        database: DatabaseConfig {
            url: "postgres://unused".into(),
            max_connections: 1,
        },
        auth: AuthConfig {
            jwt_secret: "integration-test-secret-0123456789abcdef".into(),
            jwt_expire_hours: 24,
            issuer: "alumni-api".into(),
        },
        query: QueryConfig {
            default_page_limit: 10,
            max_page_limit: 100,
        },
    }
}

pub fn test_app() -> TestApp {
    let config = Arc::new(test_config());
    let store = MemoryStore::shared();
    let state = AppState::new(
        config.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
    );
    TestApp {
        router: alumni_api::app(state),
        store,
        config,
    }
}

pub const TEST_PASSWORD: &str = "password123";

impl TestApp {
    /// Seed a user directly in storage and hand back a valid token for it.
    pub async fn seed_user(&self, username: &str, role: Role) -> (User, String) {
        // low bcrypt cost keeps the suite fast
        let hash = bcrypt::hash(TEST_PASSWORD, 4).unwrap();
        let email = format!("{}@example.com", username);
        let user = UserStore::create(self.store.as_ref(), username, &email, role, &hash)
            .await
            .unwrap();
        let token = issue_token(&user, &self.config.auth).unwrap();
        (user, token)
    }

    pub async fn seed_alumni(
        &self,
        student_number: &str,
        full_name: &str,
        user_id: Option<i64>,
    ) -> Alumni {
        AlumniStore::create(
            self.store.as_ref(),
            &CreateAlumniRequest {
                student_number: student_number.into(),
                full_name: full_name.into(),
                major: "Informatika".into(),
                cohort_year: 2018,
                graduation_year: 2022,
                email: format!("{}@alumni.example.com", student_number),
                phone: None,
                address: None,
                user_id,
            },
        )
        .await
        .unwrap()
    }

    pub async fn seed_employment(&self, alumni_id: i64, company: &str) -> EmploymentRecord {
        EmploymentStore::create(
            self.store.as_ref(),
            &CreateEmploymentRequest {
                alumni_id,
                company: company.into(),
                position: "Engineer".into(),
                industry: "Technology".into(),
                location: "Jakarta".into(),
                salary_range: None,
                start_date: NaiveDate::from_ymd_opt(2023, 1, 9).unwrap(),
                end_date: None,
                status: EmploymentStatus::Aktif,
                description: None,
            },
        )
        .await
        .unwrap()
    }

    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request("GET", uri, token, None).await
    }

    pub async fn post(
        &self,
        uri: &str,
        token: Option<&str>,
        body: Value,
    ) -> (StatusCode, Value) {
        self.request("POST", uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request("PUT", uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request("DELETE", uri, token, None).await
    }
}
