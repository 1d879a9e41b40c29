use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AppConfig;
use crate::repository::{
    AlumniStore, EmploymentStore, PgAlumniStore, PgEmploymentStore, PgPinger, PgUserStore, Pinger,
    UserStore,
};

/// Shared state handed to every handler. Stores are trait objects so the
/// integration tests can run the full router against in-memory backends.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserStore>,
    pub alumni: Arc<dyn AlumniStore>,
    pub employment: Arc<dyn EmploymentStore>,
    pub pinger: Arc<dyn Pinger>,
}

impl AppState {
    pub fn new(
        config: Arc<AppConfig>,
        users: Arc<dyn UserStore>,
        alumni: Arc<dyn AlumniStore>,
        employment: Arc<dyn EmploymentStore>,
        pinger: Arc<dyn Pinger>,
    ) -> Self {
        Self {
            config,
            users,
            alumni,
            employment,
            pinger,
        }
    }

    pub fn with_postgres(config: Arc<AppConfig>, pool: PgPool) -> Self {
        Self {
            config,
            users: Arc::new(PgUserStore::new(pool.clone())),
            alumni: Arc::new(PgAlumniStore::new(pool.clone())),
            employment: Arc::new(PgEmploymentStore::new(pool.clone())),
            pinger: Arc::new(PgPinger::new(pool)),
        }
    }
}
