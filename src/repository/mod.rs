pub mod alumni;
pub mod employment;
pub mod users;

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;

/// Errors from the storage boundary. SQL details never reach clients; the
/// ApiError conversion logs and collapses these to a 500.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid stored value: {0}")]
    Decode(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Backend reachability probe for the health endpoint.
#[async_trait]
pub trait Pinger: Send + Sync {
    async fn ping(&self) -> Result<(), StoreError>;
}

pub struct PgPinger {
    pool: PgPool,
}

impl PgPinger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Pinger for PgPinger {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

pub use alumni::{AlumniStore, PgAlumniStore, ALUMNI_SORT_KEYS};
pub use employment::{
    EmploymentStore, PgEmploymentStore, EMPLOYMENT_SORT_KEYS, EMPLOYMENT_TRASH_SORT_KEYS,
};
pub use users::{PgUserStore, UserStore};
