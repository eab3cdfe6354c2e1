use crate::config::{StorageBackend, StorageConfig};
use crate::domain::user::{NewUser, User};
use crate::error::Result;
use anyhow::Context;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use std::sync::Arc;

pub mod memory;
pub mod postgres;
pub mod records;

pub use memory::InMemoryUserRepository;
pub use postgres::PgUserRepository;

pub type DbPool = Pool<Postgres>;

/// The authoritative collection of user records.
///
/// `insert` and `replace` check email uniqueness and write in one atomic step, so two
/// concurrent requests can never both claim the same email.
#[async_trait]
pub trait UserRepository: Send + Sync + std::fmt::Debug {
    /// All records in ascending id order.
    async fn list(&self) -> Result<Vec<User>>;

    /// # Errors
    /// `AppError::NotFound` if no record has this id.
    async fn get(&self, id: i64) -> Result<User>;

    /// Assigns the next id and stores the candidate.
    ///
    /// # Errors
    /// `AppError::Conflict` if another record already has the candidate's email.
    async fn insert(&self, candidate: NewUser) -> Result<User>;

    /// Overwrites every field except `id` and `created_at`.
    ///
    /// # Errors
    /// `AppError::NotFound` for an unknown id, `AppError::Conflict` if a different record
    /// already has the candidate's email.
    async fn replace(&self, id: i64, candidate: NewUser) -> Result<User>;

    /// # Errors
    /// `AppError::NotFound` if no record has this id.
    async fn remove(&self, id: i64) -> Result<()>;

    /// Cheap connectivity check used by the readiness probe.
    async fn ping(&self) -> Result<()>;
}

/// Initializes the database connection pool.
///
/// # Errors
/// Returns `sqlx::Error` if the connection fails.
pub async fn init_pool(database_url: &str, max_connections: u32) -> std::result::Result<DbPool, sqlx::Error> {
    PgPoolOptions::new().max_connections(max_connections).connect(database_url).await
}

/// Applies the embedded migrations.
///
/// # Errors
/// Returns an error if a migration fails to apply.
pub async fn run_migrations(pool: &DbPool) -> std::result::Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!().run(pool).await
}

/// Builds the repository selected by configuration.
///
/// # Errors
/// Returns an error if the postgres backend is chosen without a URL, or if connecting or
/// migrating fails.
pub async fn connect(config: &StorageConfig) -> anyhow::Result<Arc<dyn UserRepository>> {
    match config.backend {
        StorageBackend::Memory => {
            tracing::info!(backend = "memory", "Using in-process user store");
            Ok(Arc::new(InMemoryUserRepository::new()))
        }
        StorageBackend::Postgres => {
            let url = config.database_url.as_deref().context("the postgres backend requires --database-url")?;
            let pool = init_pool(url, config.db_max_connections).await.context("connect to database")?;
            run_migrations(&pool).await.context("run database migrations")?;
            tracing::info!(backend = "postgres", "Using Postgres user store");
            Ok(Arc::new(PgUserRepository::new(pool)))
        }
    }
}
