use crate::domain::user::{NewUser, User};
use crate::error::{AppError, Result};
use crate::storage::UserRepository;
use opentelemetry::{KeyValue, global, metrics::Counter};
use std::sync::Arc;

#[derive(Clone, Debug)]
struct Metrics {
    users_created_total: Counter<u64>,
    users_updated_total: Counter<u64>,
    users_deleted_total: Counter<u64>,
    rejections_total: Counter<u64>,
}

impl Metrics {
    fn new() -> Self {
        let meter = global::meter("user-service");
        Self {
            users_created_total: meter
                .u64_counter("users_created_total")
                .with_description("Total number of users created")
                .build(),
            users_updated_total: meter
                .u64_counter("users_updated_total")
                .with_description("Total number of users updated")
                .build(),
            users_deleted_total: meter
                .u64_counter("users_deleted_total")
                .with_description("Total number of users deleted")
                .build(),
            rejections_total: meter
                .u64_counter("user_rejections_total")
                .with_description("Submitted users rejected by validation or email conflict")
                .build(),
        }
    }

    fn record_rejection(&self, err: &AppError) {
        let reason = match err {
            AppError::Validation(kind) => kind.reason(),
            AppError::Conflict => "email_conflict",
            _ => return,
        };
        self.rejections_total.add(1, &[KeyValue::new("reason", reason)]);
    }
}

/// Validates submitted users and applies them to the store.
#[derive(Clone, Debug)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
    metrics: Metrics,
}

impl UserService {
    #[must_use]
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo, metrics: Metrics::new() }
    }

    #[tracing::instrument(skip(self), err(level = "warn"))]
    pub async fn list(&self) -> Result<Vec<User>> {
        self.repo.list().await
    }

    #[tracing::instrument(skip(self), fields(user.id = id), err(level = "debug"))]
    pub async fn get(&self, id: i64) -> Result<User> {
        self.repo.get(id).await
    }

    #[tracing::instrument(skip(self, candidate), fields(user.id = tracing::field::Empty), err(level = "warn"))]
    pub async fn create(&self, candidate: NewUser) -> Result<User> {
        let result = match candidate.validate() {
            Ok(()) => self.repo.insert(candidate).await,
            Err(e) => Err(e.into()),
        };

        match result {
            Ok(user) => {
                tracing::Span::current().record("user.id", user.id);
                tracing::info!("User created");
                self.metrics.users_created_total.add(1, &[]);
                Ok(user)
            }
            Err(e) => {
                self.metrics.record_rejection(&e);
                Err(e)
            }
        }
    }

    #[tracing::instrument(skip(self, candidate), fields(user.id = id), err(level = "warn"))]
    pub async fn update(&self, id: i64, candidate: NewUser) -> Result<User> {
        // An unknown id is reported ahead of anything wrong with the candidate.
        self.repo.get(id).await?;

        let result = match candidate.validate() {
            Ok(()) => self.repo.replace(id, candidate).await,
            Err(e) => Err(e.into()),
        };

        match result {
            Ok(user) => {
                tracing::info!("User updated");
                self.metrics.users_updated_total.add(1, &[]);
                Ok(user)
            }
            Err(e) => {
                self.metrics.record_rejection(&e);
                Err(e)
            }
        }
    }

    #[tracing::instrument(skip(self), fields(user.id = id), err(level = "warn"))]
    pub async fn delete(&self, id: i64) -> Result<()> {
        self.repo.remove(id).await?;
        tracing::info!("User deleted");
        self.metrics.users_deleted_total.add(1, &[]);
        Ok(())
    }
}
