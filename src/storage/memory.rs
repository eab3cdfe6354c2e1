use crate::domain::conflict::has_email_conflict;
use crate::domain::user::{NewUser, User};
use crate::error::{AppError, Result};
use crate::storage::UserRepository;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Inner {
    users: BTreeMap<i64, User>,
    // Last id handed out. Only ever grows, so ids are not reused after a delete.
    last_id: i64,
}

impl Inner {
    fn email_taken(&self, email: &str, exclude: Option<i64>) -> bool {
        has_email_conflict(self.users.values().map(|u| (u.id, u.email.as_str())), email, exclude)
    }
}

/// User records kept in process memory behind a single lock.
///
/// Readers share the lock; every mutation holds it exclusively for the whole
/// check-then-write sequence.
#[derive(Clone, Debug, Default)]
pub struct InMemoryUserRepository {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryUserRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn list(&self) -> Result<Vec<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.values().cloned().collect())
    }

    async fn get(&self, id: i64) -> Result<User> {
        let inner = self.inner.read().await;
        inner.users.get(&id).cloned().ok_or(AppError::NotFound)
    }

    async fn insert(&self, candidate: NewUser) -> Result<User> {
        let mut inner = self.inner.write().await;
        if inner.email_taken(&candidate.email, None) {
            return Err(AppError::Conflict);
        }

        inner.last_id = inner.last_id.checked_add(1).ok_or_else(|| AppError::Internal("user id space exhausted".into()))?;
        let user = User::new(inner.last_id, candidate, OffsetDateTime::now_utc());
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn replace(&self, id: i64, candidate: NewUser) -> Result<User> {
        let mut inner = self.inner.write().await;
        if !inner.users.contains_key(&id) {
            return Err(AppError::NotFound);
        }
        if inner.email_taken(&candidate.email, Some(id)) {
            return Err(AppError::Conflict);
        }

        let user = inner.users.get_mut(&id).ok_or(AppError::NotFound)?;
        user.apply(candidate, OffsetDateTime::now_utc());
        Ok(user.clone())
    }

    async fn remove(&self, id: i64) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.users.remove(&id).map(|_| ()).ok_or(AppError::NotFound)
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
