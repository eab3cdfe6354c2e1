use crate::domain::conflict::has_email_conflict;
use crate::domain::user::{NewUser, User};
use crate::error::{AppError, Result};
use crate::storage::records::UserRecord;
use crate::storage::{DbPool, UserRepository};
use async_trait::async_trait;
use sqlx::{PgConnection, Postgres, Transaction};
use time::OffsetDateTime;

/// User records stored in the `userz` table.
///
/// Ids come from the table's sequence. Every mutation runs in a transaction holding a
/// table lock that conflicts with itself, so the email check and the write cannot
/// interleave with another writer.
#[derive(Clone, Debug)]
pub struct PgUserRepository {
    pool: DbPool,
}

impl PgUserRepository {
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn begin_exclusive(&self) -> Result<Transaction<'static, Postgres>> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("LOCK TABLE userz IN SHARE ROW EXCLUSIVE MODE").execute(&mut *tx).await?;
        Ok(tx)
    }

    async fn email_taken(conn: &mut PgConnection, email: &str, exclude: Option<i64>) -> Result<bool> {
        let holders: Vec<(i64, String)> =
            sqlx::query_as("SELECT id, email FROM userz WHERE email = $1").bind(email).fetch_all(conn).await?;

        Ok(has_email_conflict(holders.iter().map(|(id, e)| (*id, e.as_str())), email, exclude))
    }
}

// 23505 is unique_violation; the lock makes this unreachable unless another client writes the table.
fn map_write_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e
        && db_err.code().as_deref() == Some("23505")
    {
        return AppError::Conflict;
    }
    AppError::Database(e)
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn list(&self) -> Result<Vec<User>> {
        let records = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, email, fullname, password, createdat, lastupdatedat
            FROM userz
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records.into_iter().map(Into::into).collect())
    }

    async fn get(&self, id: i64) -> Result<User> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, email, fullname, password, createdat, lastupdatedat
            FROM userz
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        record.map(Into::into).ok_or(AppError::NotFound)
    }

    async fn insert(&self, candidate: NewUser) -> Result<User> {
        let mut tx = self.begin_exclusive().await?;
        if Self::email_taken(&mut *tx, &candidate.email, None).await? {
            return Err(AppError::Conflict);
        }

        let now = OffsetDateTime::now_utc();
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO userz (email, fullname, password, createdat, lastupdatedat)
            VALUES ($1, $2, $3, $4, $4)
            RETURNING id, email, fullname, password, createdat, lastupdatedat
            "#,
        )
        .bind(&candidate.email)
        .bind(&candidate.full_name)
        .bind(&candidate.password)
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_write_error)?;

        tx.commit().await?;
        Ok(record.into())
    }

    async fn replace(&self, id: i64, candidate: NewUser) -> Result<User> {
        let mut tx = self.begin_exclusive().await?;
        let exists: Option<(i64,)> =
            sqlx::query_as("SELECT id FROM userz WHERE id = $1").bind(id).fetch_optional(&mut *tx).await?;
        if exists.is_none() {
            return Err(AppError::NotFound);
        }
        if Self::email_taken(&mut *tx, &candidate.email, Some(id)).await? {
            return Err(AppError::Conflict);
        }

        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            UPDATE userz
            SET email = $2, fullname = $3, password = $4, lastupdatedat = $5
            WHERE id = $1
            RETURNING id, email, fullname, password, createdat, lastupdatedat
            "#,
        )
        .bind(id)
        .bind(&candidate.email)
        .bind(&candidate.full_name)
        .bind(&candidate.password)
        .bind(OffsetDateTime::now_utc())
        .fetch_one(&mut *tx)
        .await
        .map_err(map_write_error)?;

        tx.commit().await?;
        Ok(record.into())
    }

    async fn remove(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM userz WHERE id = $1").bind(id).execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
