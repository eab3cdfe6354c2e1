use crate::domain::user::User;
use time::OffsetDateTime;

/// Row shape of the `userz` table.
#[derive(Debug, sqlx::FromRow)]
pub struct UserRecord {
    pub id: i64,
    pub email: String,
    pub fullname: String,
    pub password: String,
    pub createdat: OffsetDateTime,
    pub lastupdatedat: OffsetDateTime,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            email: record.email,
            full_name: record.fullname,
            password: record.password,
            created_at: record.createdat,
            last_updated_at: record.lastupdatedat,
        }
    }
}
