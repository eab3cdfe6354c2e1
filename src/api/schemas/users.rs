use crate::domain::user::{NewUser, User as DomainUser};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Request body for creating or replacing a user. Missing fields decode as empty strings
/// and are then rejected by validation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct UserPayload {
    #[serde(default)]
    pub email: String,
    #[serde(default, alias = "fullName")]
    pub full_name: String,
    #[serde(default)]
    pub password: String,
}

impl From<UserPayload> for NewUser {
    fn from(payload: UserPayload) -> Self {
        Self { email: payload.email, full_name: payload.full_name, password: payload.password }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct User {
    pub id: i64,
    pub email: String,
    pub full_name: String,
    pub password: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub last_updated_at: OffsetDateTime,
}

impl From<DomainUser> for User {
    fn from(user: DomainUser) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            password: user.password,
            created_at: user.created_at,
            last_updated_at: user.last_updated_at,
        }
    }
}
