use time::OffsetDateTime;

/// A stored user record. `id` and `created_at` never change once assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub full_name: String,
    pub password: String,
    pub created_at: OffsetDateTime,
    pub last_updated_at: OffsetDateTime,
}

/// The client-supplied fields of a user, used for both creation and replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub full_name: String,
    pub password: String,
}

impl User {
    #[must_use]
    pub fn new(id: i64, candidate: NewUser, now: OffsetDateTime) -> Self {
        Self {
            id,
            email: candidate.email,
            full_name: candidate.full_name,
            password: candidate.password,
            created_at: now,
            last_updated_at: now,
        }
    }

    /// Overwrites every mutable field with the candidate's and bumps `last_updated_at`.
    pub fn apply(&mut self, candidate: NewUser, now: OffsetDateTime) {
        self.email = candidate.email;
        self.full_name = candidate.full_name;
        self.password = candidate.password;
        self.last_updated_at = now;
    }
}
