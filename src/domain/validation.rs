use crate::domain::user::NewUser;
use std::ops::RangeInclusive;
use thiserror::Error;

pub const EMAIL_LENGTH: RangeInclusive<usize> = 5..=256;
pub const FULL_NAME_MIN_EXCLUSIVE: usize = 3;
pub const PASSWORD_LENGTH: RangeInclusive<usize> = 8..=256;
pub const PASSWORD_CHARSET: RangeInclusive<u8> = b'!'..=b'~';

/// A field-level rejection of a submitted user.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("incorrect email input")]
    InvalidEmail,
    #[error("incorrect fullName input")]
    InvalidFullName,
    #[error("incorrect password input")]
    InvalidPassword,
}

impl ValidationError {
    #[must_use]
    pub const fn details(self) -> &'static str {
        match self {
            Self::InvalidEmail => "email must have 5-256 chars and contain @",
            Self::InvalidFullName => "fullName must have more than 3 chars",
            Self::InvalidPassword => "pass must have 8-256 chars and contain only ASCII",
        }
    }

    /// Stable label used for metrics.
    #[must_use]
    pub const fn reason(self) -> &'static str {
        match self {
            Self::InvalidEmail => "invalid_email",
            Self::InvalidFullName => "invalid_full_name",
            Self::InvalidPassword => "invalid_password",
        }
    }
}

/// # Errors
/// Returns `InvalidEmail` unless the email has 5 to 256 characters and contains `@`.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if EMAIL_LENGTH.contains(&email.chars().count()) && email.contains('@') {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail)
    }
}

/// # Errors
/// Returns `InvalidFullName` unless the name has more than 3 characters.
pub fn validate_full_name(full_name: &str) -> Result<(), ValidationError> {
    if full_name.chars().count() > FULL_NAME_MIN_EXCLUSIVE {
        Ok(())
    } else {
        Err(ValidationError::InvalidFullName)
    }
}

/// # Errors
/// Returns `InvalidPassword` unless the password has 8 to 256 characters, all printable
/// ASCII excluding space.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    // Any non-ASCII byte falls outside the charset, so byte length equals char length here.
    if PASSWORD_LENGTH.contains(&password.len()) && password.bytes().all(|b| PASSWORD_CHARSET.contains(&b)) {
        Ok(())
    } else {
        Err(ValidationError::InvalidPassword)
    }
}

impl NewUser {
    /// Checks email, then full name, then password, reporting the first failure.
    ///
    /// # Errors
    /// Returns the first `ValidationError` encountered.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_email(&self.email)?;
        validate_full_name(&self.full_name)?;
        validate_password(&self.password)
    }
}
