pub mod conflict;
pub mod user;
pub mod validation;
