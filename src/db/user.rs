//! User model for ephemail.
//!
//! A user is the owner of zero or more disposable addresses. The only
//! attribute the relay cares about is the real mailbox that forwarded
//! mail is delivered to.

/// A registered user.
///
/// Users are immutable once created; changing a mailbox means deleting
/// the user and registering a new one.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct User {
    /// Unique user ID.
    pub id: i64,
    /// The user's real mailbox address.
    pub email_address: String,
    /// Account creation timestamp.
    pub created_at: String,
}

/// Data for creating a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// The user's real mailbox address.
    pub email_address: String,
}

impl NewUser {
    /// Create a new user record.
    pub fn new(email_address: impl Into<String>) -> Self {
        Self {
            email_address: email_address.into(),
        }
    }
}
