//! User repository for ephemail.
//!
//! Besides plain CRUD, this repository owns the two ownership queries the
//! relay depends on: assigning a disposable address to a user, and the
//! reverse lookup from a mapping to its owning user.

use sqlx::SqlitePool;

use super::user::{NewUser, User};
use crate::{EphemailError, Result};

/// Repository for user operations.
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Create a new UserRepository with the given database pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new user in the database.
    ///
    /// Returns the created user with the assigned ID.
    pub async fn create(&self, new_user: &NewUser) -> Result<User> {
        let id: i64 =
            sqlx::query_scalar("INSERT INTO users (email_address) VALUES (?) RETURNING id")
                .bind(&new_user.email_address)
                .fetch_one(self.pool)
                .await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| EphemailError::NotFound("user".to_string()))
    }

    /// Get a user by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<User>> {
        let result = sqlx::query_as::<_, User>(
            "SELECT id, email_address, created_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(result)
    }

    /// Get a user by mailbox address (exact match).
    pub async fn find_by_email(&self, email_address: &str) -> Result<Option<User>> {
        let result = sqlx::query_as::<_, User>(
            "SELECT id, email_address, created_at FROM users WHERE email_address = ?",
        )
        .bind(email_address)
        .fetch_optional(self.pool)
        .await?;

        Ok(result)
    }

    /// Find the user that owns the given mapping.
    ///
    /// This is the reverse lookup the forwarder runs for every routed
    /// message. A mapping has at most one owner; none is returned when the
    /// mapping is unclaimed or has been revoked.
    pub async fn find_by_mapping(&self, mapping_id: i64) -> Result<Option<User>> {
        let result = sqlx::query_as::<_, User>(
            "SELECT u.id, u.email_address, u.created_at
             FROM users u
             JOIN user_mappings um ON um.user_id = u.id
             WHERE um.mapping_id = ?",
        )
        .bind(mapping_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(result)
    }

    /// Assign ownership of a mapping to a user.
    ///
    /// Fails with `Duplicate` if the mapping is already claimed.
    pub async fn assign_mapping(&self, user_id: i64, mapping_id: i64) -> Result<()> {
        sqlx::query("INSERT INTO user_mappings (user_id, mapping_id) VALUES (?, ?)")
            .bind(user_id)
            .bind(mapping_id)
            .execute(self.pool)
            .await?;
        Ok(())
    }

    /// Release ownership of a mapping.
    ///
    /// Returns true if an assignment was removed.
    pub async fn release_mapping(&self, mapping_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM user_mappings WHERE mapping_id = ?")
            .bind(mapping_id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a user by ID.
    ///
    /// Returns true if a user was deleted, false if not found.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count all users.
    pub async fn count(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool)
            .await?;
        Ok(count.0)
    }
}
