//! Mapping repository for ephemail.

use sqlx::SqlitePool;

use super::types::Mapping;
use crate::{EphemailError, Result};

/// Repository for disposable address mappings.
pub struct MappingRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> MappingRepository<'a> {
    /// Create a new MappingRepository with the given database pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new mapping under the given domain.
    ///
    /// Fails with `Duplicate` if the (local part, domain) pair already
    /// exists.
    pub async fn create(&self, local_part: &str, domain_id: i64) -> Result<Mapping> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO mappings (local_part, domain_id) VALUES (?, ?) RETURNING id",
        )
        .bind(local_part)
        .bind(domain_id)
        .fetch_one(self.pool)
        .await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| EphemailError::NotFound("mapping".to_string()))
    }

    /// Get a mapping by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Mapping>> {
        let result = sqlx::query_as::<_, Mapping>(
            "SELECT id, local_part, domain_id, created_at FROM mappings WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(result)
    }

    /// Find a mapping by exact (local part, domain) pair.
    ///
    /// The local part comparison is case-sensitive.
    pub async fn find_by_address(&self, local_part: &str, domain_id: i64) -> Result<Option<Mapping>> {
        let result = sqlx::query_as::<_, Mapping>(
            "SELECT id, local_part, domain_id, created_at
             FROM mappings
             WHERE local_part = ? AND domain_id = ?",
        )
        .bind(local_part)
        .bind(domain_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(result)
    }

    /// List all mappings under a domain, ordered by local part.
    pub async fn list_for_domain(&self, domain_id: i64) -> Result<Vec<Mapping>> {
        let mappings = sqlx::query_as::<_, Mapping>(
            "SELECT id, local_part, domain_id, created_at
             FROM mappings
             WHERE domain_id = ?
             ORDER BY local_part",
        )
        .bind(domain_id)
        .fetch_all(self.pool)
        .await?;

        Ok(mappings)
    }

    /// Delete a mapping by ID.
    ///
    /// Returns true if a mapping was deleted, false if not found.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM mappings WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
