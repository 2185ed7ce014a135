//! Domain repository for ephemail.

use sqlx::SqlitePool;

use super::types::Domain;
use crate::{EphemailError, Result};

/// Repository for domain registry operations.
pub struct DomainRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> DomainRepository<'a> {
    /// Create a new DomainRepository with the given database pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Register a new domain.
    ///
    /// Fails with `Duplicate` if the name is already registered, in any
    /// letter case.
    pub async fn create(&self, name: &str) -> Result<Domain> {
        let id: i64 = sqlx::query_scalar("INSERT INTO domains (name) VALUES (?) RETURNING id")
            .bind(name)
            .fetch_one(self.pool)
            .await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| EphemailError::NotFound("domain".to_string()))
    }

    /// Get a domain by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Domain>> {
        let result =
            sqlx::query_as::<_, Domain>("SELECT id, name, created_at FROM domains WHERE id = ?")
                .bind(id)
                .fetch_optional(self.pool)
                .await?;

        Ok(result)
    }

    /// Find a domain by exact name (case-insensitive).
    pub async fn find_by_name(&self, name: &str) -> Result<Option<Domain>> {
        let result =
            sqlx::query_as::<_, Domain>("SELECT id, name, created_at FROM domains WHERE name = ?")
                .bind(name)
                .fetch_optional(self.pool)
                .await?;

        Ok(result)
    }

    /// List all registered domains, ordered by name.
    pub async fn list_all(&self) -> Result<Vec<Domain>> {
        let domains =
            sqlx::query_as::<_, Domain>("SELECT id, name, created_at FROM domains ORDER BY name")
                .fetch_all(self.pool)
                .await?;

        Ok(domains)
    }

    /// Delete a domain by ID. Cascades to its mappings.
    ///
    /// Returns true if a domain was deleted, false if not found.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM domains WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    async fn setup_db() -> Database {
        Database::open_in_memory().await.unwrap()
    }

    #[tokio::test]
    async fn test_create_domain() {
        let db = setup_db().await;
        let repo = DomainRepository::new(db.pool());

        let domain = repo.create("example.org").await.unwrap();

        assert_eq!(domain.id, 1);
        assert_eq!(domain.name, "example.org");
        assert!(!domain.created_at.is_empty());
    }

    #[tokio::test]
    async fn test_create_duplicate_name() {
        let db = setup_db().await;
        let repo = DomainRepository::new(db.pool());

        repo.create("example.org").await.unwrap();
        let result = repo.create("example.org").await;

        assert!(matches!(result, Err(EphemailError::Duplicate(_))));
    }

    #[tokio::test]
    async fn test_create_duplicate_name_different_case() {
        let db = setup_db().await;
        let repo = DomainRepository::new(db.pool());

        repo.create("example.org").await.unwrap();
        let result = repo.create("EXAMPLE.ORG").await;

        assert!(matches!(result, Err(EphemailError::Duplicate(_))));
    }

    #[tokio::test]
    async fn test_find_by_name_round_trip() {
        let db = setup_db().await;
        let repo = DomainRepository::new(db.pool());

        let created = repo.create("example.org").await.unwrap();

        let loaded = repo.find_by_name("example.org").await.unwrap();
        assert_eq!(loaded, Some(created));
    }

    #[tokio::test]
    async fn test_find_by_name_not_found() {
        let db = setup_db().await;
        let repo = DomainRepository::new(db.pool());

        repo.create("example.org").await.unwrap();

        let loaded = repo.find_by_name("example.com").await.unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_find_by_name_case_insensitive() {
        let db = setup_db().await;
        let repo = DomainRepository::new(db.pool());

        repo.create("Example.Org").await.unwrap();

        assert!(repo.find_by_name("example.org").await.unwrap().is_some());
        assert!(repo.find_by_name("EXAMPLE.ORG").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_crud_lifecycle() {
        let db = setup_db().await;
        let repo = DomainRepository::new(db.pool());

        // CREATE
        let domain = repo.create("example.com").await.unwrap();

        // READ
        let found = repo.get_by_id(domain.id).await.unwrap();
        assert_eq!(found, Some(domain.clone()));

        // There is no update because domains are immutable

        // DELETE
        assert!(repo.delete(domain.id).await.unwrap());
        assert!(repo.get_by_id(domain.id).await.unwrap().is_none());

        // Deleting again returns false
        assert!(!repo.delete(domain.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_all() {
        let db = setup_db().await;
        let repo = DomainRepository::new(db.pool());

        repo.create("zeta.example").await.unwrap();
        repo.create("alpha.example").await.unwrap();

        let all = repo.list_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "alpha.example");
        assert_eq!(all[1].name, "zeta.example");
    }
}
