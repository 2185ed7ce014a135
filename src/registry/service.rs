//! Registry service for ephemail.
//!
//! High-level administrative operations over the domain and mapping
//! repositories: registering receiving domains, provisioning disposable
//! addresses for users, and revoking them again. Input validation lives
//! here so the repositories stay thin.

use tracing::info;

use crate::db::{Database, NewUser, User, UserRepository};
use crate::{EphemailError, Result};

use super::domain_repository::DomainRepository;
use super::mapping_repository::MappingRepository;
use super::types::{Domain, Mapping};

/// Validate a domain name for registration.
fn validate_domain_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(EphemailError::Validation(
            "domain name must not be empty".to_string(),
        ));
    }
    if name.contains('@') || name.chars().any(char::is_whitespace) {
        return Err(EphemailError::Validation(format!(
            "invalid domain name: {name}"
        )));
    }
    if !name.contains('.') {
        return Err(EphemailError::Validation(format!(
            "domain name must contain a dot: {name}"
        )));
    }
    Ok(())
}

/// Validate a local part for provisioning.
fn validate_local_part(local_part: &str) -> Result<()> {
    if local_part.is_empty() {
        return Err(EphemailError::Validation(
            "local part must not be empty".to_string(),
        ));
    }
    if local_part.contains('@') || local_part.chars().any(char::is_whitespace) {
        return Err(EphemailError::Validation(format!(
            "invalid local part: {local_part}"
        )));
    }
    Ok(())
}

/// Validate a user mailbox address.
fn validate_mailbox(address: &str) -> Result<()> {
    match address.rsplit_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(EphemailError::Validation(format!(
            "invalid mailbox address: {address}"
        ))),
    }
}

/// Service for administrative registry operations.
pub struct RegistryService<'a> {
    db: &'a Database,
}

impl<'a> RegistryService<'a> {
    /// Create a new RegistryService with the given database reference.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Register a new receiving domain.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a malformed name and `Duplicate` if the
    /// name is already registered.
    pub async fn register_domain(&self, name: &str) -> Result<Domain> {
        let name = name.trim();
        validate_domain_name(name)?;

        let domain = DomainRepository::new(self.db.pool()).create(name).await?;
        info!(domain = %domain.name, id = domain.id, "registered domain");
        Ok(domain)
    }

    /// Register a new user with their real mailbox address.
    pub async fn register_user(&self, email_address: &str) -> Result<User> {
        let email_address = email_address.trim();
        validate_mailbox(email_address)?;

        let user = UserRepository::new(self.db.pool())
            .create(&NewUser::new(email_address))
            .await?;
        info!(user = user.id, "registered user");
        Ok(user)
    }

    /// Provision a disposable address for a user.
    ///
    /// Creates the mapping under the named domain and assigns ownership
    /// to the user in one go.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the domain or user does not exist,
    /// `Validation` for a malformed local part, and `Duplicate` if the
    /// address is already taken.
    pub async fn provision_address(
        &self,
        user_id: i64,
        local_part: &str,
        domain_name: &str,
    ) -> Result<Mapping> {
        let local_part = local_part.trim();
        validate_local_part(local_part)?;

        let user_repo = UserRepository::new(self.db.pool());
        user_repo
            .get_by_id(user_id)
            .await?
            .ok_or_else(|| EphemailError::NotFound("user".to_string()))?;

        let domain = DomainRepository::new(self.db.pool())
            .find_by_name(domain_name.trim())
            .await?
            .ok_or_else(|| EphemailError::NotFound("domain".to_string()))?;

        let mapping = MappingRepository::new(self.db.pool())
            .create(local_part, domain.id)
            .await?;
        user_repo.assign_mapping(user_id, mapping.id).await?;

        info!(
            address = %mapping.address(&domain.name),
            user = user_id,
            "provisioned address"
        );
        Ok(mapping)
    }

    /// Revoke a disposable address.
    ///
    /// Deletes the mapping; ownership rows are removed by cascade.
    /// Lookups for the address simply stop returning it.
    pub async fn revoke_address(&self, mapping_id: i64) -> Result<bool> {
        let deleted = MappingRepository::new(self.db.pool())
            .delete(mapping_id)
            .await?;
        if deleted {
            info!(mapping = mapping_id, "revoked address");
        }
        Ok(deleted)
    }
}
