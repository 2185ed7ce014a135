//! Forwarder for ephemail.
//!
//! Turns a matched mapping into an outbound relay of the message to the
//! owner's real mailbox: resolve the owner, rewrite the recipient, hand
//! the message to the transport.

use std::sync::Arc;

use tracing::debug;

use crate::db::{Database, DbPool, User, UserRepository};
use crate::registry::Mapping;
use crate::{EphemailError, Result};

use super::message::Email;
use super::transport::MailTransport;

/// Forwards matched messages to the owning user's mailbox.
#[derive(Clone)]
pub struct Forwarder {
    pool: DbPool,
    transport: Arc<dyn MailTransport>,
}

impl Forwarder {
    /// Create a new Forwarder over the given database and transport.
    pub fn new(db: &Database, transport: Arc<dyn MailTransport>) -> Self {
        Self {
            pool: db.pool().clone(),
            transport,
        }
    }

    /// Forward a message that matched the given mapping.
    ///
    /// Resolves the owning user by reverse lookup on the mapping identity,
    /// overwrites the message's recipient with the owner's real address,
    /// and relays the rewritten message. Returns the failure to the caller
    /// instead of deciding the logging policy here.
    ///
    /// # Errors
    ///
    /// - `MissingOwner` when no user owns the mapping; nothing is sent.
    /// - `Transport` when the relay session fails or times out.
    pub async fn forward_message(&self, message: &mut Email, mapping: &Mapping) -> Result<()> {
        let user = self.load_owner(mapping).await?;

        debug!(
            mapping = mapping.id,
            user = user.id,
            "rewriting recipient and relaying"
        );

        message.set_primary_recipient(user.email_address.as_str());
        self.transport.relay(message).await
    }

    /// Resolve the user that owns the given mapping.
    async fn load_owner(&self, mapping: &Mapping) -> Result<User> {
        UserRepository::new(&self.pool)
            .find_by_mapping(mapping.id)
            .await?
            .ok_or(EphemailError::MissingOwner(mapping.id))
    }
}
