//! Mail filter for ephemail.
//!
//! The route-or-drop decision for one inbound message: split the primary
//! recipient into local part and domain, look both up, and hand matched
//! messages to the forwarder. Every miss is a normal outcome, not an
//! error; nothing is ever bounced back at the sender.

use tracing::{debug, error, info, warn};

use crate::db::{Database, DbPool};
use crate::registry::{DomainRepository, MappingRepository};
use crate::{EphemailError, Result};

use super::forwarder::Forwarder;
use super::message::{split_address, Email};

/// Why a message was dropped instead of forwarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// The message has no recipient at all.
    MissingRecipient,
    /// The primary recipient is not a single `local@domain` mailbox.
    MalformedRecipient,
    /// The recipient's domain is not registered here.
    UnknownDomain,
    /// The domain is registered but no mapping exists for the local part.
    UnknownMapping,
    /// A mapping matched but no user owns it.
    MissingOwner,
    /// The owner was resolved but the relay attempt failed.
    DeliveryFailed,
}

impl DropReason {
    /// Short name for logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            DropReason::MissingRecipient => "missing recipient",
            DropReason::MalformedRecipient => "malformed recipient",
            DropReason::UnknownDomain => "unknown domain",
            DropReason::UnknownMapping => "unknown mapping",
            DropReason::MissingOwner => "missing owner",
            DropReason::DeliveryFailed => "delivery failed",
        }
    }
}

/// Outcome of one filtering pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDecision {
    /// The message matched a mapping and was relayed to its owner.
    Forwarded {
        /// Identity of the matched mapping.
        mapping_id: i64,
    },
    /// The message was discarded. Senders get no bounce.
    Dropped(DropReason),
}

/// Decides route-or-drop for inbound messages.
#[derive(Clone)]
pub struct MailFilter {
    pool: DbPool,
    forwarder: Forwarder,
}

impl MailFilter {
    /// Create a new MailFilter over the given database and forwarder.
    pub fn new(db: &Database, forwarder: Forwarder) -> Self {
        Self {
            pool: db.pool().clone(),
            forwarder,
        }
    }

    /// Filter one inbound message.
    ///
    /// Reads the primary recipient, splits it on `@`, and looks up the
    /// domain and then the mapping. On a hit the forwarder is invoked
    /// exactly once; its failures are logged here and mapped to a drop,
    /// matching the fire-and-forget delivery policy. Storage errors from
    /// the lookups propagate to the caller.
    pub async fn filter_email(&self, message: &mut Email) -> Result<FilterDecision> {
        let Some(address) = message.primary_recipient().map(str::to_owned) else {
            debug!("message has no recipient");
            return Ok(FilterDecision::Dropped(DropReason::MissingRecipient));
        };

        let Some((local_part, domain_name)) = split_address(&address) else {
            debug!(recipient = %address, "recipient is not a single mailbox");
            return Ok(FilterDecision::Dropped(DropReason::MalformedRecipient));
        };

        let Some(domain) = DomainRepository::new(&self.pool)
            .find_by_name(domain_name)
            .await?
        else {
            debug!(domain = %domain_name, "domain not registered");
            return Ok(FilterDecision::Dropped(DropReason::UnknownDomain));
        };

        let Some(mapping) = MappingRepository::new(&self.pool)
            .find_by_address(local_part, domain.id)
            .await?
        else {
            debug!(recipient = %address, "no mapping for local part");
            return Ok(FilterDecision::Dropped(DropReason::UnknownMapping));
        };

        match self.forwarder.forward_message(message, &mapping).await {
            Ok(()) => {
                info!(recipient = %address, mapping = mapping.id, "message forwarded");
                Ok(FilterDecision::Forwarded {
                    mapping_id: mapping.id,
                })
            }
            Err(EphemailError::MissingOwner(mapping_id)) => {
                error!(mapping = mapping_id, "mapping has no owning user, message dropped");
                Ok(FilterDecision::Dropped(DropReason::MissingOwner))
            }
            Err(EphemailError::Transport(e)) => {
                warn!(recipient = %address, error = %e, "delivery failed, message dropped");
                Ok(FilterDecision::Dropped(DropReason::DeliveryFailed))
            }
            Err(e) => Err(e),
        }
    }
}
