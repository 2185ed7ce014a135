//! Outbound mail transport for ephemail.
//!
//! The relay core only needs one capability from the outside world: open a
//! session to a host and port, hand over a message for its recipient list,
//! and learn whether that worked. `MailTransport` captures that seam so the
//! forwarder can be exercised without a live SMTP server.

use std::time::Duration;

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::debug;

use crate::config::SmtpConfig;
use crate::{EphemailError, Result};

use super::message::Email;

/// Capability to relay a message to all recipients currently on it.
///
/// Connection and protocol failures surface as a single `Transport` error;
/// the transport itself never retries.
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Send a copy of the message to every recipient on its list.
    async fn relay(&self, message: &Email) -> Result<()>;
}

/// SMTP implementation of [`MailTransport`] backed by lettre.
///
/// Each call opens a fresh session to the configured host and port, sends,
/// and closes. The session is unauthenticated; configured credentials are
/// not used here. One timeout bounds the whole connect-and-send attempt.
pub struct SmtpRelay {
    host: String,
    port: u16,
    timeout: Duration,
}

impl SmtpRelay {
    /// Create a relay for the configured outgoing SMTP server.
    pub fn new(config: &SmtpConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// Build the outbound copy of a message.
    fn build_outbound(message: &Email) -> Result<Message> {
        let from: Mailbox = message
            .from()
            .ok_or_else(|| EphemailError::Transport("message has no sender address".to_string()))?
            .parse()
            .map_err(|e| EphemailError::Transport(format!("invalid sender address: {e}")))?;

        let mut builder = Message::builder().from(from);

        if let Some(subject) = message.subject() {
            builder = builder.subject(subject);
        }

        for recipient in message.recipients() {
            let mailbox: Mailbox = recipient
                .parse()
                .map_err(|e| EphemailError::Transport(format!("invalid recipient address: {e}")))?;
            builder = builder.to(mailbox);
        }

        builder
            .body(message.body().to_string())
            .map_err(|e| EphemailError::Transport(e.to_string()))
    }
}

#[async_trait]
impl MailTransport for SmtpRelay {
    async fn relay(&self, message: &Email) -> Result<()> {
        if message.recipients().is_empty() {
            return Err(EphemailError::Transport(
                "message has no recipients".to_string(),
            ));
        }

        let outbound = Self::build_outbound(message)?;

        let mailer: AsyncSmtpTransport<Tokio1Executor> =
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(self.host.as_str())
                .port(self.port)
                .build();

        debug!(host = %self.host, port = self.port, "relaying message");

        match tokio::time::timeout(self.timeout, mailer.send(outbound)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(EphemailError::Transport(e.to_string())),
            Err(_) => Err(EphemailError::Transport(format!(
                "relay to {}:{} timed out after {:?}",
                self.host, self.port, self.timeout
            ))),
        }
    }
}
