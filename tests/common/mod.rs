//! Test helpers for integration tests.
//!
//! Provides transport doubles and a setup helper that wires the filter
//! the way the composition root does, against an in-memory database.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use ephemail::{Database, Email, EphemailError, Forwarder, MailFilter, MailTransport, Result};

/// Transport double that records every relayed message instead of
/// opening an SMTP session.
#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<Email>>,
}

impl RecordingTransport {
    /// Number of messages relayed so far.
    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    /// Snapshot of all relayed messages.
    pub fn sent(&self) -> Vec<Email> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailTransport for RecordingTransport {
    async fn relay(&self, message: &Email) -> Result<()> {
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

/// Transport double that refuses every relay attempt.
pub struct FailingTransport;

#[async_trait]
impl MailTransport for FailingTransport {
    async fn relay(&self, _message: &Email) -> Result<()> {
        Err(EphemailError::Transport("connection refused".to_string()))
    }
}

/// Open an in-memory database and build a filter over the given transport.
pub async fn setup_filter(transport: Arc<dyn MailTransport>) -> (Database, MailFilter) {
    let db = Database::open_in_memory().await.unwrap();
    let forwarder = Forwarder::new(&db, transport);
    let filter = MailFilter::new(&db, forwarder);
    (db, filter)
}
