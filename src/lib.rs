//! ephemail - disposable email address relay
//!
//! Maps short-lived `local-part@domain` addresses to the real mailbox of a
//! registered user and relays inbound mail there over SMTP. Mail for
//! unknown domains or unmapped local parts is silently discarded.

pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod registry;
pub mod relay;

pub use config::Config;
pub use db::{Database, DbPool, NewUser, User, UserRepository};
pub use error::{EphemailError, Result};
pub use registry::{Domain, DomainRepository, Mapping, MappingRepository, RegistryService};
pub use relay::{
    split_address, DropReason, Email, FilterDecision, Forwarder, MailFilter, MailTransport,
    SmtpRelay,
};
