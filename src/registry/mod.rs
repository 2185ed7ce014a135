//! Address registry for ephemail.
//!
//! The registry holds the domains this relay receives mail for and the
//! disposable address mappings under them. Both entity types are
//! immutable snapshots; relationships are resolved by explicit queries.

mod domain_repository;
mod mapping_repository;
mod service;
mod types;

pub use domain_repository::DomainRepository;
pub use mapping_repository::MappingRepository;
pub use service::RegistryService;
pub use types::{Domain, Mapping};
