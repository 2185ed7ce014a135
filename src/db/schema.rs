//! Database schema and migrations for ephemail.
//!
//! This module contains all database migrations that will be applied
//! sequentially when the database is first opened or upgraded.

/// Database migrations.
///
/// Each migration is a SQL script that will be executed in order.
/// The schema_version table tracks which migrations have been applied.
pub const MIGRATIONS: &[&str] = &[
    // v1: Receiving domains
    r#"
-- Domains this relay accepts mail for.
-- Names compare case-insensitively, matching common mail conventions.
CREATE TABLE domains (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL UNIQUE COLLATE NOCASE,
    created_at  TEXT NOT NULL DEFAULT (datetime('now'))
);
"#,
    // v2: Disposable address mappings
    r#"
-- One row per disposable address. The local part is case-sensitive;
-- the (local_part, domain_id) pair identifies an address.
CREATE TABLE mappings (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    local_part  TEXT NOT NULL,
    domain_id   INTEGER NOT NULL REFERENCES domains(id) ON DELETE CASCADE,
    created_at  TEXT NOT NULL DEFAULT (datetime('now')),
    UNIQUE (local_part, domain_id)
);

CREATE INDEX idx_mappings_domain_id ON mappings(domain_id);
"#,
    // v3: Users and address ownership
    r#"
-- Registered users with their real mailbox address.
CREATE TABLE users (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    email_address  TEXT NOT NULL UNIQUE,
    created_at     TEXT NOT NULL DEFAULT (datetime('now'))
);

-- Ownership of disposable addresses. A mapping belongs to at most one
-- user; the owner is always resolved by querying this table, never by a
-- column on mappings.
CREATE TABLE user_mappings (
    user_id     INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    mapping_id  INTEGER NOT NULL UNIQUE REFERENCES mappings(id) ON DELETE CASCADE,
    created_at  TEXT NOT NULL DEFAULT (datetime('now')),
    PRIMARY KEY (user_id, mapping_id)
);

CREATE INDEX idx_user_mappings_user_id ON user_mappings(user_id);
"#,
];
