//! Registry entities: receiving domains and disposable address mappings.

/// A domain this relay is authoritative for.
///
/// Domains are immutable once created; there is no rename path. They are
/// registered and removed administratively.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Domain {
    /// Unique domain ID.
    pub id: i64,
    /// Domain name, e.g. `"example.org"`. Unique, compared
    /// case-insensitively.
    pub name: String,
    /// Creation timestamp.
    pub created_at: String,
}

/// A disposable address: the binding of a local part to a domain.
///
/// Mappings are immutable once created. Revocation deletes the row, and
/// its absence is observable only as lookups no longer returning it.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Mapping {
    /// Unique mapping ID.
    pub id: i64,
    /// The portion of the address before the `@`. Case-sensitive.
    pub local_part: String,
    /// The domain this address lives under.
    pub domain_id: i64,
    /// Creation timestamp.
    pub created_at: String,
}

impl Mapping {
    /// Render the full address for a mapping under the given domain name.
    pub fn address(&self, domain_name: &str) -> String {
        format!("{}@{}", self.local_part, domain_name)
    }
}
