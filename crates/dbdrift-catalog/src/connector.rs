//! Connector trait for fetching schema snapshots

use dbdrift_core::{Column, SchemaSnapshot, SnapshotError};
use std::fmt;

/// Errors that can occur when fetching a snapshot
#[derive(Debug, Clone, thiserror::Error)]
pub enum FetchError {
    #[error("Database unavailable: {0}")]
    Unavailable(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Invalid connection string: {0}")]
    InvalidConnectionString(String),

    #[error("Unsupported: {0}")]
    Unsupported(String),

    #[error("Malformed snapshot: {0}")]
    Snapshot(#[from] SnapshotError),
}

/// Trait for connectors that extract a schema snapshot from a live database
///
/// A connector either returns a complete snapshot that satisfies every
/// snapshot invariant, or fails. It never returns a partial snapshot.
#[async_trait::async_trait]
pub trait Connector: Send + Sync {
    /// Get the connector name (e.g., "SQLite", "PostgreSQL")
    fn name(&self) -> &'static str;

    /// Fetch the schema structure of the connected database
    async fn fetch_schema_structure(&self) -> Result<SchemaSnapshot, FetchError>;
}

/// A connection string split into its optional scheme and the remainder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionString {
    raw: String,
    scheme: Option<String>,
    rest: String,
}

impl ConnectionString {
    /// Parse `scheme://rest`, `scheme:rest` or a bare path
    ///
    /// A single letter before `:` is taken as a Windows drive, not a scheme.
    pub fn parse(raw: &str) -> Self {
        let (scheme, rest) = match raw.split_once(':') {
            Some((scheme, rest)) if is_scheme(scheme) => {
                let rest = rest.strip_prefix("//").unwrap_or(rest);
                (Some(scheme.to_ascii_lowercase()), rest.to_string())
            }
            _ => (None, raw.to_string()),
        };

        Self {
            raw: raw.to_string(),
            scheme,
            rest,
        }
    }

    /// Scheme prefix, lower-cased
    pub fn scheme(&self) -> Option<&str> {
        self.scheme.as_deref()
    }

    /// Everything after the scheme and its `//`
    pub fn rest(&self) -> &str {
        &self.rest
    }

    /// Original string
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for ConnectionString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Append an index key column, keying a repeated column as `<name>#<position>`
///
/// Both SQLite and PostgreSQL accept an index that names a column twice.
pub(crate) fn push_key_column(columns: &mut Vec<Column>, mut column: Column, position: i64) {
    if columns.iter().any(|existing| existing.name == column.name) {
        column.name = format!("{}#{}", column.name, position);
    }
    columns.push(column);
}

fn is_scheme(candidate: &str) -> bool {
    let mut chars = candidate.chars();
    candidate.len() > 1
        && chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}
