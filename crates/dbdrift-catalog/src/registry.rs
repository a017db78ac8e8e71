//! Registry mapping a DBMS name to a connector constructor
//!
//! The registry is a plain value built once at startup and passed by
//! reference. There is no global registration.

use std::collections::BTreeMap;

use crate::connector::{Connector, FetchError};
use crate::oracle::OracleConnector;
use crate::postgres::PostgresConnector;
use crate::sqlite::SqliteConnector;

/// Builds a connector from a connection string
pub type ConnectorFactory = fn(&str) -> Result<Box<dyn Connector>, FetchError>;

struct Entry {
    factory: ConnectorFactory,
    schemes: &'static [&'static str],
}

/// Immutable map of supported DBMS names
pub struct ConnectorRegistry {
    entries: BTreeMap<&'static str, Entry>,
}

impl ConnectorRegistry {
    /// Registry without any connector
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Registry with every connector shipped in this crate
    pub fn builtin() -> Self {
        Self::new()
            .with("sqlite", &["sqlite", "sqlite3", "file"], |conn| {
                Ok(Box::new(SqliteConnector::new(conn)?))
            })
            .with("postgres", &["postgres", "postgresql"], |conn| {
                Ok(Box::new(PostgresConnector::new(conn)?))
            })
            .with("oracle", &["oracle"], |conn| Ok(Box::new(OracleConnector::new(conn)?)))
    }

    /// Register a DBMS with the connection-string schemes it accepts
    pub fn with(
        mut self,
        dbms: &'static str,
        schemes: &'static [&'static str],
        factory: ConnectorFactory,
    ) -> Self {
        self.entries.insert(dbms, Entry { factory, schemes });
        self
    }

    /// Create a connector for `dbms`
    pub fn create(&self, dbms: &str, connection: &str) -> Result<Box<dyn Connector>, FetchError> {
        let entry = self.entries.get(dbms).ok_or_else(|| {
            FetchError::Unsupported(format!(
                "DBMS '{}' is not supported. Supported: {}",
                dbms,
                self.supported().join(", ")
            ))
        })?;

        (entry.factory)(connection)
    }

    /// Supported DBMS names, sorted
    pub fn supported(&self) -> Vec<&'static str> {
        self.entries.keys().copied().collect()
    }

    /// Check if `dbms` is registered
    pub fn contains(&self, dbms: &str) -> bool {
        self.entries.contains_key(dbms)
    }

    /// Whether a connection-string scheme belongs to `dbms`
    pub fn accepts_scheme(&self, dbms: &str, scheme: &str) -> bool {
        self.entries
            .get(dbms)
            .is_some_and(|entry| entry.schemes.contains(&scheme))
    }
}

impl Default for ConnectorRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockConnector;

    #[test]
    fn builtin_names() {
        let registry = ConnectorRegistry::builtin();
        assert_eq!(registry.supported(), vec!["oracle", "postgres", "sqlite"]);
        assert!(registry.contains("sqlite"));
        assert!(registry.contains("oracle"));
        assert!(!registry.contains("mssql"));
    }

    #[test]
    fn unknown_dbms() {
        let err = ConnectorRegistry::builtin().create("mssql", "mssql://x").err().unwrap();
        assert!(matches!(err, FetchError::Unsupported(_)));
        assert!(err.to_string().contains("oracle, postgres, sqlite"));
    }

    #[test]
    fn scheme_aliases() {
        let registry = ConnectorRegistry::builtin();
        assert!(registry.accepts_scheme("postgres", "postgresql"));
        assert!(registry.accepts_scheme("sqlite", "sqlite"));
        assert!(!registry.accepts_scheme("sqlite", "postgres"));
        assert!(registry.accepts_scheme("oracle", "oracle"));
        assert!(!registry.accepts_scheme("mssql", "mssql"));
    }

    #[test]
    fn custom_registration() {
        let registry = ConnectorRegistry::new().with("mock", &["mock"], |_| Ok(Box::new(MockConnector::new())));
        let connector = registry.create("mock", "mock://anything").unwrap();
        assert_eq!(connector.name(), "Mock");
    }

    #[test]
    fn sqlite_constructor() {
        let connector = ConnectorRegistry::builtin().create("sqlite", "sqlite:///tmp/app.db").unwrap();
        assert_eq!(connector.name(), "SQLite");
    }
}
