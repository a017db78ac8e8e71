//! Database catalog connectors producing schema snapshots
//!
//! Each connector reads the system catalog of one DBMS and produces a
//! [`SchemaSnapshot`](dbdrift_core::SchemaSnapshot). Connectors are created
//! by name through the [`ConnectorRegistry`].
//!
//! ## Features
//!
//! - SQLite is always available (bundled `rusqlite`)
//! - `postgres` - PostgreSQL support via `tokio-postgres`
//! - `oracle` - Oracle support via the `oracle` crate (needs an Oracle client library)
//!
//! ## Example
//!
//! ```rust,ignore
//! use dbdrift_catalog::{Connector, ConnectorRegistry};
//!
//! let registry = ConnectorRegistry::builtin();
//! let connector = registry.create("sqlite", "sqlite:///var/lib/app/app.db")?;
//! let snapshot = connector.fetch_schema_structure().await?;
//! ```

pub mod connector;
pub mod mock;
pub mod oracle;
pub mod postgres;
pub mod registry;
pub mod sqlite;

pub use connector::{ConnectionString, Connector, FetchError};
pub use mock::MockConnector;
pub use oracle::OracleConnector;
pub use postgres::PostgresConnector;
pub use registry::{ConnectorFactory, ConnectorRegistry};
pub use sqlite::SqliteConnector;
