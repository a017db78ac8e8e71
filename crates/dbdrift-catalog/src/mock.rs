//! Mock connector for testing
//!
//! This connector returns a predefined snapshot without touching any database.
//! It's useful for:
//! - Unit testing the drift pipeline
//! - Simulating fetch failures and slow databases
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dbdrift_catalog::{Connector, MockConnector};
//! use dbdrift_core::{ObjectCategory, SchemaObject, SchemaSnapshot};
//!
//! let snapshot = SchemaSnapshot::builder()
//!     .with_object(ObjectCategory::Sequences, SchemaObject::defined("HR.EMP_SEQ", "START WITH 1"))?
//!     .build();
//!
//! let connector = MockConnector::new().with_snapshot(snapshot);
//! let fetched = connector.fetch_schema_structure().await?;
//! ```
//!
//! ## Simulating Failures
//!
//! ```rust,ignore
//! let connector = MockConnector::new()
//!     .with_error(FetchError::Unavailable("Simulated outage".to_string()))
//!     .with_latency(100); // 100ms delay
//! ```

use crate::connector::{Connector, FetchError};
use dbdrift_core::SchemaSnapshot;

/// Mock connector for testing
#[derive(Debug, Clone)]
pub struct MockConnector {
    /// Snapshot returned by `fetch_schema_structure`
    snapshot: SchemaSnapshot,

    /// Error returned instead of the snapshot
    error: Option<FetchError>,

    /// Simulated query latency (milliseconds)
    latency_ms: u64,

    /// Name to return from name() method
    connector_name: &'static str,
}

impl MockConnector {
    /// Create a mock connector returning an empty snapshot
    pub fn new() -> Self {
        Self {
            snapshot: SchemaSnapshot::empty(),
            error: None,
            latency_ms: 0,
            connector_name: "Mock",
        }
    }

    /// Return `snapshot` from every fetch
    pub fn with_snapshot(mut self, snapshot: SchemaSnapshot) -> Self {
        self.snapshot = snapshot;
        self
    }

    /// Fail every fetch with `error`
    pub fn with_error(mut self, error: FetchError) -> Self {
        self.error = Some(error);
        self
    }

    /// Delay every fetch by `latency_ms` milliseconds
    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    /// Set a custom connector name
    pub fn with_name(mut self, name: &'static str) -> Self {
        self.connector_name = name;
        self
    }

    async fn simulate_latency(&self) {
        if self.latency_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(self.latency_ms)).await;
        }
    }
}

impl Default for MockConnector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Connector for MockConnector {
    fn name(&self) -> &'static str {
        self.connector_name
    }

    async fn fetch_schema_structure(&self) -> Result<SchemaSnapshot, FetchError> {
        self.simulate_latency().await;

        if let Some(error) = &self.error {
            return Err(error.clone());
        }

        Ok(self.snapshot.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dbdrift_core::{Column, ObjectCategory, SchemaObject};

    fn sample() -> SchemaSnapshot {
        SchemaSnapshot::builder()
            .with_object(
                ObjectCategory::Tables,
                SchemaObject::relation("HR.EMP", None, vec![Column::new("ID", "NUMBER")]).unwrap(),
            )
            .unwrap()
            .build()
    }

    #[tokio::test]
    async fn test_mock_connector_default_is_empty() {
        let connector = MockConnector::new();
        let snapshot = connector.fetch_schema_structure().await.unwrap();
        assert_eq!(snapshot.object_count(), 0);
    }

    #[tokio::test]
    async fn test_mock_connector_returns_snapshot() {
        let connector = MockConnector::new().with_snapshot(sample());
        let snapshot = connector.fetch_schema_structure().await.unwrap();
        assert!(snapshot.object(ObjectCategory::Tables, "HR.EMP").is_some());
    }

    #[tokio::test]
    async fn test_mock_connector_error() {
        let connector = MockConnector::new()
            .with_snapshot(sample())
            .with_error(FetchError::PermissionDenied("no catalog access".to_string()));

        let result = connector.fetch_schema_structure().await;
        assert!(matches!(result, Err(FetchError::PermissionDenied(_))));
    }

    #[tokio::test]
    async fn test_mock_connector_name() {
        assert_eq!(MockConnector::new().name(), "Mock");
        assert_eq!(MockConnector::new().with_name("TestOracle").name(), "TestOracle");
    }

    #[tokio::test]
    async fn test_mock_connector_repeated_fetches_are_equal() {
        let connector = MockConnector::new().with_snapshot(sample());

        let first = connector.fetch_schema_structure().await.unwrap();
        let second = connector.clone().fetch_schema_structure().await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first, sample());
    }

    #[tokio::test]
    async fn test_mock_connector_latency() {
        let connector = MockConnector::new().with_latency(20);
        let start = std::time::Instant::now();
        connector.fetch_schema_structure().await.unwrap();
        assert!(start.elapsed() >= std::time::Duration::from_millis(20));
    }
}
