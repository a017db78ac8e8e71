//! db-drift core
//!
//! Backend-agnostic schema snapshot model and the stable drift report types.
//! Field codes in the report are part of the public format: never rename them.

pub mod category;
pub mod config;
pub mod error;
pub mod hash;
pub mod object;
pub mod report;
pub mod schema;
pub mod snapshot;

pub use category::{Capability, ObjectCategory, PayloadShape};
pub use config::{Config, ConfigError, FilterRules};
pub use error::SnapshotError;
pub use hash::{hash_body, is_valid_body_hash};
pub use object::{Columns, ObjectPayload, SchemaObject};
pub use report::{
    CategoryDrift, ChangedField, ColumnChange, ColumnField, ColumnsDiff, DriftReport, DriftSummary,
    ObjectChange, ReportVersion, ValueChange,
};
pub use schema::{Column, Nullability};
pub use snapshot::{CategoryObjects, SchemaSnapshot, SnapshotBuilder};
