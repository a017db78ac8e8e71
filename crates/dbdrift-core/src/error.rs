//! Snapshot validation errors

use crate::category::{ObjectCategory, PayloadShape};

/// A snapshot violated one of its structural invariants
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SnapshotError {
    #[error("Duplicate object '{name}' in category {category}")]
    DuplicateObject {
        category: ObjectCategory,
        name: String,
    },

    #[error("Duplicate column '{column}' in object '{object}'")]
    DuplicateColumn { object: String, column: String },

    #[error("Column key '{key}' does not match column name '{column}' in object '{object}'")]
    ColumnKeyMismatch {
        object: String,
        key: String,
        column: String,
    },

    #[error("Object '{name}' in category {category} has a {found} payload, expected {expected}")]
    CapabilityMismatch {
        category: ObjectCategory,
        name: String,
        expected: PayloadShape,
        found: PayloadShape,
    },

    #[error("Object '{name}' has an invalid body hash '{hash}' (expected 64 lower-case hex characters)")]
    InvalidBodyHash { name: String, hash: String },

    #[error("Empty name in category {category}")]
    EmptyName { category: ObjectCategory },

    #[error("Empty column name in object '{object}'")]
    EmptyColumnName { object: String },
}
