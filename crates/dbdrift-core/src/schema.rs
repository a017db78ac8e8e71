//! Column types shared by every table-like object

use serde::{Deserialize, Serialize};

/// Nullability state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Nullability {
    /// Definitely nullable
    Yes,

    /// Definitely not nullable
    No,

    /// The connector could not determine nullability
    Unknown,
}

impl Default for Nullability {
    fn default() -> Self {
        Self::Unknown
    }
}

impl From<Option<bool>> for Nullability {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => Self::Yes,
            Some(false) => Self::No,
            None => Self::Unknown,
        }
    }
}

impl std::fmt::Display for Nullability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Yes => write!(f, "NULL"),
            Self::No => write!(f, "NOT NULL"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// A column of a table, view or index-like object
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Column {
    /// Column name, unique within the owning object
    pub name: String,

    /// Column comment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,

    /// Data type exactly as the DBMS reports it
    #[serde(default)]
    pub data_type: String,

    /// Nullability
    #[serde(default)]
    pub nullable: Nullability,
}

impl Column {
    /// Create a new column with unknown nullability and no comment
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: None,
            data_type: data_type.into(),
            nullable: Nullability::Unknown,
        }
    }

    /// Set nullability
    pub fn with_nullability(mut self, nullable: Nullability) -> Self {
        self.nullable = nullable;
        self
    }

    /// Set the column comment
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }
}
