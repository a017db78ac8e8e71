//! Drift report schema (stable v1)
//!
//! This schema is STABLE and VERSIONED.
//! Breaking changes require a new version.
//!
//! Every collection is either an ordered map or a sorted vector, so the same
//! comparison always serializes to the same bytes (apart from `generated_at`).

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::category::ObjectCategory;
use crate::object::SchemaObject;
use crate::schema::{Column, Nullability};

/// Report schema version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportVersion {
    /// Major version (breaking changes)
    pub major: u32,

    /// Minor version (backward-compatible additions)
    pub minor: u32,
}

impl ReportVersion {
    /// Current report schema version
    pub const CURRENT: ReportVersion = ReportVersion { major: 1, minor: 0 };
}

impl std::fmt::Display for ReportVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// A value that differs between source and target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueChange<T> {
    pub source: T,
    pub target: T,
}

impl<T> ValueChange<T> {
    pub fn new(source: T, target: T) -> Self {
        Self { source, target }
    }

    /// Same change seen from the other side
    pub fn reversed(self) -> Self {
        Self {
            source: self.target,
            target: self.source,
        }
    }
}

/// Object-level field that changed
///
/// Codes are part of the report format. Never rename them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangedField {
    DocChanged,
    DefinitionChanged,
    BodyChanged,
    TableNameChanged,
    ColumnsChanged,
}

impl ChangedField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DocChanged => "doc_changed",
            Self::DefinitionChanged => "definition_changed",
            Self::BodyChanged => "body_changed",
            Self::TableNameChanged => "table_name_changed",
            Self::ColumnsChanged => "columns_changed",
        }
    }
}

impl std::fmt::Display for ChangedField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Column-level field that changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnField {
    DataTypeChanged,
    NullabilityChanged,
    DocChanged,
}

impl ColumnField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DataTypeChanged => "data_type_changed",
            Self::NullabilityChanged => "nullability_changed",
            Self::DocChanged => "doc_changed",
        }
    }
}

impl std::fmt::Display for ColumnField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A column present on both sides whose fields differ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnChange {
    pub name: String,

    pub changed: BTreeSet<ColumnField>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<ValueChange<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nullable: Option<ValueChange<Nullability>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<ValueChange<Option<String>>>,
}

/// Column-level drift inside one object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnsDiff {
    /// Columns only in target, sorted by name
    pub added: Vec<Column>,

    /// Columns only in source, sorted by name
    pub removed: Vec<Column>,

    /// Columns in both with differing fields, sorted by name
    pub modified: Vec<ColumnChange>,

    /// Names of identical columns, sorted
    pub unchanged: Vec<String>,
}

impl ColumnsDiff {
    /// No column was added, removed or modified
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty()
    }

    pub fn added_names(&self) -> Vec<&str> {
        self.added.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn removed_names(&self) -> Vec<&str> {
        self.removed.iter().map(|c| c.name.as_str()).collect()
    }

    /// Look up a modified column
    pub fn modified_column(&self, name: &str) -> Option<&ColumnChange> {
        self.modified.iter().find(|c| c.name == name)
    }
}

/// An object present on both sides whose fields differ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectChange {
    /// Qualified name
    pub name: String,

    /// Which fields changed
    pub changed: BTreeSet<ChangedField>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<ValueChange<Option<String>>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<ValueChange<Option<String>>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_hash: Option<ValueChange<Option<String>>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_name: Option<ValueChange<Option<String>>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<ColumnsDiff>,
}

impl ObjectChange {
    /// Check if a field is flagged
    pub fn is_changed(&self, field: ChangedField) -> bool {
        self.changed.contains(&field)
    }
}

/// Count summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriftSummary {
    pub added_count: usize,
    pub removed_count: usize,
    pub modified_count: usize,
    pub unchanged_count: usize,
}

impl DriftSummary {
    /// Objects added, removed or modified
    pub fn drift_count(&self) -> usize {
        self.added_count + self.removed_count + self.modified_count
    }

    /// Every compared object
    pub fn total(&self) -> usize {
        self.drift_count() + self.unchanged_count
    }

    fn accumulate(&mut self, other: &DriftSummary) {
        self.added_count += other.added_count;
        self.removed_count += other.removed_count;
        self.modified_count += other.modified_count;
        self.unchanged_count += other.unchanged_count;
    }
}

/// Drift within one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDrift {
    pub summary: DriftSummary,

    /// Objects only in target, sorted by name
    pub added: Vec<SchemaObject>,

    /// Objects only in source, sorted by name
    pub removed: Vec<SchemaObject>,

    /// Objects in both with differences, sorted by name
    pub modified: Vec<ObjectChange>,

    /// Names of identical objects, sorted
    pub unchanged: Vec<String>,
}

impl CategoryDrift {
    /// Assemble a category result, computing its summary
    pub fn new(
        added: Vec<SchemaObject>,
        removed: Vec<SchemaObject>,
        modified: Vec<ObjectChange>,
        unchanged: Vec<String>,
    ) -> Self {
        let summary = DriftSummary {
            added_count: added.len(),
            removed_count: removed.len(),
            modified_count: modified.len(),
            unchanged_count: unchanged.len(),
        };

        Self {
            summary,
            added,
            removed,
            modified,
            unchanged,
        }
    }

    pub fn added_names(&self) -> Vec<&str> {
        self.added.iter().map(|o| o.name.as_str()).collect()
    }

    pub fn removed_names(&self) -> Vec<&str> {
        self.removed.iter().map(|o| o.name.as_str()).collect()
    }

    pub fn modified_names(&self) -> Vec<&str> {
        self.modified.iter().map(|o| o.name.as_str()).collect()
    }

    /// Look up a modified object
    pub fn modified_object(&self, name: &str) -> Option<&ObjectChange> {
        self.modified.iter().find(|o| o.name == name)
    }

    /// Any added, removed or modified object
    pub fn has_drift(&self) -> bool {
        self.summary.drift_count() > 0
    }
}

/// Drift report (drift-report.json v1)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriftReport {
    /// Schema version
    pub version: ReportVersion,

    /// Timestamp (RFC 3339), set by the caller
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<String>,

    /// Totals over all categories
    pub summary: DriftSummary,

    /// Per-category drift, canonical category order
    pub categories: BTreeMap<ObjectCategory, CategoryDrift>,
}

impl DriftReport {
    /// Build a report from per-category results, computing totals
    pub fn from_categories(categories: BTreeMap<ObjectCategory, CategoryDrift>) -> Self {
        let mut summary = DriftSummary::default();
        for drift in categories.values() {
            summary.accumulate(&drift.summary);
        }

        Self {
            version: ReportVersion::CURRENT,
            generated_at: None,
            summary,
            categories,
        }
    }

    /// Attach a generation timestamp
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.generated_at = Some(timestamp.into());
        self
    }

    /// Attach the current time as generation timestamp
    pub fn stamped_now(self) -> Self {
        self.with_timestamp(chrono::Utc::now().to_rfc3339())
    }

    /// Drift of one category, `None` if the category was not reported
    pub fn category(&self, category: ObjectCategory) -> Option<&CategoryDrift> {
        self.categories.get(&category)
    }

    /// Check if anything differs between the two snapshots
    pub fn has_drift(&self) -> bool {
        self.summary.drift_count() > 0
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Save as JSON file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let json = self
            .to_json()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        std::fs::write(path, json)
    }
}

impl Default for DriftReport {
    fn default() -> Self {
        Self::from_categories(BTreeMap::new())
    }
}
