//! Immutable point-in-time snapshot of one database's schema
//!
//! Snapshots are only built through [`SnapshotBuilder`], which checks every
//! invariant on ingestion. Once built, a snapshot exposes read-only views.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::category::ObjectCategory;
use crate::config::FilterRules;
use crate::error::SnapshotError;
use crate::hash::is_valid_body_hash;
use crate::object::SchemaObject;

/// Objects of one category, keyed by qualified name
pub type CategoryObjects = BTreeMap<String, SchemaObject>;

/// Schema metadata of one database, grouped by category
///
/// Categories the connector does not support are absent rather than empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSnapshot", into = "RawSnapshot")]
pub struct SchemaSnapshot {
    categories: BTreeMap<ObjectCategory, CategoryObjects>,
}

impl SchemaSnapshot {
    /// Snapshot with no categories at all
    pub fn empty() -> Self {
        Self {
            categories: BTreeMap::new(),
        }
    }

    /// Start building a snapshot
    pub fn builder() -> SnapshotBuilder {
        SnapshotBuilder::new()
    }

    /// Objects of a category, `None` when the category is absent
    pub fn get(&self, category: ObjectCategory) -> Option<&CategoryObjects> {
        self.categories.get(&category)
    }

    /// Look up a single object
    pub fn object(&self, category: ObjectCategory, name: &str) -> Option<&SchemaObject> {
        self.get(category).and_then(|objects| objects.get(name))
    }

    /// Whether the snapshot carries a category (possibly empty)
    pub fn contains_category(&self, category: ObjectCategory) -> bool {
        self.categories.contains_key(&category)
    }

    /// Present categories in canonical order
    pub fn categories(&self) -> impl Iterator<Item = ObjectCategory> + '_ {
        self.categories.keys().copied()
    }

    /// Iterate categories with their objects, in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (ObjectCategory, &CategoryObjects)> {
        self.categories.iter().map(|(c, objects)| (*c, objects))
    }

    /// Total number of objects across categories
    pub fn object_count(&self) -> usize {
        self.categories.values().map(BTreeMap::len).sum()
    }

    /// New snapshot without the categories and objects the rules skip
    pub fn filtered(&self, rules: &FilterRules) -> Self {
        let categories = self
            .categories
            .iter()
            .filter(|(category, _)| !rules.is_category_skipped(**category))
            .map(|(category, objects)| {
                let kept = objects
                    .iter()
                    .filter(|(name, _)| !rules.is_object_skipped(name))
                    .map(|(name, object)| (name.clone(), object.clone()))
                    .collect();
                (*category, kept)
            })
            .collect();

        Self { categories }
    }
}

impl Default for SchemaSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

/// Validating builder for [`SchemaSnapshot`]
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    categories: BTreeMap<ObjectCategory, CategoryObjects>,
}

impl SnapshotBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a category as supported even if it ends up with no objects
    pub fn category(mut self, category: ObjectCategory) -> Self {
        self.categories.entry(category).or_default();
        self
    }

    /// Add one object, failing fast on any invariant violation
    pub fn insert(&mut self, category: ObjectCategory, object: SchemaObject) -> Result<(), SnapshotError> {
        validate_object(category, &object)?;

        let objects = self.categories.entry(category).or_default();
        if objects.contains_key(&object.name) {
            return Err(SnapshotError::DuplicateObject {
                category,
                name: object.name,
            });
        }
        objects.insert(object.name.clone(), object);
        Ok(())
    }

    /// Chaining form of [`SnapshotBuilder::insert`]
    pub fn with_object(mut self, category: ObjectCategory, object: SchemaObject) -> Result<Self, SnapshotError> {
        self.insert(category, object)?;
        Ok(self)
    }

    /// Add every object of a category
    pub fn extend(
        &mut self,
        category: ObjectCategory,
        objects: impl IntoIterator<Item = SchemaObject>,
    ) -> Result<(), SnapshotError> {
        self.categories.entry(category).or_default();
        for object in objects {
            self.insert(category, object)?;
        }
        Ok(())
    }

    /// Finish the snapshot
    pub fn build(self) -> SchemaSnapshot {
        SchemaSnapshot {
            categories: self.categories,
        }
    }
}

fn validate_object(category: ObjectCategory, object: &SchemaObject) -> Result<(), SnapshotError> {
    if object.name.is_empty() {
        return Err(SnapshotError::EmptyName { category });
    }

    let expected = category.shape();
    let found = object.payload.shape();
    if expected != found {
        return Err(SnapshotError::CapabilityMismatch {
            category,
            name: object.name.clone(),
            expected,
            found,
        });
    }

    if let Some(hash) = object.payload.body_hash() {
        if !is_valid_body_hash(hash) {
            return Err(SnapshotError::InvalidBodyHash {
                name: object.name.clone(),
                hash: hash.to_string(),
            });
        }
    }

    if let Some(columns) = object.payload.columns() {
        for (key, column) in columns {
            if column.name.is_empty() {
                return Err(SnapshotError::EmptyColumnName {
                    object: object.name.clone(),
                });
            }
            if *key != column.name {
                return Err(SnapshotError::ColumnKeyMismatch {
                    object: object.name.clone(),
                    key: key.clone(),
                    column: column.name.clone(),
                });
            }
        }
    }

    Ok(())
}

/// Serialized form: category → list of objects
///
/// Lists instead of maps so duplicate names in a file are caught, not
/// silently collapsed by the map deserializer. Columns inside an object
/// follow the same rule.
#[derive(Serialize, Deserialize)]
struct RawSnapshot {
    categories: BTreeMap<ObjectCategory, Vec<SchemaObject>>,
}

impl TryFrom<RawSnapshot> for SchemaSnapshot {
    type Error = SnapshotError;

    fn try_from(raw: RawSnapshot) -> Result<Self, Self::Error> {
        let mut builder = SnapshotBuilder::new();
        for (category, objects) in raw.categories {
            builder.extend(category, objects)?;
        }
        Ok(builder.build())
    }
}

impl From<SchemaSnapshot> for RawSnapshot {
    fn from(snapshot: SchemaSnapshot) -> Self {
        Self {
            categories: snapshot
                .categories
                .into_iter()
                .map(|(category, objects)| (category, objects.into_values().collect()))
                .collect(),
        }
    }
}
