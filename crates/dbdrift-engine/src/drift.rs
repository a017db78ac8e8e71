//! Drift computation between two schema snapshots
//!
//! Compares a source snapshot (the reference) against a target snapshot,
//! category by category in canonical order. The computation is pure: it
//! never mutates its inputs, performs no I/O and reads no clock.

use dbdrift_core::{
    CategoryDrift, CategoryObjects, ChangedField, DriftReport, ObjectCategory, ObjectChange,
    ObjectPayload, SchemaObject, SchemaSnapshot, ValueChange,
};
use std::collections::{BTreeMap, BTreeSet};

use crate::columns::diff_columns;

/// Compute the drift from `source` to `target`
///
/// Added objects exist only in `target`, removed objects only in `source`.
/// Categories with no objects on either side are left out of the report.
pub fn compute_drift(source: &SchemaSnapshot, target: &SchemaSnapshot) -> DriftReport {
    let empty = CategoryObjects::new();
    let mut categories = BTreeMap::new();

    for category in ObjectCategory::ALL {
        let source_objects = source.get(category).unwrap_or(&empty);
        let target_objects = target.get(category).unwrap_or(&empty);

        if source_objects.is_empty() && target_objects.is_empty() {
            continue;
        }

        categories.insert(category, diff_category(source_objects, target_objects));
    }

    DriftReport::from_categories(categories)
}

/// Diff the objects of one category
pub fn diff_category(source: &CategoryObjects, target: &CategoryObjects) -> CategoryDrift {
    let mut removed = Vec::new();
    let mut modified = Vec::new();
    let mut unchanged = Vec::new();

    for (name, source_object) in source {
        match target.get(name) {
            Some(target_object) => match diff_object(source_object, target_object) {
                Some(change) => modified.push(change),
                None => unchanged.push(name.clone()),
            },
            None => removed.push(source_object.clone()),
        }
    }

    let added = target
        .iter()
        .filter(|(name, _)| !source.contains_key(*name))
        .map(|(_, object)| object.clone())
        .collect();

    CategoryDrift::new(added, removed, modified, unchanged)
}

/// Compare two objects with the same qualified name, `None` if identical
///
/// Each capability is compared only when at least one side carries it. A
/// capability present on one side only counts as changed.
pub fn diff_object(source: &SchemaObject, target: &SchemaObject) -> Option<ObjectChange> {
    let (a, b) = (&source.payload, &target.payload);
    let mut changed = BTreeSet::new();

    let doc = compare_capability(a.doc().cloned(), b.doc().cloned()).map(|change| {
        changed.insert(ChangedField::DocChanged);
        ValueChange::new(change.source.flatten(), change.target.flatten())
    });

    let definition = compare_text(a.definition(), b.definition()).map(|change| {
        changed.insert(ChangedField::DefinitionChanged);
        change
    });

    let body_hash = compare_text(a.body_hash(), b.body_hash()).map(|change| {
        changed.insert(ChangedField::BodyChanged);
        change
    });

    let table_name = compare_text(a.table_name(), b.table_name()).map(|change| {
        changed.insert(ChangedField::TableNameChanged);
        change
    });

    let columns = diff_payload_columns(a, b);
    if columns.is_some() {
        changed.insert(ChangedField::ColumnsChanged);
    }

    if changed.is_empty() {
        return None;
    }

    Some(ObjectChange {
        name: source.name.clone(),
        changed,
        doc,
        definition,
        body_hash,
        table_name,
        columns,
    })
}

fn diff_payload_columns(a: &ObjectPayload, b: &ObjectPayload) -> Option<dbdrift_core::ColumnsDiff> {
    if a.columns().is_none() && b.columns().is_none() {
        return None;
    }

    let empty = dbdrift_core::Columns::new();
    let diff = diff_columns(a.columns().unwrap_or(&empty), b.columns().unwrap_or(&empty));
    let capability_differs = a.columns().is_some() != b.columns().is_some();

    (capability_differs || !diff.is_empty()).then_some(diff)
}

fn compare_text(source: Option<&str>, target: Option<&str>) -> Option<ValueChange<Option<String>>> {
    compare_capability(source.map(str::to_string), target.map(str::to_string))
}

/// `Some` when the values differ, including presence on one side only
fn compare_capability<T: PartialEq>(source: Option<T>, target: Option<T>) -> Option<ValueChange<Option<T>>> {
    match (source, target) {
        (None, None) => None,
        (Some(s), Some(t)) if s == t => None,
        (s, t) => Some(ValueChange::new(s, t)),
    }
}
