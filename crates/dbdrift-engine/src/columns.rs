//! Column-level diff of two columned objects

use dbdrift_core::{Column, ColumnChange, ColumnField, Columns, ColumnsDiff, ValueChange};
use std::collections::BTreeSet;

/// Diff two column maps keyed by column name
///
/// Both maps are ordered, so every vector in the result comes out sorted.
pub fn diff_columns(source: &Columns, target: &Columns) -> ColumnsDiff {
    let mut diff = ColumnsDiff::default();

    for (name, source_col) in source {
        match target.get(name) {
            Some(target_col) => match compare_column(source_col, target_col) {
                Some(change) => diff.modified.push(change),
                None => diff.unchanged.push(name.clone()),
            },
            None => diff.removed.push(source_col.clone()),
        }
    }

    diff.added = target
        .iter()
        .filter(|(name, _)| !source.contains_key(*name))
        .map(|(_, column)| column.clone())
        .collect();

    diff
}

/// Compare two columns with the same name, `None` if identical
fn compare_column(source: &Column, target: &Column) -> Option<ColumnChange> {
    let mut changed = BTreeSet::new();

    let data_type = (source.data_type != target.data_type).then(|| {
        changed.insert(ColumnField::DataTypeChanged);
        ValueChange::new(source.data_type.clone(), target.data_type.clone())
    });

    let nullable = (source.nullable != target.nullable).then(|| {
        changed.insert(ColumnField::NullabilityChanged);
        ValueChange::new(source.nullable, target.nullable)
    });

    let doc = (source.doc != target.doc).then(|| {
        changed.insert(ColumnField::DocChanged);
        ValueChange::new(source.doc.clone(), target.doc.clone())
    });

    if changed.is_empty() {
        return None;
    }

    Some(ColumnChange {
        name: source.name.clone(),
        changed,
        data_type,
        nullable,
        doc,
    })
}
