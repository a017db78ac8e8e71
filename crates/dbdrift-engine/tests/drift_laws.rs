//! Properties every drift computation must satisfy
//!
//! Identity, symmetry and determinism are checked over a pair of realistic
//! snapshots, followed by the reference scenarios.

use dbdrift_core::{
    hash_body, ChangedField, Column, ColumnField, DriftReport, Nullability, ObjectCategory,
    SchemaObject, SchemaSnapshot, SnapshotBuilder, ValueChange,
};
use dbdrift_engine::compute_drift;
use pretty_assertions::assert_eq;
use std::collections::BTreeSet;

// =============================================================================
// Fixtures
// =============================================================================

fn emp_v1() -> SchemaObject {
    SchemaObject::relation(
        "HR.EMP",
        Some("Employees".into()),
        vec![
            Column::new("ID", "NUMBER").with_nullability(Nullability::No),
            Column::new("NAME", "VARCHAR2").with_nullability(Nullability::Yes),
            Column::new("SALARY", "NUMBER").with_nullability(Nullability::Yes),
        ],
    )
    .unwrap()
}

fn emp_v2() -> SchemaObject {
    SchemaObject::relation(
        "HR.EMP",
        Some("Employees".into()),
        vec![
            Column::new("EMAIL", "VARCHAR2").with_nullability(Nullability::Yes),
            Column::new("ID", "NUMBER").with_nullability(Nullability::No),
            Column::new("NAME", "CLOB").with_nullability(Nullability::Yes),
        ],
    )
    .unwrap()
}

fn insert(builder: &mut SnapshotBuilder, category: ObjectCategory, object: SchemaObject) {
    builder.insert(category, object).unwrap();
}

/// Production-like source schema
fn source_snapshot() -> SchemaSnapshot {
    let mut b = SchemaSnapshot::builder();
    insert(&mut b, ObjectCategory::Tables, emp_v1());
    insert(
        &mut b,
        ObjectCategory::Tables,
        SchemaObject::relation("HR.DEPT", None, vec![Column::new("ID", "NUMBER")]).unwrap(),
    );
    insert(
        &mut b,
        ObjectCategory::Views,
        SchemaObject::relation("HR.V_ACTIVE", None, vec![Column::new("ID", "NUMBER")]).unwrap(),
    );
    insert(
        &mut b,
        ObjectCategory::Indexes,
        SchemaObject::index_like("HR.EMP_PK", "HR.EMP", vec![Column::new("ID", "NUMBER")]).unwrap(),
    );
    insert(
        &mut b,
        ObjectCategory::Triggers,
        SchemaObject::code_from_body("HR.TRG_AUDIT", "BEGIN audit; END;", "AFTER UPDATE ON HR.EMP"),
    );
    insert(
        &mut b,
        ObjectCategory::Functions,
        SchemaObject::code_from_body("HR.F_BONUS", "RETURN sal * 0.1;", "F_BONUS(SAL NUMBER) RETURN NUMBER"),
    );
    insert(&mut b, ObjectCategory::Synonyms, SchemaObject::defined("PUBLIC.EMP", "HR.EMP"));
    insert(&mut b, ObjectCategory::Operators, SchemaObject::documented("HR.CONTAINS", Some("text op".into())));
    b.build()
}

/// Staging schema that drifted from the source
fn target_snapshot() -> SchemaSnapshot {
    let mut b = SchemaSnapshot::builder();
    insert(&mut b, ObjectCategory::Tables, emp_v2());
    insert(
        &mut b,
        ObjectCategory::Tables,
        SchemaObject::relation("HR.DEPT", None, vec![Column::new("ID", "NUMBER")]).unwrap(),
    );
    insert(
        &mut b,
        ObjectCategory::Tables,
        SchemaObject::relation("HR.PROJECTS", None, vec![Column::new("ID", "NUMBER")]).unwrap(),
    );
    insert(
        &mut b,
        ObjectCategory::Indexes,
        SchemaObject::index_like("HR.EMP_PK", "HR.EMP", vec![Column::new("ID", "NUMBER")]).unwrap(),
    );
    insert(
        &mut b,
        ObjectCategory::Triggers,
        SchemaObject::code_from_body("HR.TRG_AUDIT", "BEGIN audit; END;", "AFTER UPDATE OR DELETE ON HR.EMP"),
    );
    insert(
        &mut b,
        ObjectCategory::Functions,
        SchemaObject::code_from_body("HR.F_BONUS", "RETURN sal * 0.2;", "F_BONUS(SAL NUMBER) RETURN NUMBER"),
    );
    insert(&mut b, ObjectCategory::Synonyms, SchemaObject::defined("PUBLIC.EMP", "HR.EMPLOYEES"));
    insert(&mut b, ObjectCategory::Operators, SchemaObject::documented("HR.CONTAINS", Some("text op".into())));
    b.build()
}

fn names(category: &dbdrift_core::CategoryDrift) -> (Vec<&str>, Vec<&str>, Vec<&str>) {
    (category.added_names(), category.removed_names(), category.modified_names())
}

// =============================================================================
// Laws
// =============================================================================

#[test]
fn identity_law() {
    for snapshot in [source_snapshot(), target_snapshot(), SchemaSnapshot::empty()] {
        let report = compute_drift(&snapshot, &snapshot);

        assert!(!report.has_drift());
        for drift in report.categories.values() {
            assert!(drift.added.is_empty());
            assert!(drift.removed.is_empty());
            assert!(drift.modified.is_empty());
        }
        assert_eq!(report.summary.unchanged_count, snapshot.object_count());
    }
}

#[test]
fn symmetry_law() {
    let (a, b) = (source_snapshot(), target_snapshot());
    let forward = compute_drift(&a, &b);
    let backward = compute_drift(&b, &a);

    assert_eq!(
        forward.categories.keys().collect::<Vec<_>>(),
        backward.categories.keys().collect::<Vec<_>>()
    );

    for (category, fwd) in &forward.categories {
        let bwd = backward.category(*category).unwrap();

        assert_eq!(fwd.added, bwd.removed, "{}", category);
        assert_eq!(fwd.removed, bwd.added, "{}", category);
        assert_eq!(fwd.modified_names(), bwd.modified_names(), "{}", category);

        for change in &fwd.modified {
            let mirrored = bwd.modified_object(&change.name).unwrap();
            assert_eq!(change.changed, mirrored.changed);

            if let (Some(f), Some(m)) = (&change.body_hash, &mirrored.body_hash) {
                assert_eq!(f.clone().reversed(), m.clone());
            }
            if let (Some(f), Some(m)) = (&change.columns, &mirrored.columns) {
                assert_eq!(f.added, m.removed);
                assert_eq!(f.removed, m.added);
                for column in &f.modified {
                    let mirror_col = m.modified_column(&column.name).unwrap();
                    assert_eq!(column.changed, mirror_col.changed);
                    assert_eq!(column.data_type.clone().map(ValueChange::reversed), mirror_col.data_type);
                }
            }
        }
    }
}

#[test]
fn column_nesting_reports_exactly_three_changes() {
    let report = compute_drift(&source_snapshot(), &target_snapshot());
    let tables = report.category(ObjectCategory::Tables).unwrap();
    let emp = tables.modified_object("HR.EMP").unwrap();

    assert_eq!(emp.changed, BTreeSet::from([ChangedField::ColumnsChanged]));

    let columns = emp.columns.as_ref().unwrap();
    assert_eq!(columns.added_names(), vec!["EMAIL"]);
    assert_eq!(columns.removed_names(), vec!["SALARY"]);
    assert_eq!(columns.unchanged, vec!["ID"]);
    assert_eq!(columns.modified.len(), 1);

    let name = columns.modified_column("NAME").unwrap();
    assert_eq!(name.changed, BTreeSet::from([ColumnField::DataTypeChanged]));
    assert_eq!(name.data_type, Some(ValueChange::new("VARCHAR2".into(), "CLOB".into())));
    assert!(name.nullable.is_none());
}

#[test]
fn hash_sensitivity() {
    let report = compute_drift(&source_snapshot(), &target_snapshot());

    let trigger = report
        .category(ObjectCategory::Triggers)
        .unwrap()
        .modified_object("HR.TRG_AUDIT")
        .unwrap();
    assert_eq!(trigger.changed, BTreeSet::from([ChangedField::DefinitionChanged]));
    assert!(!trigger.is_changed(ChangedField::BodyChanged));

    let function = report
        .category(ObjectCategory::Functions)
        .unwrap()
        .modified_object("HR.F_BONUS")
        .unwrap();
    assert_eq!(function.changed, BTreeSet::from([ChangedField::BodyChanged]));
    assert!(function.definition.is_none());
}

#[test]
fn determinism() {
    let (a, b) = (source_snapshot(), target_snapshot());
    let first = compute_drift(&a, &b).to_json().unwrap();
    let second = compute_drift(&a, &b).to_json().unwrap();
    assert_eq!(first, second);

    // Insertion order of the input must not matter either
    let mut reordered = SchemaSnapshot::builder();
    for (category, objects) in b.iter() {
        for object in objects.values().rev() {
            reordered.insert(category, object.clone()).unwrap();
        }
    }
    let third = compute_drift(&a, &reordered.build()).to_json().unwrap();
    assert_eq!(first, third);
}

#[test]
fn inputs_are_not_mutated() {
    let (a, b) = (source_snapshot(), target_snapshot());
    let (a_before, b_before) = (a.clone(), b.clone());
    let _ = compute_drift(&a, &b);
    assert_eq!(a, a_before);
    assert_eq!(b, b_before);
}

#[test]
fn summary_counts() {
    let report = compute_drift(&source_snapshot(), &target_snapshot());

    let tables = report.category(ObjectCategory::Tables).unwrap();
    assert_eq!(names(tables), (vec!["HR.PROJECTS"], vec![], vec!["HR.EMP"]));
    assert_eq!(tables.unchanged, vec!["HR.DEPT"]);
    assert_eq!(tables.summary.added_count, 1);
    assert_eq!(tables.summary.modified_count, 1);
    assert_eq!(tables.summary.unchanged_count, 1);

    // tables +1 ~1 =1, views -1, indexes =1, triggers ~1, functions ~1, synonyms ~1, operators =1
    assert_eq!(report.summary.added_count, 1);
    assert_eq!(report.summary.removed_count, 1);
    assert_eq!(report.summary.modified_count, 4);
    assert_eq!(report.summary.unchanged_count, 3);

    let order: Vec<ObjectCategory> = report.categories.keys().copied().collect();
    assert_eq!(
        order,
        vec![
            ObjectCategory::Tables,
            ObjectCategory::Views,
            ObjectCategory::Operators,
            ObjectCategory::Triggers,
            ObjectCategory::Indexes,
            ObjectCategory::Synonyms,
            ObjectCategory::Functions,
        ]
    );
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn scenario_column_type_change_and_addition() {
    let source = SchemaSnapshot::builder()
        .with_object(
            ObjectCategory::Tables,
            SchemaObject::relation("HR.EMP", None, vec![Column::new("ID", "int"), Column::new("NAME", "varchar")])
                .unwrap(),
        )
        .unwrap()
        .build();
    let target = SchemaSnapshot::builder()
        .with_object(
            ObjectCategory::Tables,
            SchemaObject::relation(
                "HR.EMP",
                None,
                vec![
                    Column::new("ID", "int"),
                    Column::new("NAME", "text"),
                    Column::new("EMAIL", "varchar"),
                ],
            )
            .unwrap(),
        )
        .unwrap()
        .build();

    let report = compute_drift(&source, &target);
    let tables = report.category(ObjectCategory::Tables).unwrap();
    assert_eq!(tables.modified_names(), vec!["HR.EMP"]);

    let columns = tables.modified_object("HR.EMP").unwrap().columns.clone().unwrap();
    assert_eq!(columns.added_names(), vec!["EMAIL"]);
    assert!(columns.removed.is_empty());
    assert_eq!(columns.unchanged, vec!["ID"]);

    let name = columns.modified_column("NAME").unwrap();
    assert_eq!(name.changed, BTreeSet::from([ColumnField::DataTypeChanged]));
    assert_eq!(name.data_type, Some(ValueChange::new("varchar".into(), "text".into())));
}

#[test]
fn scenario_removed_view() {
    let source = SchemaSnapshot::builder()
        .with_object(
            ObjectCategory::Views,
            SchemaObject::relation("HR.V_ACTIVE", None, Vec::new()).unwrap(),
        )
        .unwrap()
        .build();
    let target = SchemaSnapshot::empty();

    let report = compute_drift(&source, &target);
    let views = report.category(ObjectCategory::Views).unwrap();
    assert_eq!(views.removed_names(), vec!["HR.V_ACTIVE"]);
    assert!(views.added.is_empty());
    assert_eq!(report.categories.len(), 1);
}

#[test]
fn scenario_reformatted_trigger_definition() {
    let body = "BEGIN :NEW.UPDATED_AT := SYSDATE; END;";
    let source = SchemaSnapshot::builder()
        .with_object(
            ObjectCategory::Triggers,
            SchemaObject::code("HR.TRG_TOUCH", hash_body(body), "BEFORE UPDATE ON HR.EMP"),
        )
        .unwrap()
        .build();
    let target = SchemaSnapshot::builder()
        .with_object(
            ObjectCategory::Triggers,
            SchemaObject::code(
                "HR.TRG_TOUCH",
                hash_body(body),
                "BEFORE UPDATE ON HR.EMP -- touch timestamp",
            ),
        )
        .unwrap()
        .build();

    let report = compute_drift(&source, &target);
    let change = report
        .category(ObjectCategory::Triggers)
        .unwrap()
        .modified_object("HR.TRG_TOUCH")
        .unwrap();

    assert_eq!(change.changed, BTreeSet::from([ChangedField::DefinitionChanged]));
    assert!(change.body_hash.is_none());
}

#[test]
fn report_roundtrips_through_json() {
    let report = compute_drift(&source_snapshot(), &target_snapshot()).with_timestamp("2024-05-01T12:00:00+00:00");
    let parsed: DriftReport = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(parsed, report);
}
